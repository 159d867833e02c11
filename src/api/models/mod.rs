pub mod battery;
pub mod measurement;
pub mod wind;
