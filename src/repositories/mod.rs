pub mod battery;
pub mod measurement;
pub mod wind;

pub use battery::BatteryRepository;
pub use measurement::MeasurementRepository;
pub use wind::WindRepository;
