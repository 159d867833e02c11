//! Which warehouse fact table, aggregate and sensor each dashboard metric reads.

use crate::config::WarehouseConfig;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Metric {
    Consumption,
    Production,
    Solar,
    Wind,
    IndoorTemperature,
    OutdoorTemperature,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aggregate {
    Sum,
    Avg,
}

impl Aggregate {
    pub fn sql(self) -> &'static str {
        match self {
            Aggregate::Sum => "SUM",
            Aggregate::Avg => "AVG",
        }
    }
}

/// Where a metric's values live and how they are rolled up into buckets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricSource {
    pub fact_table: &'static str,
    pub aggregate: Aggregate,
    pub sensor_key: Option<i32>,
    /// Column alias of the aggregated value in series queries.
    pub value_key: &'static str,
}

impl Metric {
    pub fn source(self, warehouse: &WarehouseConfig) -> MetricSource {
        match self {
            Metric::Consumption => MetricSource {
                fact_table: "total_consumptions_fact",
                aggregate: Aggregate::Sum,
                sensor_key: None,
                value_key: "total_kwh",
            },
            Metric::Production => MetricSource {
                fact_table: "productions_fact",
                aggregate: Aggregate::Sum,
                sensor_key: None,
                value_key: "total_kwh",
            },
            Metric::Solar => MetricSource {
                fact_table: "productions_fact",
                aggregate: Aggregate::Sum,
                sensor_key: Some(warehouse.solar_sensor_key),
                value_key: "total_kwh",
            },
            Metric::Wind => MetricSource {
                fact_table: "productions_fact",
                aggregate: Aggregate::Avg,
                sensor_key: Some(warehouse.wind_sensor_key),
                value_key: "avg_kwh",
            },
            Metric::IndoorTemperature => MetricSource {
                fact_table: "temperatures_fact",
                aggregate: Aggregate::Avg,
                sensor_key: Some(warehouse.indoor_temperature_sensor_key),
                value_key: "avg_c",
            },
            Metric::OutdoorTemperature => MetricSource {
                fact_table: "temperatures_fact",
                aggregate: Aggregate::Avg,
                sensor_key: warehouse.outdoor_temperature_sensor_key,
                value_key: "avg_c",
            },
        }
    }

    /// Field name a single-value summary is reported under.
    pub fn summary_key(self, op: Aggregate) -> &'static str {
        match (self, op) {
            (Metric::IndoorTemperature | Metric::OutdoorTemperature, _) => "avg_temp",
            (_, Aggregate::Sum) => "sum_kwh",
            (_, Aggregate::Avg) => "avg_kwh",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Metric::Consumption => "consumption",
            Metric::Production => "production",
            Metric::Solar => "solar",
            Metric::Wind => "wind",
            Metric::IndoorTemperature => "indoor-temperature",
            Metric::OutdoorTemperature => "outdoor-temperature",
        };
        f.write_str(name)
    }
}
