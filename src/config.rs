use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database: DbConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub warehouse: WarehouseConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DbConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_api_host")]
    pub host: String,
    #[serde(default = "default_api_port")]
    pub port: u16,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_api_host(),
            port: default_api_port(),
        }
    }
}

fn default_api_host() -> String {
    "0.0.0.0".into()
}

fn default_api_port() -> u16 {
    8080
}

/// Sensor identifiers of the warehouse's `sensors_dim` that individual
/// metrics are filtered on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WarehouseConfig {
    #[serde(default = "default_solar_sensor_key")]
    pub solar_sensor_key: i32,
    #[serde(default = "default_wind_sensor_key")]
    pub wind_sensor_key: i32,
    #[serde(default = "default_indoor_temperature_sensor_key")]
    pub indoor_temperature_sensor_key: i32,
    /// No outdoor sensor configured means the metric averages every temperature sensor.
    #[serde(default)]
    pub outdoor_temperature_sensor_key: Option<i32>,
    #[serde(default = "default_battery_device_id")]
    pub battery_device_id: String,
}

impl Default for WarehouseConfig {
    fn default() -> Self {
        Self {
            solar_sensor_key: default_solar_sensor_key(),
            wind_sensor_key: default_wind_sensor_key(),
            indoor_temperature_sensor_key: default_indoor_temperature_sensor_key(),
            outdoor_temperature_sensor_key: None,
            battery_device_id: default_battery_device_id(),
        }
    }
}

fn default_solar_sensor_key() -> i32 {
    276
}

fn default_wind_sensor_key() -> i32 {
    286
}

fn default_indoor_temperature_sensor_key() -> i32 {
    125
}

fn default_battery_device_id() -> String {
    "TB_batterypack".into()
}

impl Config {
    /// Load YAML from disk, substitute $(VAR)/${VAR} with env vars, then parse.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, anyhow::Error> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        let mut cfg = Self::from_yaml(&raw)?;

        // DATABASE_URL wins over whatever the file says
        if let Ok(url) = std::env::var("DATABASE_URL") {
            cfg.database.url = url;
        }

        Ok(cfg)
    }

    pub fn from_yaml(raw: &str) -> Result<Self, anyhow::Error> {
        let expanded = expand_env_placeholders(raw)?;
        let cfg = serde_yaml::from_str(&expanded).context("parsing config YAML")?;
        Ok(cfg)
    }
}

/// Expand $(VAR) and ${VAR} placeholders using environment variables.
/// `$$` is an escaped dollar sign; a lone `$` is kept as-is.
fn expand_env_placeholders(input: &str) -> Result<String, anyhow::Error> {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(pos) = rest.find('$') {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos + 1..];

        let close = match tail.chars().next() {
            Some('$') => {
                out.push('$');
                rest = &tail[1..];
                continue;
            }
            Some('(') => ')',
            Some('{') => '}',
            _ => {
                out.push('$');
                rest = tail;
                continue;
            }
        };

        let end = tail
            .find(close)
            .with_context(|| format!("unterminated env placeholder: missing '{}'", close))?;
        let var = &tail[1..end];
        let val = std::env::var(var)
            .with_context(|| format!("missing environment variable: {}", var))?;
        out.push_str(&val);
        rest = &tail[end + 1..];
    }

    out.push_str(rest);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_both_placeholder_styles() {
        std::env::set_var("EDA_TEST_USER", "grafana");
        std::env::set_var("EDA_TEST_PASS", "s3cret");

        let output =
            expand_env_placeholders("postgres://$(EDA_TEST_USER):${EDA_TEST_PASS}@db/dw").unwrap();

        assert_eq!(output, "postgres://grafana:s3cret@db/dw");

        std::env::remove_var("EDA_TEST_USER");
        std::env::remove_var("EDA_TEST_PASS");
    }

    #[test]
    fn test_expand_keeps_plain_and_escaped_dollars() {
        assert_eq!(expand_env_placeholders("cost: 5$").unwrap(), "cost: 5$");
        assert_eq!(expand_env_placeholders("a $$(X) b").unwrap(), "a $(X) b");
    }

    #[test]
    fn test_expand_missing_variable_fails() {
        assert!(expand_env_placeholders("url: $(EDA_TEST_DOES_NOT_EXIST)").is_err());
    }

    #[test]
    fn test_expand_unterminated_placeholder_fails() {
        assert!(expand_env_placeholders("url: ${EDA_TEST_OPEN").is_err());
    }

    #[test]
    fn test_from_yaml_applies_defaults() {
        let cfg = Config::from_yaml(
            r#"
database:
  url: postgres://localhost/dw
"#,
        )
        .unwrap();

        assert_eq!(cfg.database.max_connections, 10);
        assert_eq!(cfg.api.host, "0.0.0.0");
        assert_eq!(cfg.api.port, 8080);
        assert_eq!(cfg.warehouse.solar_sensor_key, 276);
        assert_eq!(cfg.warehouse.wind_sensor_key, 286);
        assert_eq!(cfg.warehouse.indoor_temperature_sensor_key, 125);
        assert_eq!(cfg.warehouse.outdoor_temperature_sensor_key, None);
        assert_eq!(cfg.warehouse.battery_device_id, "TB_batterypack");
    }

    #[test]
    fn test_from_yaml_reads_warehouse_section() {
        let cfg = Config::from_yaml(
            r#"
database:
  url: postgres://localhost/dw
  max_connections: 4
api:
  port: 9000
warehouse:
  solar_sensor_key: 1
  outdoor_temperature_sensor_key: 130
  battery_device_id: pack-2
"#,
        )
        .unwrap();

        assert_eq!(cfg.database.max_connections, 4);
        assert_eq!(cfg.api.port, 9000);
        assert_eq!(cfg.warehouse.solar_sensor_key, 1);
        assert_eq!(cfg.warehouse.wind_sensor_key, 286);
        assert_eq!(cfg.warehouse.outdoor_temperature_sensor_key, Some(130));
        assert_eq!(cfg.warehouse.battery_device_id, "pack-2");
    }
}
