use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::fs;
use std::ops::Mul;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

pub const CONFIG_FILE_NAME: &str = "config.yml";

/// Errors raised while reading `config.yml`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {} as YAML: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("configuration root must be a mapping")]
    NotAMapping,
    #[error("invalid configuration: {0}")]
    Schema(#[from] serde_json::Error),
}

/// Configuration as loaded from disk.
///
/// `document` keeps every key in authoring order for templates, while
/// `program` is the typed view consumed by the calculators.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub document: Map<String, Value>,
    pub program: ProgramConfig,
}

impl LoadedConfig {
    /// Top-level keys in the order they appear in the file.
    pub fn top_level_keys(&self) -> Vec<&str> {
        self.document.keys().map(String::as_str).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProgramConfig {
    pub progetto: ProjectMetadata,
    pub maestri: Vec<Instructor>,
    pub programmazione: ScheduleSpec,
    #[serde(default)]
    pub vacanze: Vec<VacationInterval>,
    pub costi: CostSpec,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProjectMetadata {
    #[serde(deserialize_with = "scalar_text")]
    pub titolo: String,
    #[serde(deserialize_with = "scalar_text")]
    pub sottotitolo: String,
    #[serde(deserialize_with = "scalar_text")]
    pub anno_scolastico: String,
    #[serde(deserialize_with = "scalar_text")]
    pub gruppo: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Instructor {
    #[serde(deserialize_with = "scalar_text")]
    pub nome: String,
    #[serde(deserialize_with = "scalar_text")]
    pub qualifica: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ScheduleSpec {
    pub inizio: NaiveDate,
    pub fine: NaiveDate,
    pub giorno_settimana: String,
}

/// Closed date range; both ends are part of the vacation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct VacationInterval {
    pub inizio: NaiveDate,
    pub fine: NaiveDate,
}

impl VacationInterval {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.inizio <= date && date <= self.fine
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CostSpec {
    pub quota_bimestrale: Amount,
    pub mesi_inclusi: Vec<String>,
}

/// A money amount exactly as written in the configuration.
///
/// Whole numbers stay whole so that `50` is never reported as `50.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Amount {
    Whole(i64),
    Decimal(f64),
}

impl Mul<u32> for Amount {
    type Output = Amount;

    fn mul(self, count: u32) -> Amount {
        match self {
            Amount::Whole(value) => value
                .checked_mul(i64::from(count))
                .map(Amount::Whole)
                .unwrap_or_else(|| Amount::Decimal(value as f64 * f64::from(count))),
            Amount::Decimal(value) => Amount::Decimal(value * f64::from(count)),
        }
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Amount::Whole(value) => write!(f, "{value}"),
            Amount::Decimal(value) => write!(f, "{value}"),
        }
    }
}

/// Accept any YAML scalar where free text is expected (`anno_scolastico: 2024`).
fn scalar_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(text) => Ok(text),
        Value::Number(number) => Ok(number.to_string()),
        Value::Bool(flag) => Ok(flag.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected a text value, found {other}"
        ))),
    }
}

/// Path to `config.yml` inside `root`.
pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE_NAME)
}

/// Read and parse the configuration file.
pub fn load_config(path: &Path) -> Result<LoadedConfig, ConfigError> {
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let config = parse_config(&raw).map_err(|err| match err {
        ConfigError::Parse { source, .. } => ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        },
        other => other,
    })?;
    debug!(path = %path.display(), keys = config.document.len(), "Configuration parsed");
    Ok(config)
}

/// Parse configuration text; used by [`load_config`] and directly by tests.
pub fn parse_config(raw: &str) -> Result<LoadedConfig, ConfigError> {
    let value: Value = serde_yaml::from_str(raw).map_err(|source| ConfigError::Parse {
        path: PathBuf::from(CONFIG_FILE_NAME),
        source,
    })?;
    let Value::Object(document) = value else {
        return Err(ConfigError::NotAMapping);
    };
    let program = serde_json::from_value(Value::Object(document.clone()))?;
    Ok(LoadedConfig { document, program })
}
