use thiserror::Error;

use crate::config::ConfigError;
use crate::header::HeaderError;
use crate::output::OutputError;
use crate::schedule::ScheduleError;
use crate::sections::RenderError;

/// Any failure that aborts a generation run.
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("schedule calculation error: {0}")]
    Schedule(#[from] ScheduleError),
    #[error("header generation error: {0}")]
    Header(#[from] HeaderError),
    #[error("render error: {0}")]
    Render(#[from] RenderError),
    #[error("output error: {0}")]
    Output(#[from] OutputError),
}
