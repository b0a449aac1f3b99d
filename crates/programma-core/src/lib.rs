//! Core library for generating the annual program document.

pub mod config;
pub mod context;
pub mod costs;
pub mod error;
pub mod header;
pub mod logging;
pub mod output;
pub mod runtime;
pub mod schedule;
pub mod sections;

pub use config::{
    Amount, ConfigError, CostSpec, Instructor, LoadedConfig, ProgramConfig, ProjectMetadata,
    ScheduleSpec, VacationInterval, config_path, load_config, parse_config,
};
pub use context::{TemplateMap, TemplateValue};
pub use costs::{CostSummary, Payment, calculate_costs};
pub use error::GenerateError;
pub use header::{HeaderError, HeaderStyle, generate_header};
pub use logging::{LoggingDestination, LoggingError, current_log_path, init_logging};
pub use output::{OutputError, debug_dump_json, write_debug_dump, write_document};
pub use runtime::{
    GenerateOptions, GenerationReport, GeneratorPaths, StageProgressCallback, StageProgressEvent,
    StageProgressEventKind, run, run_with_progress,
};
pub use schedule::{
    ScheduleError, ScheduleSummary, calculate_schedule, meeting_dates, summarize,
    weekday_from_name, weekday_ordinal,
};
pub use sections::{
    RenderError, Section, SectionRenderer, assemble_document, build_context, discover_sections,
};
