use crate::config::{CONFIG_FILE_NAME, load_config};
use crate::costs::{CostSummary, calculate_costs};
use crate::error::GenerateError;
use crate::header::{HeaderStyle, generate_header};
use crate::output::{DEBUG_DUMP_FILE_NAME, DOCUMENT_FILE_NAME, write_debug_dump, write_document};
use crate::schedule::{ScheduleSummary, calculate_schedule};
use crate::sections::{SectionRenderer, assemble_document, build_context, discover_sections};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

pub const SECTIONS_DIR: &str = "docs/sezioni";

/// Input and output locations for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorPaths {
    pub config: PathBuf,
    pub sections_dir: PathBuf,
    pub document: PathBuf,
    pub debug_dump: PathBuf,
}

impl Default for GeneratorPaths {
    fn default() -> Self {
        Self::in_root(Path::new(""))
    }
}

impl GeneratorPaths {
    /// The fixed project layout, relative to `root`.
    pub fn in_root(root: &Path) -> Self {
        Self {
            config: root.join(CONFIG_FILE_NAME),
            sections_dir: root.join(SECTIONS_DIR),
            document: root.join(DOCUMENT_FILE_NAME),
            debug_dump: root.join(DEBUG_DUMP_FILE_NAME),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    pub paths: GeneratorPaths,
    pub header_style: HeaderStyle,
    /// Compute and render everything but write nothing.
    pub dry_run: bool,
}

/// Summary of a completed run.
#[derive(Debug, Clone)]
pub struct GenerationReport {
    pub sections: Vec<String>,
    pub schedule: ScheduleSummary,
    pub costs: CostSummary,
    pub document: String,
    pub document_path: PathBuf,
    pub debug_dump_path: PathBuf,
    pub written: bool,
}

pub type StageProgressCallback = Arc<dyn Fn(StageProgressEvent) + Send + Sync + 'static>;

/// One progress notification; `elapsed_ms` counts from the start of the run.
#[derive(Debug, Clone, PartialEq)]
pub struct StageProgressEvent {
    pub kind: StageProgressEventKind,
    pub stage: Option<String>,
    pub message: Option<String>,
    pub elapsed_ms: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageProgressEventKind {
    Started,
    Finished,
    Failed,
    Note,
}

/// Prints progress to stdout and forwards it to the optional callback.
struct StageLogger {
    start: Instant,
    stage: Option<String>,
    callback: Option<StageProgressCallback>,
}

impl StageLogger {
    fn new(callback: Option<StageProgressCallback>) -> Self {
        Self {
            start: Instant::now(),
            stage: None,
            callback,
        }
    }

    /// Run `body` as a named stage; the stage is closed even when `body` fails.
    fn stage<T, E>(
        &mut self,
        name: &str,
        body: impl FnOnce(&mut Self) -> Result<T, E>,
    ) -> Result<T, E> {
        let stage_start = Instant::now();
        self.stage = Some(name.to_string());
        println!("[{}] {name}", self.clock());
        self.emit(StageProgressEventKind::Started, None);

        let result = body(self);

        let took = format!("{} ms", format_ms(stage_start.elapsed()));
        let kind = if result.is_ok() {
            println!("[{}] {name} done in {took}", self.clock());
            StageProgressEventKind::Finished
        } else {
            println!("[{}] {name} failed after {took}", self.clock());
            StageProgressEventKind::Failed
        };
        self.emit(kind, Some(took));
        self.stage = None;
        result
    }

    fn note(&self, message: impl Into<String>) {
        let message = message.into();
        println!("  {message}");
        self.emit(StageProgressEventKind::Note, Some(message));
    }

    fn clock(&self) -> String {
        format!("+{} ms", format_ms(self.start.elapsed()))
    }

    fn emit(&self, kind: StageProgressEventKind, message: Option<String>) {
        if let Some(callback) = &self.callback {
            callback(StageProgressEvent {
                kind,
                stage: self.stage.clone(),
                message,
                elapsed_ms: self.start.elapsed().as_secs_f64() * 1_000.0,
            });
        }
    }
}

fn format_ms(d: std::time::Duration) -> String {
    format!("{:.3}", d.as_secs_f64() * 1_000.0)
}

pub fn run(options: &GenerateOptions) -> Result<GenerationReport, GenerateError> {
    generate(options, None)
}

pub fn run_with_progress(
    options: &GenerateOptions,
    callback: StageProgressCallback,
) -> Result<GenerationReport, GenerateError> {
    generate(options, Some(callback))
}

fn generate(
    options: &GenerateOptions,
    callback: Option<StageProgressCallback>,
) -> Result<GenerationReport, GenerateError> {
    let mut logger = StageLogger::new(callback);
    let paths = &options.paths;

    let config = logger.stage("Load configuration", |logger| {
        let config = load_config(&paths.config)?;
        logger.note(format!(
            "Config loaded: [{}]",
            config.top_level_keys().join(", ")
        ));
        Ok::<_, GenerateError>(config)
    })?;
    let program = &config.program;

    let schedule = logger.stage("Calculate schedule", |logger| {
        let schedule = calculate_schedule(&program.programmazione, &program.vacanze)?;
        logger.note(format!(
            "Schedule calculated: {} meetings over {} months (average {:.1})",
            schedule.total_meetings,
            schedule.per_month.len(),
            schedule.average_per_month
        ));
        Ok::<_, GenerateError>(schedule)
    })?;
    info!(
        meetings = schedule.total_meetings,
        first = schedule.first_meeting.as_deref().unwrap_or("-"),
        last = schedule.last_meeting.as_deref().unwrap_or("-"),
        "Schedule calculated"
    );

    let costs = logger.stage("Calculate costs", |logger| {
        let costs = calculate_costs(&program.costi);
        logger.note(format!(
            "Costs calculated: {} bimesters, total {}",
            costs.bimester_count, costs.total
        ));
        Ok::<_, GenerateError>(costs)
    })?;

    let header = logger.stage("Generate header", |_| {
        generate_header(&program.progetto, &program.maestri, options.header_style)
    })?;

    let sections = logger.stage("Discover sections", |logger| {
        let sections = discover_sections(&paths.sections_dir)?;
        let names: Vec<&str> = sections.iter().map(|s| s.name.as_str()).collect();
        logger.note(format!("Sections found: [{}]", names.join(", ")));
        Ok::<_, GenerateError>(sections)
    })?;

    let rendered = logger.stage("Render sections", |logger| {
        let context = build_context(&config.document, &schedule, &costs)?;
        let renderer = SectionRenderer::new()?;
        let mut rendered = Vec::with_capacity(sections.len());
        for section in &sections {
            logger.note(format!("Rendering: {}", section.path.display()));
            rendered.push(renderer.render(section, &context)?);
        }
        Ok::<_, GenerateError>(rendered)
    })?;

    let document = assemble_document(&header, &rendered);

    if options.dry_run {
        logger.note(format!(
            "Dry run: would write {} ({} bytes) and {}",
            paths.document.display(),
            document.len(),
            paths.debug_dump.display()
        ));
    } else {
        logger.stage("Write outputs", |logger| {
            write_document(&paths.document, &document)?;
            logger.note(format!("Document generated: {}", paths.document.display()));
            write_debug_dump(&paths.debug_dump, &schedule, &costs)?;
            logger.note(format!("Debug data written: {}", paths.debug_dump.display()));
            Ok::<_, GenerateError>(())
        })?;
    }

    println!("[{}] Program complete", logger.clock());

    Ok(GenerationReport {
        sections: sections.into_iter().map(|section| section.name).collect(),
        schedule,
        costs,
        document,
        document_path: paths.document.clone(),
        debug_dump_path: paths.debug_dump.clone(),
        written: !options.dry_run,
    })
}
