//! Template sections: discovery, rendering and assembly.

use crate::context::TemplateMap;
use crate::costs::CostSummary;
use crate::schedule::ScheduleSummary;
use liquid::{Parser, ParserBuilder};
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

pub const SECTION_EXTENSION: &str = "md";
pub const SECTION_SEPARATOR: &str = "\n\n---\n\n";
pub const SCHEDULE_CONTEXT_KEY: &str = "programmazione_calcolata";
pub const COSTS_CONTEXT_KEY: &str = "costi_calcolati";

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("section directory not found: {}", .0.display())]
    MissingDirectory(PathBuf),
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to set up the template parser: {0}")]
    Parser(#[source] liquid::Error),
    #[error("failed to render section {section}: {source}")]
    Template {
        section: String,
        #[source]
        source: liquid::Error,
    },
    #[error("failed to build template context: {0}")]
    Context(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub name: String,
    pub path: PathBuf,
    pub source: String,
}

/// Read every `.md` file in `dir`, ordered by file name.
pub fn discover_sections(dir: &Path) -> Result<Vec<Section>, RenderError> {
    if !dir.is_dir() {
        return Err(RenderError::MissingDirectory(dir.to_path_buf()));
    }

    let mut paths = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_error(dir))? {
        let path = entry.map_err(io_error(dir))?.path();
        let is_section = path.is_file()
            && path.extension().and_then(|ext| ext.to_str()) == Some(SECTION_EXTENSION);
        if is_section {
            paths.push(path);
        }
    }
    paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    paths
        .into_iter()
        .map(|path| {
            let source = fs::read_to_string(&path).map_err(io_error(&path))?;
            let name = path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default();
            debug!(section = %name, bytes = source.len(), "Loaded section");
            Ok(Section { name, path, source })
        })
        .collect()
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> RenderError {
    let path = path.to_path_buf();
    move |source| RenderError::Io { path, source }
}

/// Configuration document plus both calculated results, as seen by templates.
pub fn build_context(
    document: &Map<String, Value>,
    schedule: &ScheduleSummary,
    costs: &CostSummary,
) -> Result<TemplateMap, RenderError> {
    let mut context = document.clone();
    context.insert(
        SCHEDULE_CONTEXT_KEY.to_string(),
        serde_json::to_value(schedule)?,
    );
    context.insert(COSTS_CONTEXT_KEY.to_string(), serde_json::to_value(costs)?);
    Ok(TemplateMap::from_json(&context))
}

/// Renders sections as Liquid templates with the standard tags and filters.
///
/// Unknown variables and unknown indexes are errors; nil renders as nothing.
pub struct SectionRenderer {
    parser: Parser,
}

impl SectionRenderer {
    pub fn new() -> Result<Self, RenderError> {
        let parser = ParserBuilder::with_stdlib()
            .build()
            .map_err(RenderError::Parser)?;
        Ok(Self { parser })
    }

    pub fn render(&self, section: &Section, context: &TemplateMap) -> Result<String, RenderError> {
        let template_error = |source: liquid::Error| RenderError::Template {
            section: section.name.clone(),
            source,
        };
        self.parser
            .parse(&section.source)
            .map_err(template_error)?
            .render(context)
            .map_err(template_error)
    }
}

/// Header followed by every section, each closed by a horizontal rule.
pub fn assemble_document(header: &str, rendered: &[String]) -> String {
    let body_len: usize = rendered
        .iter()
        .map(|section| section.len() + SECTION_SEPARATOR.len())
        .sum();
    let mut document = String::with_capacity(header.len() + body_len);
    document.push_str(header);
    for section in rendered {
        document.push_str(section);
        document.push_str(SECTION_SEPARATOR);
    }
    document
}
