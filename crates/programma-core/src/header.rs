//! Document front-matter generation.

use crate::config::{Instructor, ProjectMetadata};
use serde::Serialize;
use thiserror::Error;

const DOCUMENT_CLASS: &str = "article";
const STYLE_PACKAGE: &str = "\\usepackage{styles/mystyle}";

/// How the document opens.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HeaderStyle {
    /// YAML metadata block for Pandoc, authors as name/affiliation pairs.
    #[default]
    Pandoc,
    /// Plain Markdown title and subtitle lines.
    Markdown,
}

#[derive(Debug, Error)]
pub enum HeaderError {
    #[error("YAML serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Pandoc metadata; field order is the emitted key order.
#[derive(Debug, Serialize)]
struct PandocMetadata<'a> {
    title: &'a str,
    subtitle: String,
    documentclass: &'static str,
    author: Vec<Author<'a>>,
    #[serde(rename = "header-includes")]
    header_includes: Vec<String>,
}

#[derive(Debug, Serialize)]
struct Author<'a> {
    name: &'a str,
    affiliation: &'a str,
}

pub fn generate_header(
    project: &ProjectMetadata,
    instructors: &[Instructor],
    style: HeaderStyle,
) -> Result<String, HeaderError> {
    match style {
        HeaderStyle::Pandoc => pandoc_header(project, instructors),
        HeaderStyle::Markdown => Ok(markdown_header(project)),
    }
}

fn pandoc_header(
    project: &ProjectMetadata,
    instructors: &[Instructor],
) -> Result<String, HeaderError> {
    let metadata = PandocMetadata {
        title: &project.titolo,
        subtitle: format!("{} - {}", project.sottotitolo, project.anno_scolastico),
        documentclass: DOCUMENT_CLASS,
        author: instructors
            .iter()
            .map(|instructor| Author {
                name: &instructor.nome,
                affiliation: &instructor.qualifica,
            })
            .collect(),
        header_includes: vec![
            format!("\\newcommand{{\\gruppo}}{{{}}}", project.gruppo),
            STYLE_PACKAGE.to_string(),
        ],
    };

    let yaml = serde_yaml::to_string(&metadata)?;
    Ok(format!("---\n{yaml}---\n\n"))
}

fn markdown_header(project: &ProjectMetadata) -> String {
    format!(
        "# {}\n### {} - Anno educativo {}\n\n",
        project.titolo, project.sottotitolo, project.anno_scolastico
    )
}
