use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueEnum, ValueHint};
use programma_core::{GenerateOptions, GeneratorPaths, HeaderStyle};

/// Generate the program document from config.yml and docs/sezioni.
#[derive(Parser, Debug, Clone, Default)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Project directory holding config.yml and docs/sezioni.
    #[arg(long, value_hint = ValueHint::DirPath)]
    pub root: Option<PathBuf>,

    /// Configuration file (defaults to <root>/config.yml).
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Directory of section templates (defaults to <root>/docs/sezioni).
    #[arg(long, value_hint = ValueHint::DirPath)]
    pub sections: Option<PathBuf>,

    /// Rendered document path (defaults to <root>/README.md).
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    pub output: Option<PathBuf>,

    /// Debug dump path (defaults to <root>/debug-programmazione.json).
    #[arg(long = "debug-output", value_hint = ValueHint::FilePath)]
    pub debug_output: Option<PathBuf>,

    /// How the document opens.
    #[arg(long = "header-style", value_enum, default_value_t = HeaderStyleArg::Pandoc)]
    pub header_style: HeaderStyleArg,

    /// Compute and render without writing files.
    #[arg(long, action = ArgAction::SetTrue)]
    pub dry_run: bool,

    /// Also write JSON logs to this file.
    #[arg(long = "log-file", value_hint = ValueHint::FilePath)]
    pub log_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum HeaderStyleArg {
    /// YAML metadata block for Pandoc.
    #[default]
    Pandoc,
    /// Markdown title and subtitle.
    Markdown,
}

impl From<HeaderStyleArg> for HeaderStyle {
    fn from(value: HeaderStyleArg) -> Self {
        match value {
            HeaderStyleArg::Pandoc => HeaderStyle::Pandoc,
            HeaderStyleArg::Markdown => HeaderStyle::Markdown,
        }
    }
}

impl Cli {
    /// Resolve the run options; explicit paths win over the root layout.
    pub fn to_options(&self) -> GenerateOptions {
        let root = self.root.clone().unwrap_or_default();
        let mut paths = GeneratorPaths::in_root(&root);

        if let Some(config) = &self.config {
            paths.config = config.clone();
        }
        if let Some(sections) = &self.sections {
            paths.sections_dir = sections.clone();
        }
        if let Some(output) = &self.output {
            paths.document = output.clone();
        }
        if let Some(debug_output) = &self.debug_output {
            paths.debug_dump = debug_output.clone();
        }

        GenerateOptions {
            paths,
            header_style: self.header_style.into(),
            dry_run: self.dry_run,
        }
    }
}
