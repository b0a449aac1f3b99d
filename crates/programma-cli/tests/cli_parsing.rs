use std::fs;
use std::path::PathBuf;

use clap::Parser;
use programma_cli::{Cli, FAILURE_PREFIX, HeaderStyleArg, execute, failure_message};
use programma_core::HeaderStyle;

// Integration tests for argument parsing and path resolution.

#[test]
fn test_no_flags_uses_fixed_layout() {
    let cli = Cli::try_parse_from(["programma"]).expect("parse");
    let options = cli.to_options();

    assert_eq!(options.paths.config, PathBuf::from("config.yml"));
    assert_eq!(options.paths.sections_dir, PathBuf::from("docs/sezioni"));
    assert_eq!(options.paths.document, PathBuf::from("README.md"));
    assert_eq!(
        options.paths.debug_dump,
        PathBuf::from("debug-programmazione.json")
    );
    assert_eq!(options.header_style, HeaderStyle::Pandoc);
    assert!(!options.dry_run);
}

#[test]
fn test_root_prefixes_every_path() {
    let cli = Cli::try_parse_from(["programma", "--root", "progetto"]).expect("parse");
    let options = cli.to_options();

    assert_eq!(options.paths.config, PathBuf::from("progetto/config.yml"));
    assert_eq!(
        options.paths.sections_dir,
        PathBuf::from("progetto/docs/sezioni")
    );
    assert_eq!(options.paths.document, PathBuf::from("progetto/README.md"));
}

#[test]
fn test_explicit_paths_override_root() {
    let cli = Cli::try_parse_from([
        "programma",
        "--root",
        "progetto",
        "--output",
        "dist/programma.md",
        "--debug-output",
        "dist/debug.json",
        "--sections",
        "altre-sezioni",
    ])
    .expect("parse");
    let options = cli.to_options();

    assert_eq!(options.paths.config, PathBuf::from("progetto/config.yml"));
    assert_eq!(options.paths.sections_dir, PathBuf::from("altre-sezioni"));
    assert_eq!(options.paths.document, PathBuf::from("dist/programma.md"));
    assert_eq!(options.paths.debug_dump, PathBuf::from("dist/debug.json"));
}

#[test]
fn test_header_style_and_dry_run() {
    let cli = Cli::try_parse_from(["programma", "--header-style", "markdown", "--dry-run"])
        .expect("parse");
    assert_eq!(cli.header_style, HeaderStyleArg::Markdown);

    let options = cli.to_options();
    assert_eq!(options.header_style, HeaderStyle::Markdown);
    assert!(options.dry_run);
}

#[test]
fn test_unknown_header_style_is_rejected() {
    assert!(Cli::try_parse_from(["programma", "--header-style", "latex"]).is_err());
}

#[test]
fn test_execute_generates_into_root() {
    let temp = tempfile::tempdir().expect("tempdir");
    let root = temp.path();
    fs::write(
        root.join("config.yml"),
        r#"
progetto:
  titolo: "Laboratorio"
  sottotitolo: "Programmazione"
  anno_scolastico: "2025/2026"
  gruppo: "Gruppo Api"
maestri: []
programmazione:
  inizio: 2025-10-06
  fine: 2025-10-27
  giorno_settimana: "lunedì"
costi:
  quota_bimestrale: 45.5
  mesi_inclusi: ["Ottobre", "Novembre"]
"#,
    )
    .expect("write config");
    let sections = root.join("docs").join("sezioni");
    fs::create_dir_all(&sections).expect("create sections");
    fs::write(
        sections.join("01.md"),
        "{{ programmazione_calcolata.totale_incontri }} incontri, {{ costi_calcolati.costo_totale }} euro",
    )
    .expect("write section");

    let cli = Cli {
        root: Some(root.to_path_buf()),
        ..Cli::default()
    };
    let report = execute(&cli).expect("generation succeeded");

    assert_eq!(report.schedule.total_meetings, 4);
    let document = fs::read_to_string(root.join("README.md")).expect("read document");
    assert!(document.ends_with("4 incontri, 45.5 euro\n\n---\n\n"));
    assert!(root.join("debug-programmazione.json").exists());
}

#[test]
fn test_failure_message_names_the_missing_config() {
    let temp = tempfile::tempdir().expect("tempdir");
    let cli = Cli {
        root: Some(temp.path().to_path_buf()),
        ..Cli::default()
    };

    let err = execute(&cli).expect_err("no config.yml in an empty root");
    let message = failure_message(&err);

    assert!(message.starts_with("Errore durante il processing: failed to generate "));
    assert!(message.starts_with(FAILURE_PREFIX));
    assert!(message.contains("config.yml"));
    assert!(!message.contains('\n'));
}
