use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use tracing::{info, Level};

use jrewrite::config::Config;
use jrewrite::diagnostics::{render_error, RewriteError};
use jrewrite::recipe::catch_migration::CatchMigration;
use jrewrite::RewriteOutcome;

#[derive(Parser)]
#[command(name = "jrewrite", version, about = "Migrate Java catch clauses to a new exception type")]
struct Cli {
    /// Configuration file (defaults to the built-in Jackson 3 migration)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Overwrite changed files instead of printing them
    #[arg(long)]
    in_place: bool,

    /// Print a per-file report to stderr
    #[arg(long, value_enum)]
    report: Option<ReportFormat>,

    /// Log per-try decisions
    #[arg(short, long)]
    verbose: bool,

    /// Java source files
    #[arg(required = true)]
    files: Vec<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
enum ReportFormat {
    Json,
    Text,
}

#[derive(serde::Serialize)]
struct FileReport<'a> {
    file: String,
    #[serde(flatten)]
    outcome: &'a RewriteOutcome,
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::INFO })
        .init();

    let config = match &cli.config {
        Some(path) => Config::load(path),
        None => Ok(Config::default()),
    };
    let setup = config.and_then(|config| Ok((config.classpath()?, CatchMigration::new(&config.catch_migration)?)));
    let (classpath, recipe) = match setup {
        Ok(setup) => setup,
        Err(err) => {
            render_error("", "<config>", &err);
            std::process::exit(2);
        }
    };

    let mut failed = false;
    for file in &cli.files {
        let name = file.display().to_string();
        let source = match std::fs::read_to_string(file) {
            Ok(source) => source,
            Err(e) => {
                render_error("", &name, &RewriteError::Io(e));
                failed = true;
                continue;
            }
        };
        let outcome = match jrewrite::rewrite_with(&source, &recipe, &classpath) {
            Ok(outcome) => outcome,
            Err(err) => {
                render_error(&source, &name, &err);
                failed = true;
                continue;
            }
        };

        info!(file = %name, changed = outcome.changed, tries = outcome.run.changes.len(), "processed");
        if cli.in_place {
            if outcome.changed {
                if let Err(e) = std::fs::write(file, &outcome.source) {
                    render_error("", &name, &RewriteError::Io(e));
                    failed = true;
                    continue;
                }
            }
        } else {
            print!("{}", outcome.source);
        }
        match cli.report {
            Some(ReportFormat::Json) => {
                let report = FileReport { file: name.clone(), outcome: &outcome };
                match serde_json::to_string(&report) {
                    Ok(json) => eprintln!("{json}"),
                    Err(e) => eprintln!("error: {name}: {e}"),
                }
            }
            Some(ReportFormat::Text) => print_text_report(&name, &outcome),
            None => {}
        }
    }

    if failed {
        std::process::exit(1);
    }
}

fn print_text_report(name: &str, outcome: &RewriteOutcome) {
    if !outcome.changed {
        eprintln!("{name}: unchanged");
        return;
    }
    let run = &outcome.run;
    let tags = if run.tags.is_empty() { String::new() } else { format!(" [{}]", run.tags.join(", ")) };
    eprintln!("{name}: {}{tags}: {} try statement(s) rewritten", run.display_name, run.changes.len());
    for change in &outcome.run.changes {
        eprintln!("  {:?} {} clause(s)", change.kind, change.clauses);
    }
    for added in &outcome.run.imports.added {
        eprintln!("  + import {added}");
    }
    for removed in &outcome.run.imports.removed {
        eprintln!("  - import {removed}");
    }
}
