#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! # ergrade
//!
//! Grades Entity-Relationship diagrams against a configurable set of rules.
//!
//! `ergrade grade diagram.json --config rules.properties` prints a table of
//! every rule checked and the total. `ergrade defaults` prints the default
//! configuration, a starting point for writing your own.

use std::path::PathBuf;

use anyhow::{Context, Result};
use bpaf::*;
use dotenvy::dotenv;
use ergrade::{DiagramDocument, GradingConfig, Grader, constants::CONFIG_ENV, grade::report};
use tracing::{Level, info, metadata::LevelFilter};
use tracing_subscriber::{fmt, prelude::*, util::SubscriberInitExt};

/// Options of the `grade` command.
#[derive(Debug, Clone)]
struct GradeOpts {
    /// Configuration file, if given
    config:  Option<PathBuf>,
    /// Print JSON instead of a table
    json:    bool,
    /// Log at debug level
    verbose: bool,
    /// The diagram document
    diagram: PathBuf,
}

/// Top-level CLI commands.
#[derive(Debug, Clone)]
enum Cmd {
    /// Grade a diagram
    Grade(GradeOpts),
    /// Print the default configuration
    Defaults,
}

/// Parse the command line arguments and return a `Cmd` enum
fn options() -> Cmd {
    let config = short('c')
        .long("config")
        .help("Grading configuration (.properties or .json)")
        .argument::<PathBuf>("FILE")
        .optional();
    let json = long("json").help("Print the report as JSON").switch();
    let verbose = short('v')
        .long("verbose")
        .help("Log every rule as it is checked")
        .switch();
    let diagram = positional::<PathBuf>("DIAGRAM").help("Diagram document to grade");

    let grade = construct!(GradeOpts {
        config,
        json,
        verbose,
        diagram
    })
    .to_options()
    .command("grade")
    .help("Grade a diagram")
    .map(Cmd::Grade);

    let defaults = pure(Cmd::Defaults)
        .to_options()
        .command("defaults")
        .help("Print the default configuration");

    let cmd = construct!([grade, defaults]);

    cmd.to_options()
        .descr("Grader for Entity-Relationship diagrams")
        .run()
}

/// Installs the log subscriber.
fn init_tracing(verbose: bool) {
    let fmt = fmt::layer()
        .without_time()
        .with_file(false)
        .with_line_number(false);
    let filter_layer = LevelFilter::from_level(if verbose { Level::DEBUG } else { Level::INFO });
    tracing_subscriber::registry()
        .with(fmt)
        .with(filter_layer)
        .init();
}

/// Picks the configuration: `--config`, then the environment, then the
/// built-in defaults.
fn load_config(path: Option<PathBuf>) -> Result<GradingConfig> {
    let path = path.or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from));
    match path {
        Some(path) => {
            info!("Using configuration {}", path.display());
            GradingConfig::load(&path)
        }
        None => Ok(GradingConfig::new()),
    }
}

fn main() -> Result<()> {
    dotenv().ok();

    match options() {
        Cmd::Grade(opts) => {
            init_tracing(opts.verbose);
            let config = load_config(opts.config)?;
            let diagram = DiagramDocument::load(&opts.diagram)?
                .into_diagram()
                .with_context(|| format!("Could not build diagram {}", opts.diagram.display()))?;

            let report = Grader::new(&config).grade(&diagram);
            if opts.json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&report).context("Could not serialize report")?
                );
            } else {
                eprintln!("{}", report::render(&report));
            }
        }
        Cmd::Defaults => {
            init_tracing(false);
            print!("{}", GradingConfig::defaults().to_properties());
        }
    }

    Ok(())
}
