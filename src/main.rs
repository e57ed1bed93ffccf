use anyhow::{Context, Result};
use clap::Parser;
use essay_grader::scoring::{EssayScorer, MLHandle};
use essay_grader::settings::{settings, Settings};
use essay_grader::utils::{self, log_ml_disabled, log_ml_error, log_ml_ready, print_report};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;
use tracing::subscriber::set_global_default;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const EXIT_USAGE: i32 = 2;

#[derive(Parser, Debug)]
#[command(name = "essay-grader")]
#[command(about = "Simulated scoring of entrance-exam essays", long_about = None)]
#[command(version)]
struct Cli {
    /// Theme the essay is expected to address
    #[arg(short, long, env = "ESSAY_THEME")]
    theme: String,

    /// Essay file (reads stdin when omitted)
    file: Option<PathBuf>,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,

    /// Skip loading the classification models
    #[arg(long)]
    no_ml: bool,

    /// Settings file (defaults to settings.ron / settings.default.ron)
    #[arg(short, long, env = "ESSAY_SETTINGS")]
    settings: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    let subscriber = tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(format!("essay_grader={level}").parse()?))
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        );
    set_global_default(subscriber).context("setting tracing subscriber")?;

    let settings = match &cli.settings {
        Some(path) => Settings::from_file(path)?,
        None => settings().clone(),
    };

    let essay = read_essay(cli.file.as_deref())?;
    if essay.trim().is_empty() || cli.theme.trim().is_empty() {
        eprintln!("error: both a theme and an essay are required");
        process::exit(EXIT_USAGE);
    }

    let mut scorer = EssayScorer::new(settings.rubric.clone());

    if cli.no_ml || !settings.ml.enabled {
        log_ml_disabled();
    } else {
        let timeout = settings.ml.timeout_ms;
        let quality = MLHandle::spawn(&settings.ml.quality, timeout);
        let relevance = MLHandle::spawn(&settings.ml.relevance, timeout);

        // Both models or neither: a lone survivor is dropped here.
        match (quality, relevance) {
            (Ok(quality), Ok(relevance)) => {
                log_ml_ready();
                scorer =
                    scorer.with_classifiers(Some(Arc::new(quality)), Some(Arc::new(relevance)));
            }
            (quality, relevance) => {
                for e in [quality.err(), relevance.err()].into_iter().flatten() {
                    log_ml_error(&format!("{e:#}"));
                }
                log_ml_disabled();
            }
        }
    }

    if cli.verbose {
        let first_line = essay.lines().next().unwrap_or_default();
        utils::log_essay_header(&cli.theme, first_line, essay.split('\n').count());
    }

    let result = scorer.score(&essay, &cli.theme);

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_report(&result, settings.rubric.max_score);
    }

    Ok(())
}

fn read_essay(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("reading essay from {}", path.display())),
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("reading essay from stdin")?;
            Ok(buf)
        }
    }
}
