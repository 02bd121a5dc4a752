use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::env;
use std::path::{Path, PathBuf};
use timetable_harvest::{
    DelayConfig, FormLayout, HarvestError, RawDataset, RunSummary, Term, TimetableClient, clean,
    dataset, default_subjects, normalize_subjects,
};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Parser)]
#[command(name = "timetable", about = "Harvest and clean the published course timetable")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Walk the timetable form and save every row as raw CSV.
    Scrape {
        #[command(flatten)]
        fetch: FetchArgs,
        #[arg(long, default_value = "offered_raw.csv")]
        out: PathBuf,
        /// Also write the run summary as JSON.
        #[arg(long)]
        summary_json: Option<PathBuf>,
    },
    /// Normalize a raw CSV into the cleaned schema.
    Clean {
        #[arg(long, default_value = "offered_raw.csv")]
        input: PathBuf,
        #[arg(long, default_value = "cleaned_offered.csv")]
        output: PathBuf,
        /// Also write the run summary as JSON.
        #[arg(long)]
        summary_json: Option<PathBuf>,
    },
    /// Scrape then clean.
    Run {
        #[command(flatten)]
        fetch: FetchArgs,
        #[arg(long, default_value = "offered_raw.csv")]
        raw: PathBuf,
        #[arg(long, default_value = "cleaned_offered.csv")]
        output: PathBuf,
        #[arg(long)]
        summary_json: Option<PathBuf>,
    },
}

#[derive(Args)]
struct FetchArgs {
    /// Term code as YYYYMM, e.g. 202409 for Fall 2024.
    #[arg(long)]
    term: Term,
    /// Comma-separated subject codes; defaults to the full catalogue.
    #[arg(long, value_delimiter = ',')]
    subjects: Vec<String>,
    /// Timetable form URL; falls back to TIMETABLE_BASE_URL, then the built-in default.
    #[arg(long)]
    base_url: Option<String>,
    /// Do not pause between subjects.
    #[arg(long)]
    no_delay: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(env).init();

    let cli = Cli::parse();
    match cli.command {
        Command::Scrape {
            fetch,
            out,
            summary_json,
        } => {
            let mut summary = RunSummary::start(Some(fetch.term.format().as_str()));
            let outcome = scrape(&fetch, &out, &mut summary).await;
            finish(summary, summary_json.as_deref())?;
            outcome?;
        }
        Command::Clean {
            input,
            output,
            summary_json,
        } => {
            let mut summary = RunSummary::start(None);
            clean_file(&input, &output, &mut summary)?;
            finish(summary, summary_json.as_deref())?;
        }
        Command::Run {
            fetch,
            raw,
            output,
            summary_json,
        } => {
            let mut summary = RunSummary::start(Some(fetch.term.format().as_str()));
            let outcome = match scrape(&fetch, &raw, &mut summary).await {
                Ok(true) => clean_file(&raw, &output, &mut summary),
                Ok(false) => Ok(()),
                Err(error) => Err(error),
            };
            finish(summary, summary_json.as_deref())?;
            outcome?;
        }
    }

    Ok(())
}

/// Returns whether a raw file was written. Counts land in `summary` on
/// failure too, so the caller can still report them.
async fn scrape(args: &FetchArgs, out: &Path, summary: &mut RunSummary) -> Result<bool> {
    let base_url = args
        .base_url
        .clone()
        .or_else(|| env::var("TIMETABLE_BASE_URL").ok());
    let mut layout = FormLayout::default();
    if let Some(base_url) = base_url {
        layout = layout.with_base_url(base_url);
    }

    let subjects = if args.subjects.is_empty() {
        default_subjects()
    } else {
        normalize_subjects(&args.subjects)
    };
    let delay = if args.no_delay {
        DelayConfig::disabled()
    } else {
        DelayConfig::default()
    };

    info!(
        term = %args.term,
        name = %args.term.describe(),
        subjects = subjects.len(),
        url = %layout.base_url,
        "starting harvest"
    );
    let client = TimetableClient::new()?.with_layout(layout).with_delay(delay);

    let harvest = match client.fetch_all(&args.term.format(), &subjects).await {
        Ok(harvest) => harvest,
        Err(failure) => {
            summary.record_abort(&failure);
            save_partial(&failure.partial, out);
            return Err(HarvestError::from(failure).into());
        }
    };

    summary.record_fetch(&harvest);
    if harvest.is_empty() {
        println!("No courses found.");
        return Ok(false);
    }

    dataset::save_raw(out, &harvest.records)
        .with_context(|| format!("writing {}", out.display()))?;
    println!("Data saved to {}", out.display());
    Ok(true)
}

fn save_partial(partial: &RawDataset, out: &Path) {
    if partial.is_empty() {
        return;
    }

    let path = out.with_extension("partial.csv");
    match dataset::save_raw(&path, &partial.records) {
        Ok(()) => warn!(
            path = %path.display(),
            records = partial.records.len(),
            "harvest aborted; partial data saved"
        ),
        Err(error) => warn!(%error, "could not save partial data"),
    }
}

fn clean_file(input: &Path, output: &Path, summary: &mut RunSummary) -> Result<()> {
    let rows = dataset::load_raw(input).with_context(|| format!("reading {}", input.display()))?;
    let cleaned = clean(rows);

    for malformed in &cleaned.report.malformed {
        warn!(row = malformed.row, error = %malformed.error, "skipped malformed row");
    }
    summary.record_clean(&cleaned.report);

    dataset::save_cleaned(output, &cleaned.records)
        .with_context(|| format!("writing {}", output.display()))?;
    println!("Cleaned data saved to {}", output.display());
    Ok(())
}

fn finish(mut summary: RunSummary, summary_json: Option<&Path>) -> Result<()> {
    summary.finish();
    println!("{}", summary);
    if let Some(path) = summary_json {
        summary
            .save_json(path)
            .with_context(|| format!("writing {}", path.display()))?;
    }
    Ok(())
}
