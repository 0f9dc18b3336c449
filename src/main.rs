use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::Parser;
use tracing::info;
use tracing_subscriber::FmtSubscriber;

use market_brief::api::StooqClient;
use market_brief::models::{IndexSpec, IndexSummary};
use market_brief::{report, resolver};

const DOMESTIC_INDICES: &[IndexSpec] = &[
    IndexSpec { name: "코스피", symbol: "^kospi" },
    IndexSpec { name: "코스닥", symbol: "^kosdaq" },
];

const OVERSEAS_INDICES: &[IndexSpec] = &[
    IndexSpec { name: "다우 산업", symbol: "^dji" },
    IndexSpec { name: "나스닥 종합", symbol: "^ndq" },
    IndexSpec { name: "상해 종합", symbol: "^shc" },
    IndexSpec { name: "니케이225", symbol: "^nkx" },
];

/// Generate the daily market briefing HTML report.
#[derive(Parser, Debug)]
#[command(name = "market-brief")]
struct Args {
    /// Directory for the generated report, created recursively if missing
    #[arg(long, default_value = "output")]
    output_dir: PathBuf,

    /// Run date override (YYYY-MM-DD) for reproducible runs; defaults to today
    #[arg(long)]
    target_date: Option<NaiveDate>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("market_brief=info")),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("setting default subscriber failed");

    let args = Args::parse();
    let run_date = args.target_date.unwrap_or_else(|| Local::now().date_naive());
    let generated_at = Local::now().format("%Y-%m-%d %H:%M").to_string();

    info!("Generating briefing for run date {}", run_date);

    let client = StooqClient::new()?;

    // One blocking call per index, in declared order. Failures stay inside
    // the summaries and never abort the run.
    let domestic = resolve_all(&client, DOMESTIC_INDICES, run_date).await;
    let overseas = resolve_all(&client, OVERSEAS_INDICES, run_date).await;

    fs::create_dir_all(&args.output_dir).with_context(|| {
        format!("failed to create output directory {}", args.output_dir.display())
    })?;

    let output_path = args
        .output_dir
        .join(format!("{}_brief.html", run_date.format("%Y-%m-%d")));
    let html = report::render_html(&domestic, &overseas, &generated_at, args.target_date);
    fs::write(&output_path, html)
        .with_context(|| format!("failed to write {}", output_path.display()))?;

    println!("Generated: {}", output_path.display());
    Ok(())
}

async fn resolve_all(
    client: &StooqClient,
    specs: &[IndexSpec],
    run_date: NaiveDate,
) -> Vec<IndexSummary> {
    let mut summaries = Vec::with_capacity(specs.len());
    for spec in specs {
        summaries.push(resolver::resolve(client, spec.name, spec.symbol, run_date).await);
    }
    summaries
}
