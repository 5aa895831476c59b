use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use tracing_subscriber::{fmt, EnvFilter};

use shopify_admin_tasks::tasks::flag_capture::{
    capture_the_flag, FlagCaptureOptions, FlagCaptureOutcome, FlagCaptureReport,
};
use shopify_admin_tasks::tasks::leaderboard::{
    generate_customer_leaderboard, LeaderboardOptions, DEFAULT_OUTPUT_PATH,
};
use shopify_admin_tasks::{ApiVersion, GraphqlClient, TasksConfig};

#[derive(Parser)]
#[command(
    name = "shopify-admin-tasks",
    version,
    about = "Customer leaderboard export and flag capture against the Shopify Admin API"
)]
struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Where to write the leaderboard CSV
    #[arg(long, default_value = DEFAULT_OUTPUT_PATH)]
    output: PathBuf,

    /// Admin API version, overrides SHOPIFY_API_VERSION
    #[arg(long)]
    api_version: Option<ApiVersion>,

    /// Run a single task instead of both
    #[arg(long, value_enum)]
    only: Option<Task>,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Task {
    Leaderboard,
    FlagCapture,
}

impl Cli {
    fn runs(&self, task: Task) -> bool {
        self.only.map_or(true, |only| only == task)
    }
}

fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_flag_report<W: Write>(out: &mut W, report: &FlagCaptureReport) -> io::Result<()> {
    writeln!(out, "Found flag product: {}", report.product.title)?;
    match &report.inventory_warning {
        Some(e) => writeln!(out, "Warning: failed to disable inventory tracking: {e}")?,
        None => writeln!(out, "Inventory tracking disabled")?,
    }
    match &report.outcome {
        FlagCaptureOutcome::Captured(order) => {
            writeln!(out, "FLAG CAPTURED! Found order {} with flag product!", order.name)
        }
        FlagCaptureOutcome::ManualFallback { miss, instructions } => {
            writeln!(out, "No existing flag orders found: {miss}")?;
            writeln!(out, "\n{instructions}")
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    println!("Shopify Admin Tasks");
    println!("===================");

    let config = match TasksConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("failed to load configuration: {e}");
            return ExitCode::FAILURE;
        }
    };
    let config = match cli.api_version.clone() {
        Some(version) => config.with_api_version(version),
        None => config,
    };

    let client = match GraphqlClient::new(&config) {
        Ok(client) => client,
        Err(e) => {
            tracing::error!("failed to create Shopify client: {e}");
            return ExitCode::FAILURE;
        }
    };

    if cli.runs(Task::Leaderboard) {
        println!("\nTask 1: Generating customer leaderboard...");
        let options = LeaderboardOptions {
            output_path: cli.output.clone(),
            ..LeaderboardOptions::default()
        };
        match generate_customer_leaderboard(&client, &options).await {
            Ok(report) => println!(
                "Customer leaderboard exported successfully ({} customers to {})",
                report.exported,
                report.output_path.display()
            ),
            Err(e) => tracing::error!("Task 1 failed: {e}"),
        }
    }

    if cli.runs(Task::FlagCapture) {
        println!("\nTask 2: Capture the flag...");
        match capture_the_flag(&client, &config, &FlagCaptureOptions::default()).await {
            Ok(report) => {
                if let Err(e) = print_flag_report(&mut io::stdout().lock(), &report) {
                    tracing::error!("failed to print flag capture report: {e}");
                }
            }
            Err(e) => tracing::error!("Task 2 failed: {e}"),
        }
    }

    println!("\nAll tasks completed");
    ExitCode::SUCCESS
}
