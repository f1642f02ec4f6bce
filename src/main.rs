mod backends;
mod config;
mod error;
mod prober;
mod store;
mod traits;
mod transport;
mod types;
mod utils;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use config::SpeedTestConfig;
use indicatif::{ProgressBar, ProgressStyle};
use prober::Prober;
use speed_test::SpeedTestManager;
use std::path::PathBuf;
use std::sync::Arc;
use store::ResultStore;
use tracing_subscriber::EnvFilter;
use transport::HttpTransport;
use types::ProbeResult;

#[derive(Parser)]
#[command(name = "domspeed")]
#[command(about = "Rank candidate domains by HTTPS latency and remember the fastest", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Probe domains and save the ranking (e.g., domspeed run a.com b.com)
    Run {
        /// Domains to probe. If omitted, uses the configured list.
        domains: Vec<String>,

        /// Read domains from a file (one per line, '#' for comments)
        #[arg(long, short)]
        file: Option<PathBuf>,

        /// Number of probes in flight at once
        #[arg(long, short)]
        concurrency: Option<usize>,
    },
    /// Show the last saved ranking without probing
    Show,
    /// Print the fastest reachable domain from the last ranking
    Fastest,
    /// Erase the saved ranking
    Clear,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = config::load();

    match cli.command {
        Commands::Run {
            domains,
            file,
            concurrency,
        } => handle_run(config, domains, file, concurrency).await?,
        Commands::Show => handle_show(&config).await?,
        Commands::Fastest => handle_fastest(&config).await?,
        Commands::Clear => handle_clear(&config).await?,
    }

    Ok(())
}

fn build_manager(config: &SpeedTestConfig) -> Result<SpeedTestManager> {
    let backend = backends::open(&config.backend, &config::data_dir())?;
    let store = ResultStore::new(backend, &config.storage_key);
    let prober = Prober::new(HttpTransport::new()?, config);
    Ok(SpeedTestManager::new(config, Arc::new(prober), store))
}

// --- Handlers ---

async fn handle_run(
    mut config: SpeedTestConfig,
    domains: Vec<String>,
    file: Option<PathBuf>,
    concurrency: Option<usize>,
) -> Result<()> {
    // timeout_ms 只能来自配置文件: 失败结果以它为延迟保存, show/fastest 需要同一个值
    if let Some(c) = concurrency {
        config.concurrency = c;
    }
    let config = config.normalized();

    let mut targets = domains;
    if let Some(path) = file {
        targets.extend(utils::read_domain_file(&path).await?);
    }
    if targets.is_empty() {
        targets = config.candidates();
    }
    if targets.is_empty() {
        bail!("No domains to probe. Pass them as arguments or use --file.");
    }

    let pb = ProgressBar::new(targets.len() as u64);
    pb.set_style(
        ProgressStyle::with_template("[{bar:40.cyan/blue}] {percent}% {msg}")?
            .progress_chars("|| "),
    );
    pb.set_message("Testing...");

    let manager = build_manager(&config)?.with_progress(pb);
    let results = manager.run_speed_test(&targets).await;

    print_table(&results, manager.sentinel());

    // Recommendation
    match results.first() {
        Some(best) if best.latency_ms < manager.sentinel() => {
            println!("{}", "-".repeat(60));
            println!("Fastest: '{}' ({:.0}ms).", best.domain, best.latency_ms);
        }
        _ => println!("No domain was reachable. Please check your network connection."),
    }

    Ok(())
}

async fn handle_show(config: &SpeedTestConfig) -> Result<()> {
    let manager = build_manager(config)?;
    let results = manager.get_results().await;

    if results.is_empty() {
        println!("No saved results. Run 'domspeed run' first.");
        return Ok(());
    }

    print_table(&results, manager.sentinel());
    Ok(())
}

async fn handle_fastest(config: &SpeedTestConfig) -> Result<()> {
    let manager = build_manager(config)?;

    match manager.fastest().await {
        Some(best) => println!("{}", best.domain),
        None => bail!("No reachable domain in saved results. Run 'domspeed run' first."),
    }

    Ok(())
}

async fn handle_clear(config: &SpeedTestConfig) -> Result<()> {
    let manager = build_manager(config)?;
    manager.clear_results().await;
    println!("Saved results cleared.");
    Ok(())
}

fn print_table(results: &[ProbeResult], sentinel: f64) {
    println!("{:<4} {:<10} DOMAIN", "RANK", "LATENCY");
    println!("{}", "-".repeat(60));

    for (i, res) in results.iter().enumerate() {
        println!(
            "{:<4} {:<10} {}",
            i + 1,
            utils::format_latency(res.latency_ms, sentinel),
            res.domain
        );
    }
}
