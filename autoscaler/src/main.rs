use std::path::PathBuf;
use std::str::FromStr;

use autoscaler::clients::{LiveAutoScalingClient, LiveCloudWatchClient, LiveEcsClient};
use autoscaler::run::RunCoordinator;
use clap::Parser;
use tracing::{info, warn, Level};

/// ECS-style cluster autoscaler: reconciles node-group capacity and
/// per-service task counts against declarative YAML policies.
#[derive(Parser, Debug)]
#[command(name = "autoscaler")]
struct Cli {
    /// Dry run: compute and log decisions but issue no mutating calls.
    #[arg(long)]
    test: bool,

    /// Directory containing one `<cluster>.yml` file per cluster.
    #[arg(long, default_value = "./clusters")]
    clusters_dir: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenv::dotenv();

    let level = match std::env::var("LOG_LEVEL") {
        Ok(raw) => Level::from_str(&raw).unwrap_or_else(|_| {
            eprintln!("warning: unrecognized LOG_LEVEL '{raw}', defaulting to info");
            Level::INFO
        }),
        Err(_) => Level::INFO,
    };
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(level.to_string()))
        .init();

    let cli = Cli::parse();

    if cli.test {
        info!("running in dry-run mode, no mutating calls will be issued");
    }

    let ecs = LiveEcsClient::new().await;
    let asg = LiveAutoScalingClient::new().await;
    let cloudwatch = LiveCloudWatchClient::new().await;
    let http = reqwest::Client::new();

    let coordinator = RunCoordinator {
        ecs: &ecs,
        asg: &asg,
        cloudwatch: &cloudwatch,
        http: &http,
        clusters_dir: &cli.clusters_dir,
    };

    let summary = coordinator.run(cli.test).await;

    for (cluster, reason) in &summary.failed {
        warn!(%cluster, %reason, "cluster failed");
    }
    info!(
        succeeded = summary.succeeded.len(),
        failed = summary.failed.len(),
        skipped = summary.skipped_disabled.len(),
        "run complete"
    );

    Ok(())
}
