use clap::Parser;
use email_delivery::SmtpMailer;
use news_radar::config::DEFAULT_CONFIG_PATH;
use news_radar::state::DEFAULT_STATE_PATH;
use news_radar::{Fetcher, JsonStateFile, RadarConfig, RadarPipeline};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "news-radar", about = "Daily tax-reform news digest")]
struct Args {
    /// Path to the YAML configuration
    #[arg(long, env = "RADAR_CONFIG", default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Path to the seen-items JSON file
    #[arg(long, env = "RADAR_STATE", default_value = DEFAULT_STATE_PATH)]
    state: PathBuf,

    /// Render the digest to stdout without sending it or saving state
    #[arg(long)]
    dry_run: bool,

    /// Probe every configured source and exit
    #[arg(long, conflicts_with = "dry_run")]
    check_sources: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    if let Err(e) = run(args).await {
        error!("news-radar failed: {:#}", e);
        return Err(e);
    }
    Ok(())
}

async fn run(args: Args) -> anyhow::Result<()> {
    let config = RadarConfig::load_from(&args.config)?;
    info!(
        "Loaded configuration from {}: {} feeds, {} listings, {} keywords",
        args.config.display(),
        config.feeds.len(),
        config.listings.len(),
        config.keywords.len()
    );

    // Settings are checked before anything touches the network.
    let mailer = if args.dry_run || args.check_sources {
        None
    } else {
        Some(SmtpMailer::from_env()?)
    };

    let fetcher = Arc::new(Fetcher::new(config.fetch.clone())?);
    let pipeline = RadarPipeline::from_config(&config, fetcher);

    if args.check_sources {
        let mut unreachable = 0;
        for health in pipeline.check_sources().await {
            if health.reachable {
                info!("OK    {} ({})", health.name, health.url);
            } else {
                unreachable += 1;
                warn!("DOWN  {} ({})", health.name, health.url);
            }
        }
        info!("{} of {} sources unreachable", unreachable, pipeline.source_count());
        return Ok(());
    }

    let state = JsonStateFile::new(&args.state);

    match mailer {
        Some(mailer) => {
            let report = pipeline.run(&state, &mailer).await?;
            info!(
                "Delivered '{}' with {} items",
                report.digest.subject, report.digest.item_count
            );
        }
        None => {
            let report = pipeline.preview(&state).await?;
            println!("Subject: {}\n", report.digest.subject);
            println!("{}", report.digest.html_body);
            info!("Dry run: {} items rendered, nothing sent", report.selected.len());
        }
    }

    Ok(())
}
