use anyhow::Context;
use clap::Parser;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use hostpulse::application::config::AppConfig;
use hostpulse::application::services::scheduler::Scheduler;
use hostpulse::domain::entities::host::HostIdentity;
use hostpulse::domain::value_objects::thresholds::ThresholdSet;
use hostpulse::infrastructure::collectors::SystemSampler;
use hostpulse::infrastructure::notifications::PushNotifier;
use hostpulse::infrastructure::os::hostname::resolve_host_identity;
use hostpulse::infrastructure::persistence::DailyLogFile;
use hostpulse::infrastructure::spreadsheet::GoogleSheetsClient;
use hostpulse::presentation::cli::app::Cli;
use hostpulse::presentation::cli::commands::daemon::run_daemon;
use hostpulse::presentation::cli::formatters::cycle_fmt::print_cycle;

fn print_banner(host: &HostIdentity, config: &AppConfig, thresholds: &ThresholdSet, log: &DailyLogFile) {
    println!("{}", "━".repeat(40).cyan());
    println!("{}", "  HOSTPULSE · Host Resource Monitor".bold().cyan());
    println!("{}", "━".repeat(40).cyan());
    println!("  Host:        {}", host.as_str().bold());
    println!(
        "  Thresholds:  CPU {}% | Memory {}% | Disk {}%",
        thresholds.cpu_max, thresholds.memory_max, thresholds.disk_max
    );
    println!("  Interval:    {}s", config.poll_interval().as_secs());
    println!("  Log dir:     {}", log.dir().display());
    println!("  Spreadsheet: {}", config.google_sheet_id);
}

fn setup_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_tracing(cli.verbose);

    // The notification token may live in a local .env file
    dotenv::dotenv().ok();

    let config = if let Some(ref path) = cli.config {
        AppConfig::load_from(path)?
    } else {
        AppConfig::load()?
    };

    // Concrete adapters are only named here
    let host = resolve_host_identity().context("Cannot identify this host")?;
    let sampler = SystemSampler::new()?;
    let log = DailyLogFile::new(&config.log_directory, host.clone());
    let notifier = PushNotifier::from_config(&config.notifications)?;
    let spreadsheet = GoogleSheetsClient::new(&config.google_sheet_id, &config.spreadsheet)?;
    let thresholds = ThresholdSet::from(&config);

    let scheduler = Scheduler::new(
        &sampler,
        &log,
        &notifier,
        &spreadsheet,
        thresholds,
        &host,
        config.poll_interval(),
    );

    if cli.once {
        let report = scheduler.run_once().await?;
        print_cycle(&report, &thresholds);
        return Ok(());
    }

    print_banner(&host, &config, &thresholds, &log);
    if let Err(e) = run_daemon(&scheduler).await {
        tracing::error!("Fatal error, stopping: {e:#}");
        return Err(e);
    }
    Ok(())
}
