use clap::Parser;
use steam_review_fetch::utils::{logger, validation::Validate};
use steam_review_fetch::{run_with_config, CliConfig, ConfigProvider, FetchError, TomlConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.log_json {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting steam-review-fetch");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let result = match &cli.config {
        Some(path) => {
            tracing::info!("📁 Loading configuration from: {}", path);
            match TomlConfig::from_file(path) {
                Ok(config) => run(&config).await,
                Err(e) => Err(e),
            }
        }
        None => run(&cli).await,
    };

    match result {
        Ok(report) => {
            let total: usize = report.downloaded.iter().map(|r| r.total_reviews).sum();
            tracing::info!(
                "✅ Done: {} apps downloaded, {} skipped, {} reviews on disk",
                report.downloaded.len(),
                report.skipped.len(),
                total
            );
            Ok(())
        }
        Err(e) => {
            tracing::error!(
                "❌ Review download failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(e.exit_code());
        }
    }
}

async fn run<C: ConfigProvider + Validate>(
    config: &C,
) -> Result<steam_review_fetch::BatchReport, FetchError> {
    config.validate()?;
    tracing::info!("📂 Writing review files to: {}", config.data_dir());
    run_with_config(config).await
}
