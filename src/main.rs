use clap::Parser;
use merch_etl::config::{build_rng, LogFormat};
use merch_etl::utils::error::ErrorSeverity;
use merch_etl::utils::{logger, validation::Validate};
use merch_etl::{run_mode, CliConfig, ConvertConfig, LocalStorage};

fn main() {
    let config = CliConfig::parse();

    match config.log_format {
        LogFormat::Text => logger::init_cli_logger(config.verbose),
        LogFormat::Json => logger::init_json_logger(config.verbose),
    }

    tracing::info!("Starting merch-etl");
    tracing::debug!("CLI config: {:?}", config);

    let settings = match config
        .validate()
        .and_then(|_| ConvertConfig::load(config.config.as_deref()))
        .and_then(|settings| settings.validate().map(|_| settings))
    {
        Ok(settings) => settings,
        Err(e) => {
            tracing::error!("❌ Configuration validation failed: {}", e);
            tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    };

    let rng = build_rng(config.seed);
    let storage = LocalStorage::default();

    match run_mode(config.mode, storage, config.clone(), settings, rng) {
        Ok(output_path) => {
            tracing::info!("✨ {} conversion written to: {}", config.mode, output_path);
        }
        Err(e) => {
            tracing::error!(
                "❌ {} conversion failed: {} (Category: {:?}, Severity: {:?})",
                config.mode,
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("❌ {}", e.user_friendly_message());
            tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());

            let exit_code = match e.severity() {
                ErrorSeverity::Low => 0,      // empty result, nothing written
                ErrorSeverity::Medium => 2,   // malformed input table
                ErrorSeverity::High => 1,     // bad config or unusable data
                ErrorSeverity::Critical => 3, // filesystem failure
            };

            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }
}
