use admission_stats::config::cli::Command;
use admission_stats::core::ConfigProvider;
use admission_stats::server::{self, AppState};
use admission_stats::utils::error::{ErrorCategory, StatsError};
use admission_stats::utils::{logger, validation::Validate};
use admission_stats::{build_provider, CliConfig, StatisticsService, TomlConfig};
use clap::Parser;
use serde::Serialize;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse().with_env_api_key();

    let file_config = match &cli.config {
        Some(path) => match TomlConfig::from_file(path) {
            Ok(config) => Some(config),
            Err(e) => {
                eprintln!("❌ Failed to load {}: {}", path, e.user_friendly_message());
                eprintln!("💡 {}", e.recovery_suggestion());
                std::process::exit(exit_code(&e));
            }
        },
        None => None,
    };

    let verbose = cli.verbose || file_config.as_ref().is_some_and(|c| c.verbose_logging());
    let json_logs = cli.json_logs || file_config.as_ref().is_some_and(|c| c.json_logging());
    if json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(verbose);
    }

    tracing::info!("Starting admission-stats");
    if verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let config: &dyn ConfigProvider = match &file_config {
        Some(toml) => {
            tracing::info!("Using settings from {}", cli.config.as_deref().unwrap_or_default());
            fail_on_error(toml.validate());
            toml
        }
        None => {
            fail_on_error(cli.validate());
            &cli
        }
    };

    let provider = match build_provider(config) {
        Ok(provider) => provider,
        Err(e) => {
            report(&e);
            std::process::exit(exit_code(&e));
        }
    };

    match &cli.command {
        Command::Serve => {
            let addr = config.bind_address().parse()?;
            let state = AppState::new(provider, config.is_development());
            server::run_server(addr, state).await?;
        }
        command => {
            let service = StatisticsService::new(provider);
            if let Err(e) = run_query(&service, command).await {
                report(&e);
                std::process::exit(exit_code(&e));
            }
        }
    }

    Ok(())
}

async fn run_query(
    service: &StatisticsService<Arc<dyn admission_stats::domain::ports::DataProvider>>,
    command: &Command,
) -> admission_stats::Result<()> {
    match command {
        Command::Serve => Ok(()),
        Command::Statistics { .. } => {
            let filter = command.statistics_filter().unwrap_or_default();
            print_json(&service.list_statistics(&filter).await?)
        }
        Command::University { university_id } => {
            print_json(&service.university_statistics(university_id).await?)
        }
        Command::Geographic {
            university_id,
            year,
        } => {
            let distributions = service
                .geographic_distribution(university_id, *year)
                .await?
                .into_result()?;
            print_json(&distributions)
        }
        Command::Gender {
            university_id,
            year,
            program_id,
        } => {
            let splits = service
                .gender_distribution(university_id, *year, program_id.as_deref())
                .await?
                .into_result()?;
            print_json(&splits)
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> admission_stats::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn fail_on_error(result: admission_stats::Result<()>) {
    if let Err(e) = result {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(exit_code(&e));
    }
}

fn report(e: &StatsError) {
    tracing::error!("❌ Query failed: {} (Category: {:?})", e, e.category());
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());
}

fn exit_code(e: &StatsError) -> i32 {
    match e.category() {
        ErrorCategory::Configuration => 1,
        ErrorCategory::Provider => 2,
        ErrorCategory::Data => 3,
        ErrorCategory::System => 4,
    }
}
