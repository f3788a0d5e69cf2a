mod api;
mod chart;
mod cli_messages;
mod config;
mod consts;
mod error_classifier;
mod events;
mod hub;
mod indicator;
mod logging;
mod session;
mod ui;
mod workers;

use crate::api::{ApiClient, IndicatorApi};
use crate::config::{Config, get_config_path};
use crate::consts::dashboard_consts::hub::MIN_RECONNECT_INTERVAL_MS;
use crate::indicator::{IndicatorId, NewIndicator};
use crate::session::{run_headless_mode, run_tui_mode, setup_session};
use clap::{ArgAction, Parser, Subcommand};
use std::error::Error;
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
/// Command-line arguments
struct Args {
    /// Command to execute
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start the live dashboard
    Start {
        /// Run without the terminal UI, printing events to the console
        #[arg(long, action = ArgAction::SetTrue)]
        headless: bool,

        /// Disable background colors in the dashboard
        #[arg(long = "no-background-color", action = ArgAction::SetTrue)]
        no_background_color: bool,
    },
    /// List all indicators
    List,
    /// Create an indicator
    Create {
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        value: String,
        #[arg(long, default_value = "")]
        unit: String,
        /// Horizontal position on the background, in pixels
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        x: i32,
        /// Vertical position on the background, in pixels
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        y: i32,
    },
    /// Delete an indicator
    Delete {
        #[arg(long, value_name = "ID")]
        id: String,
    },
    /// Upload a background image
    UploadImage {
        /// Image file to upload
        path: PathBuf,
    },
    /// Print the URL of a stored background image
    Background {
        /// Background image number
        index: String,
    },
    /// Show or change the stored configuration
    Config {
        #[arg(long, value_name = "URL")]
        api_url: Option<String>,
        #[arg(long, value_name = "URL")]
        hub_url: Option<String>,
        /// Delay between live channel connection attempts
        #[arg(
            long,
            value_name = "MS",
            value_parser = clap::value_parser!(u64).range(MIN_RECONNECT_INTERVAL_MS..)
        )]
        reconnect_ms: Option<u64>,
        /// Stop reconnecting after this many failed attempts
        #[arg(long, value_name = "N")]
        max_reconnect_attempts: Option<u32>,
        /// Remove the configuration file and return to the defaults
        #[arg(long, action = ArgAction::SetTrue)]
        reset: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config_path = get_config_path()?;
    let args = Args::parse();

    match args.command {
        Command::Start {
            headless,
            no_background_color,
        } => {
            let config = Config::load_or_default(&config_path)?.with_env_overrides();
            let session = setup_session(config).await?;
            if headless {
                run_headless_mode(session).await
            } else {
                run_tui_mode(session, !no_background_color).await
            }
        }
        Command::Config {
            api_url,
            hub_url,
            reconnect_ms,
            max_reconnect_attempts,
            reset,
        } => {
            if reset {
                Config::clear(&config_path)?;
                print_cmd_success!("Configuration reset", "{}", config_path.display());
                return Ok(());
            }
            let mut config = Config::load_or_default(&config_path)?
                .with_overrides(api_url.clone(), hub_url.clone());
            if let Some(ms) = reconnect_ms {
                config.reconnect_interval_ms = ms;
            }
            if max_reconnect_attempts.is_some() {
                config.max_reconnect_attempts = max_reconnect_attempts;
            }
            let changed = api_url.is_some()
                || hub_url.is_some()
                || reconnect_ms.is_some()
                || max_reconnect_attempts.is_some();
            if changed {
                config.save(&config_path)?;
                print_cmd_success!("Configuration saved", "{}", config_path.display());
            }
            println!("{}", serde_json::to_string_pretty(&config)?);
            Ok(())
        }
        command => {
            let config = Config::load_or_default(&config_path)?.with_env_overrides();
            let client = ApiClient::new(config.api_url.clone())?;
            if let Err(e) = run_api_command(&client, command).await {
                print_cmd_error!("Request failed", &e.to_string());
                std::process::exit(1);
            }
            Ok(())
        }
    }
}

/// Runs a one-shot subcommand against the indicator API.
async fn run_api_command(client: &ApiClient, command: Command) -> Result<(), Box<dyn Error>> {
    match command {
        Command::List => {
            let indicators = client.list_indicators().await?;
            if indicators.is_empty() {
                print_cmd_info!("No indicators", "{}", client.base_url());
            }
            for indicator in indicators {
                println!(
                    "{}\t{}\t{} {}\t({}, {})\t{} values",
                    indicator.id,
                    indicator.name,
                    indicator.value,
                    indicator.unit,
                    indicator.position.x,
                    indicator.position.y,
                    indicator.indicator_values.len()
                );
            }
        }
        Command::Create {
            name,
            value,
            unit,
            x,
            y,
        } => {
            let id = client
                .create_indicator(&NewIndicator::new(name, value, unit, x, y))
                .await?;
            print_cmd_success!("Indicator created", "ID: {}", id);
        }
        Command::Delete { id } => {
            let id = IndicatorId::new(id);
            client.delete_indicator(&id).await?;
            print_cmd_success!("Indicator deleted", "ID: {}", id);
        }
        Command::UploadImage { path } => {
            client.upload_background_image(&path).await?;
            print_cmd_success!("Background image uploaded", "{}", path.display());
        }
        Command::Background { index } => {
            println!("{}", client.background_image_url(&index));
        }
        Command::Start { .. } | Command::Config { .. } => {}
    }
    Ok(())
}
