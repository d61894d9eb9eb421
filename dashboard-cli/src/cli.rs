use anyhow::Context;
use clap::{Parser, Subcommand};
use dashboard_core::{Config, HttpDashboardApi, Orchestrator, ProviderId};
use inquire::Password;

use crate::render::TerminalView;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "dashboard", version, about = "City dashboard: weather, news and exchange rates")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the API key for a provider in the config file.
    Configure {
        /// Provider short name: "openweather", "newsapi" or "exchangerate".
        provider: String,
    },

    /// Show which providers have a key configured.
    Providers,

    /// Load the dashboard for a city from a running server.
    Show {
        /// City name; defaults to Almaty.
        city: Option<String>,

        /// Dashboard server base URL.
        #[arg(long, default_value = "http://localhost:3000")]
        server: String,

        /// Base currency for the exchange-rate panel.
        #[arg(long, default_value = "KZT")]
        base: String,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure { provider } => {
                let id = ProviderId::try_from(provider.as_str())?;
                let api_key = Password::new(&format!("API key for {id}:"))
                    .without_confirmation()
                    .prompt()
                    .context("Failed to read API key")?;

                let mut config = Config::load()?;
                config.upsert_provider_api_key(id, api_key.trim().to_string());
                let path = config.save()?;
                tracing::info!(provider = %id, path = %path.display(), "api key saved");
                println!("Saved {id} key to {}", path.display());
            }
            Command::Providers => {
                let config = Config::load_with_env()?;
                for id in ProviderId::all() {
                    let state = if config.is_provider_configured(*id) { "configured" } else { "not set" };
                    println!("{:<14} {:<22} {state}", id.as_str(), id.env_var());
                }
            }
            Command::Show { city, server, base } => {
                let orchestrator =
                    Orchestrator::new(HttpDashboardApi::new(server), TerminalView::default()).with_currency_base(base);

                let report = orchestrator.search(city.as_deref().unwrap_or_default()).await;
                tracing::debug!(?report, "search finished");
            }
        }

        Ok(())
    }
}
