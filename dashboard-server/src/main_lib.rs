use std::sync::Arc;

use dashboard_core::{Config, ProviderId, Providers};
use serde::Serialize;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

use crate::config::ServerConfig;

/// Whether a provider credential is present; never the value itself.
#[derive(Debug, Clone, Serialize)]
pub struct CredentialStatus {
    pub provider: &'static str,
    pub env_var: &'static str,
    pub set: bool,
    pub length: usize,
}

pub struct AppState {
    pub providers: Providers,
    pub credentials: Vec<CredentialStatus>,
    pub port: u16,
}

impl AppState {
    pub fn new(providers: Providers, config: &Config, port: u16) -> Self {
        let credentials = ProviderId::all()
            .iter()
            .map(|id| {
                let key = config.provider_api_key(*id);
                CredentialStatus {
                    provider: id.as_str(),
                    env_var: id.env_var(),
                    set: key.is_some(),
                    length: key.map_or(0, str::len),
                }
            })
            .collect();

        Self {
            providers,
            credentials,
            port,
        }
    }
}

pub fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(json.then(|| fmt::layer().json().with_current_span(false)))
        .with((!json).then(fmt::layer))
        .init();
}

pub fn build_state(config: &Config, server: &ServerConfig) -> Arc<AppState> {
    for id in ProviderId::all().iter().filter(|id| !config.is_provider_configured(**id)) {
        tracing::warn!(provider = %id, env_var = id.env_var(), "credential not set");
    }

    let providers = Providers::from_config(config);
    Arc::new(AppState::new(providers, config, server.listen_addr.port()))
}
