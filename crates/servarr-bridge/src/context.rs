//! Shared application context
//!
//! Built once at startup from validated configuration and passed to every
//! transport. A backend facade exists only when its URL and API key are both
//! set; unconfigured backends never get a client and every operation against
//! them is rejected before any network call.

use crate::facade::{MediaFacade, ServiceKind};
use servarr_common::{ArrClient, Result, ServarrError};
use servarr_config::Config;
use tracing::info;

/// Application-wide state shared by the stdio and HTTP transports
#[derive(Debug, Clone)]
pub struct AppContext {
    sonarr: Option<MediaFacade>,
    radarr: Option<MediaFacade>,
}

impl AppContext {
    /// Build the context, creating one client per configured backend.
    pub fn from_config(config: Config) -> Result<Self> {
        let sonarr = if config.sonarr.is_configured() {
            let client = ArrClient::new(
                &config.sonarr.url,
                &config.sonarr.api_key,
                config.request_timeout_seconds,
            )?;
            info!("Sonarr client initialized");
            Some(MediaFacade::new(ServiceKind::Sonarr, client))
        } else {
            None
        };

        let radarr = if config.radarr.is_configured() {
            let client = ArrClient::new(
                &config.radarr.url,
                &config.radarr.api_key,
                config.request_timeout_seconds,
            )?;
            info!("Radarr client initialized");
            Some(MediaFacade::new(ServiceKind::Radarr, client))
        } else {
            None
        };

        Ok(Self { sonarr, radarr })
    }

    /// The facade for a backend, or a "not configured" error.
    pub fn facade(&self, kind: ServiceKind) -> Result<&MediaFacade> {
        let facade = match kind {
            ServiceKind::Sonarr => self.sonarr.as_ref(),
            ServiceKind::Radarr => self.radarr.as_ref(),
        };
        facade.ok_or_else(|| ServarrError::not_configured(kind))
    }

    pub fn is_configured(&self, kind: ServiceKind) -> bool {
        match kind {
            ServiceKind::Sonarr => self.sonarr.is_some(),
            ServiceKind::Radarr => self.radarr.is_some(),
        }
    }
}
