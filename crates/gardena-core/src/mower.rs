// ── Mower accessory ──
//
// The request/response contract a smart-home host binds its
// characteristics to: one getter per characteristic and one setter for
// the on/off switch. Host-specific callback glue lives outside this crate.

use std::sync::Arc;

use tracing::debug;

use gardena_api::{
    CommandAck, Credentials, DeviceList, GardenaClient, Location, TlsMode, TransportConfig,
};

use crate::command::{CommandDispatcher, MowerCommand};
use crate::config::{AccessoryInfo, MowerConfig};
use crate::error::CoreError;
use crate::query::{DeviceQuery, MowerState};
use crate::resolver::IdentifierResolver;

/// One mower exposed as an accessory.
///
/// Cheaply cloneable; clones share the token cache and resolved ids.
#[derive(Debug, Clone)]
pub struct Mower {
    inner: Arc<MowerInner>,
}

#[derive(Debug)]
struct MowerInner {
    config: MowerConfig,
    client: Arc<GardenaClient>,
    ids: Arc<IdentifierResolver>,
    query: DeviceQuery,
    commands: CommandDispatcher,
}

impl Mower {
    /// Build the HTTP client from `config` and wire the components.
    /// Does not touch the network.
    pub fn new(config: MowerConfig) -> Result<Self, CoreError> {
        let transport = TransportConfig {
            tls: config
                .ca_cert
                .clone()
                .map_or(TlsMode::System, TlsMode::CustomCa),
            timeout: config.timeout,
        };
        let credentials = Credentials::new(config.username.clone(), config.password.clone());
        let client = GardenaClient::new(config.base_url.clone(), credentials, &transport)?
            .with_provider(config.provider.clone());
        Ok(Self::with_client(config, client))
    }

    /// Wire the components around an existing client. The client's base
    /// URL and credentials win over those in `config`.
    pub fn with_client(config: MowerConfig, client: GardenaClient) -> Self {
        let client = Arc::new(client);
        let ids = Arc::new(IdentifierResolver::new(config.identifiers.clone()));
        let query = DeviceQuery::new(Arc::clone(&client), Arc::clone(&ids));
        let commands = CommandDispatcher::new(Arc::clone(&client), Arc::clone(&ids));
        Self {
            inner: Arc::new(MowerInner {
                config,
                client,
                ids,
                query,
                commands,
            }),
        }
    }

    pub fn config(&self) -> &MowerConfig {
        &self.inner.config
    }

    pub fn client(&self) -> &GardenaClient {
        &self.inner.client
    }

    pub fn identifiers(&self) -> &IdentifierResolver {
        &self.inner.ids
    }

    pub fn query(&self) -> &DeviceQuery {
        &self.inner.query
    }

    pub fn commands(&self) -> &CommandDispatcher {
        &self.inner.commands
    }

    pub fn accessory_info(&self) -> &AccessoryInfo {
        &self.inner.config.info
    }

    // ── Characteristics ──────────────────────────────────────────

    /// Status, battery level, and charging flag from one snapshot.
    pub async fn state(&self) -> Result<MowerState, CoreError> {
        self.inner.query.state().await
    }

    /// 1 while mowing, 0 otherwise (including when no status is reported).
    pub async fn mowing_characteristic(&self) -> Result<u8, CoreError> {
        let status = self.inner.query.mower_status().await?;
        let mowing = status.as_deref().is_some_and(crate::query::is_mowing);
        debug!(?status, mowing, "mowing characteristic");
        Ok(u8::from(mowing))
    }

    /// Battery percentage, 0–100.
    pub async fn battery_level_characteristic(&self) -> Result<Option<u8>, CoreError> {
        let level = self.inner.query.battery_level().await?;
        debug!(?level, "battery level characteristic");
        Ok(level)
    }

    /// 1 while charging, 0 otherwise.
    pub async fn charging_state_characteristic(&self) -> Result<Option<u8>, CoreError> {
        let charging = self.inner.query.battery_charging().await?;
        debug!(?charging, "charging state characteristic");
        Ok(charging.map(u8::from))
    }

    /// 1 when the battery is below the low threshold, 0 otherwise.
    pub async fn low_battery_characteristic(&self) -> Result<Option<u8>, CoreError> {
        let level = self.inner.query.battery_level().await?;
        let low = level.map(crate::query::is_low_battery);
        debug!(?level, ?low, "low battery characteristic");
        Ok(low.map(u8::from))
    }

    /// Switch on: mow for the configured duration. Switch off: park until
    /// the next scheduled start.
    pub async fn set_mower_on(&self, on: bool) -> Result<CommandAck, CoreError> {
        debug!(on, "set mower on");
        let command = if on {
            MowerCommand::StartOverrideTimer {
                duration_secs: self.inner.config.start_duration_secs,
            }
        } else {
            MowerCommand::ParkUntilNextTimer
        };
        self.inner.commands.send(command).await
    }

    // ── Inspection ───────────────────────────────────────────────

    /// Locations visible to the account.
    pub async fn locations(&self) -> Result<Vec<Location>, CoreError> {
        self.inner
            .client
            .list_locations()
            .await
            .map_err(CoreError::query)
    }

    /// The full device snapshot of the resolved location.
    pub async fn devices(&self) -> Result<DeviceList, CoreError> {
        self.inner.query.snapshot().await
    }
}
