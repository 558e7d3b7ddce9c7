// ── Identifier resolution ──
//
// Location and mower ids either come straight from configuration or are
// discovered from the provider and memoized for the life of the process.
// Each slot is guarded by its own async mutex held across the lookup, so
// overlapping callers wait for one lookup instead of racing their own.
// Lock order is always mower -> location.

use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use gardena_api::GardenaClient;

use crate::config::IdentifierStrategy;
use crate::error::CoreError;

const LOCATION: &str = "location id";
const MOWER: &str = "mower id";

/// Category of the devices that can be driven as a mower.
pub const MOWER_CATEGORY: &str = "mower";

/// Resolves and memoizes the location and mower ids.
#[derive(Debug)]
pub struct IdentifierResolver {
    strategy: IdentifierStrategy,
    location: Mutex<Option<String>>,
    mower: Mutex<Option<String>>,
}

impl IdentifierResolver {
    pub fn new(strategy: IdentifierStrategy) -> Self {
        Self {
            strategy,
            location: Mutex::new(None),
            mower: Mutex::new(None),
        }
    }

    pub fn strategy(&self) -> &IdentifierStrategy {
        &self.strategy
    }

    /// The location every device call is scoped by.
    pub async fn location_id(&self, client: &GardenaClient) -> Result<String, CoreError> {
        match &self.strategy {
            IdentifierStrategy::Static { location_id, .. } => {
                configured("location-id", location_id.as_deref())
            }
            IdentifierStrategy::Discover => {
                let mut slot = self.location.lock().await;
                if let Some(id) = slot.as_ref() {
                    return Ok(id.clone());
                }

                let locations = client
                    .list_locations()
                    .await
                    .map_err(|e| CoreError::resolution(LOCATION, e))?;
                let id = locations
                    .into_iter()
                    .map(|l| l.id)
                    .find(|id| !id.is_empty())
                    .ok_or_else(|| CoreError::Resolution {
                        identifier: LOCATION,
                        reason: "the account has no locations".into(),
                    })?;

                info!(location_id = %id, "resolved location");
                *slot = Some(id.clone());
                Ok(id)
            }
        }
    }

    /// The device commands are sent to. Discovery resolves the location
    /// first, then picks the first `mower` device listed there.
    pub async fn mower_id(&self, client: &GardenaClient) -> Result<String, CoreError> {
        match &self.strategy {
            IdentifierStrategy::Static { mower_id, .. } => {
                configured("mower-id", mower_id.as_deref())
            }
            IdentifierStrategy::Discover => {
                let mut slot = self.mower.lock().await;
                if let Some(id) = slot.as_ref() {
                    return Ok(id.clone());
                }

                let location_id = self.location_id(client).await?;
                let devices = client
                    .list_devices(&location_id)
                    .await
                    .map_err(|e| CoreError::resolution(MOWER, e))?;
                let id = devices
                    .devices
                    .iter()
                    .find(|d| d.category == MOWER_CATEGORY && !d.id.is_empty())
                    .map(|d| d.id.clone())
                    .ok_or_else(|| CoreError::Resolution {
                        identifier: MOWER,
                        reason: format!("no mower in location {location_id}"),
                    })?;

                info!(mower_id = %id, "resolved mower");
                *slot = Some(id.clone());
                Ok(id)
            }
        }
    }

    /// The mower id if it is configured or already discovered. Never
    /// touches the network.
    pub async fn known_mower_id(&self) -> Option<String> {
        match &self.strategy {
            IdentifierStrategy::Static { mower_id, .. } => {
                configured("mower-id", mower_id.as_deref()).ok()
            }
            IdentifierStrategy::Discover => self.mower.lock().await.clone(),
        }
    }

    /// Forget discovered ids so the next call looks them up again.
    /// Static ids are unaffected.
    pub async fn invalidate(&self) {
        if self.strategy != IdentifierStrategy::Discover {
            debug!("static identifiers, nothing to invalidate");
            return;
        }
        let mut mower = self.mower.lock().await;
        let mut location = self.location.lock().await;
        let had_mower = mower.take().is_some();
        if location.take().is_some() || had_mower {
            warn!("cleared discovered identifiers");
        }
    }
}

fn configured(key: &str, value: Option<&str>) -> Result<String, CoreError> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_owned()),
        _ => Err(CoreError::Config {
            message: format!("please set `{key}` in the configuration"),
        }),
    }
}
