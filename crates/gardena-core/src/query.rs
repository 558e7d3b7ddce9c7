// ── Device query layer ──
//
// Every read fetches a fresh device snapshot for the resolved location and
// looks up one (category, ability, property) path in it, on the known mower
// when the snapshot lists it and on the first device of the category
// otherwise. A path that does not match is `None`, never an error.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use gardena_api::{DeviceList, GardenaClient};

use crate::error::CoreError;
use crate::resolver::{IdentifierResolver, MOWER_CATEGORY};

/// Status values that mean the blades are running.
pub const MOWING_STATUSES: [&str; 2] = ["ok_cutting", "ok_cutting_timer_overridden"];

/// Battery percentage below which the battery counts as low.
pub const LOW_BATTERY_THRESHOLD: u8 = 20;

/// Address of one property inside a device snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldPath {
    pub category: &'static str,
    pub ability: &'static str,
    pub property: &'static str,
}

impl FieldPath {
    pub const fn new(category: &'static str, ability: &'static str, property: &'static str) -> Self {
        Self {
            category,
            ability,
            property,
        }
    }

    /// Look the path up in a snapshot, preferring the device `device_id`.
    pub fn lookup<'a>(
        &self,
        devices: &'a DeviceList,
        device_id: Option<&str>,
    ) -> Option<&'a Value> {
        devices.property_value_on(self.category, device_id, self.ability, self.property)
    }
}

pub const MOWER_STATUS: FieldPath = FieldPath::new(MOWER_CATEGORY, "robotic_mower", "status");
pub const BATTERY_LEVEL: FieldPath = FieldPath::new(MOWER_CATEGORY, "battery_power", "level");
pub const BATTERY_CHARGING: FieldPath =
    FieldPath::new(MOWER_CATEGORY, "battery_power", "charging");

/// `true` iff `status` is one of [`MOWING_STATUSES`]. Unknown and future
/// statuses count as not mowing.
pub fn is_mowing(status: &str) -> bool {
    MOWING_STATUSES.contains(&status)
}

pub fn is_low_battery(level: u8) -> bool {
    level < LOW_BATTERY_THRESHOLD
}

// ── Value coercion ───────────────────────────────────────────────────

fn as_status(value: &Value) -> Option<String> {
    value.as_str().map(str::to_owned)
}

/// Percentage from a number or numeric string, clamped to 0–100.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::as_conversions)]
fn as_level(value: &Value) -> Option<u8> {
    let raw = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    if !raw.is_finite() {
        return None;
    }
    Some(raw.round().clamp(0.0, 100.0) as u8)
}

/// Flag from a bool, `"true"`/`"false"`, or 0/1.
fn as_flag(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" => Some(true),
            "false" | "0" => Some(false),
            _ => None,
        },
        Value::Number(n) => n.as_u64().and_then(|v| match v {
            0 => Some(false),
            1 => Some(true),
            _ => None,
        }),
        _ => None,
    }
}

// ── MowerState ───────────────────────────────────────────────────────

/// The mower-related fields of one snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MowerState {
    pub status: Option<String>,
    pub battery_level: Option<u8>,
    pub charging: Option<bool>,
}

impl MowerState {
    pub fn from_snapshot(devices: &DeviceList, mower_id: Option<&str>) -> Self {
        Self {
            status: MOWER_STATUS.lookup(devices, mower_id).and_then(as_status),
            battery_level: BATTERY_LEVEL.lookup(devices, mower_id).and_then(as_level),
            charging: BATTERY_CHARGING.lookup(devices, mower_id).and_then(as_flag),
        }
    }

    pub fn is_mowing(&self) -> bool {
        self.status.as_deref().is_some_and(is_mowing)
    }

    /// `None` when the battery level is not reported.
    pub fn is_low_battery(&self) -> Option<bool> {
        self.battery_level.map(is_low_battery)
    }
}

// ── DeviceQuery ──────────────────────────────────────────────────────

/// Reads device fields for the resolved location.
#[derive(Debug, Clone)]
pub struct DeviceQuery {
    client: Arc<GardenaClient>,
    ids: Arc<IdentifierResolver>,
}

impl DeviceQuery {
    pub fn new(client: Arc<GardenaClient>, ids: Arc<IdentifierResolver>) -> Self {
        Self { client, ids }
    }

    /// Fetch the device snapshot. Never cached.
    ///
    /// A 404 means the location is gone; discovered ids are dropped so the
    /// next call can recover.
    pub async fn snapshot(&self) -> Result<DeviceList, CoreError> {
        let location_id = self.ids.location_id(&self.client).await?;
        match self.client.list_devices(&location_id).await {
            Ok(devices) => {
                debug!(count = devices.devices.len(), "fetched device snapshot");
                Ok(devices)
            }
            Err(err) => {
                if err.is_not_found() {
                    warn!(%location_id, "location not found, clearing identifiers");
                    self.ids.invalidate().await;
                }
                Err(CoreError::query(err))
            }
        }
    }

    /// Raw value at `path`, `None` if any segment is missing.
    pub async fn field(&self, path: &FieldPath) -> Result<Option<Value>, CoreError> {
        let devices = self.snapshot().await?;
        let mower_id = self.ids.known_mower_id().await;
        Ok(path.lookup(&devices, mower_id.as_deref()).cloned())
    }

    /// Raw `robotic_mower.status`, e.g. `ok_cutting`, `paused`.
    pub async fn mower_status(&self) -> Result<Option<String>, CoreError> {
        Ok(self.field(&MOWER_STATUS).await?.as_ref().and_then(as_status))
    }

    /// Battery percentage, 0–100.
    pub async fn battery_level(&self) -> Result<Option<u8>, CoreError> {
        Ok(self.field(&BATTERY_LEVEL).await?.as_ref().and_then(as_level))
    }

    pub async fn battery_charging(&self) -> Result<Option<bool>, CoreError> {
        Ok(self
            .field(&BATTERY_CHARGING)
            .await?
            .as_ref()
            .and_then(as_flag))
    }

    /// Status, level, and charging flag from a single fetch.
    pub async fn state(&self) -> Result<MowerState, CoreError> {
        let devices = self.snapshot().await?;
        let mower_id = self.ids.known_mower_id().await;
        Ok(MowerState::from_snapshot(&devices, mower_id.as_deref()))
    }
}
