// gardena-core: Identifier resolution, device queries, and mower commands
// between gardena-api and accessory hosts (CLI, smart-home bridges).

pub mod command;
pub mod config;
pub mod error;
pub mod mower;
pub mod query;
pub mod resolver;

// ── Primary re-exports ──────────────────────────────────────────────
pub use command::{CommandDispatcher, MowerCommand};
pub use config::{
    AccessoryInfo, DEFAULT_START_DURATION_SECS, IdentifierStrategy, MowerConfig, default_base_url,
};
pub use error::CoreError;
pub use mower::Mower;
pub use query::{
    BATTERY_CHARGING, BATTERY_LEVEL, DeviceQuery, FieldPath, LOW_BATTERY_THRESHOLD, MOWER_STATUS,
    MOWING_STATUSES, MowerState, is_low_battery, is_mowing,
};
pub use resolver::IdentifierResolver;

pub use gardena_api::{CommandAck, Device, DeviceList, Location};
