// Provider API wire types
//
// Request bodies and response documents for the token, location, device,
// and command endpoints. Fields use `#[serde(default)]` liberally because
// the provider omits empty collections and optional attributes.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Treat an explicit `null` like an absent field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

// ── Token ────────────────────────────────────────────────────────────

/// Body for `POST auth/token`:
/// `{"data":{"type":"token","attributes":{"username":..,"password":..}}}`
#[derive(Debug, Serialize)]
pub(crate) struct TokenRequest<'a> {
    pub data: TokenRequestData<'a>,
}

#[derive(Debug, Serialize)]
pub(crate) struct TokenRequestData<'a> {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub attributes: TokenRequestAttributes<'a>,
}

#[derive(Debug, Serialize)]
pub(crate) struct TokenRequestAttributes<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

/// Response of `POST auth/token`. Every field is optional at this level so
/// a missing one can be reported as an authentication failure instead of a
/// parse error.
#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponse {
    pub data: Option<TokenData>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TokenData {
    pub id: Option<String>,
    #[serde(default)]
    pub attributes: Option<TokenAttributes>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TokenAttributes {
    /// Lifetime in seconds.
    pub expires_in: Option<u64>,
    #[serde(default)]
    pub provider: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
}

// ── Locations ────────────────────────────────────────────────────────

/// Response of `GET locations`. Older deployments answer with a
/// `locations` array, JSON:API ones with `data`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct LocationList {
    #[serde(default, alias = "data", deserialize_with = "null_as_default")]
    pub locations: Vec<Location>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Location {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    /// Catch-all for fields we don't model (JSON:API `attributes`, geo data).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Location {
    /// Display name, from the top level or from JSON:API `attributes.name`.
    pub fn display_name(&self) -> Option<&str> {
        self.name.as_deref().or_else(|| {
            self.extra
                .get("attributes")
                .and_then(|a| a.get("name"))
                .and_then(Value::as_str)
        })
    }
}

// ── Devices ──────────────────────────────────────────────────────────

/// Response of `GET devices?locationId=..`, the full device snapshot.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct DeviceList {
    #[serde(default, deserialize_with = "null_as_default")]
    pub devices: Vec<Device>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Device {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    /// `mower`, `gateway`, `sensor`, ...
    #[serde(default, deserialize_with = "null_as_default")]
    pub category: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub abilities: Vec<Ability>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Ability {
    #[serde(default)]
    pub id: Option<String>,
    /// `robotic_mower`, `battery_power`, `radio_link`, ...
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub ability_type: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub properties: Vec<Property>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Property {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default)]
    pub value: Value,
    #[serde(default)]
    pub timestamp: Option<String>,
}

impl DeviceList {
    /// First device of the given category, in provider order.
    pub fn first_in_category(&self, category: &str) -> Option<&Device> {
        self.devices.iter().find(|d| d.category == category)
    }

    pub fn device(&self, id: &str) -> Option<&Device> {
        self.devices.iter().find(|d| d.id == id)
    }

    /// The device `preferred` names when it is present and of `category`,
    /// otherwise the first device of `category`.
    pub fn select(&self, category: &str, preferred: Option<&str>) -> Option<&Device> {
        preferred
            .and_then(|id| self.device(id))
            .filter(|d| d.category == category)
            .or_else(|| self.first_in_category(category))
    }

    /// Value of `property` under `ability` on the first device of
    /// `category`. `None` when any segment is missing or the value is null.
    pub fn property_value(&self, category: &str, ability: &str, property: &str) -> Option<&Value> {
        self.property_value_on(category, None, ability, property)
    }

    /// Like [`property_value`](Self::property_value), read from the device
    /// [`select`](Self::select) picks.
    pub fn property_value_on(
        &self,
        category: &str,
        preferred: Option<&str>,
        ability: &str,
        property: &str,
    ) -> Option<&Value> {
        self.select(category, preferred)?
            .ability(ability)?
            .property(property)
            .map(|p| &p.value)
            .filter(|v| !v.is_null())
    }
}

impl Device {
    pub fn ability(&self, ability_type: &str) -> Option<&Ability> {
        self.abilities.iter().find(|a| a.ability_type == ability_type)
    }
}

impl Ability {
    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.name == name)
    }
}

// ── Commands ─────────────────────────────────────────────────────────

/// Body for `POST devices/{id}/abilities/mower/command`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommandRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Map<String, Value>>,
}

impl CommandRequest {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parameters: None,
        }
    }

    pub fn with_parameter(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.parameters
            .get_or_insert_with(Map::new)
            .insert(key.into(), value.into());
        self
    }
}

/// What the provider answered to a command. The payload is whatever the
/// endpoint returned, `None` for an empty body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommandAck {
    pub status: u16,
    pub payload: Option<Value>,
}
