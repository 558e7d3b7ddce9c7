// gardena-api: Async Rust client for the Gardena smart system cloud API

pub mod auth;
pub mod client;
pub mod devices;
pub mod error;
pub mod locations;
pub mod login;
pub mod models;
pub mod transport;

pub use auth::{Credentials, EXPIRY_SAFETY_MARGIN, Token, TokenCache};
pub use client::{DEFAULT_BASE_URL, DEFAULT_PROVIDER, GardenaClient};
pub use error::Error;
pub use models::{
    Ability, CommandAck, CommandRequest, Device, DeviceList, Location, LocationList, Property,
};
pub use transport::{TlsMode, TransportConfig};
