// Device endpoints
//
// The device list is the only read path: every state query fetches the
// whole snapshot for a location. Commands go to a per-device ability path.

use tracing::debug;

use crate::client::GardenaClient;
use crate::error::Error;
use crate::models::{CommandAck, CommandRequest, DeviceList};

impl GardenaClient {
    /// Fetch the full device snapshot of a location.
    ///
    /// `GET devices?locationId={location_id}`
    pub async fn list_devices(&self, location_id: &str) -> Result<DeviceList, Error> {
        let url = self.endpoint("devices")?;
        debug!(location_id, "listing devices");
        self.get(url, &[("locationId", location_id)]).await
    }

    /// Send a mower command.
    ///
    /// `POST devices/{mower_id}/abilities/mower/command?locationId={location_id}`
    /// with `{"name": .., "parameters": ..}`. Sent exactly once: there is
    /// no idempotency key, so repeating a call whose outcome is unknown
    /// (e.g. after a timeout) may run the command twice.
    pub async fn send_mower_command(
        &self,
        mower_id: &str,
        location_id: &str,
        command: &CommandRequest,
    ) -> Result<CommandAck, Error> {
        let url = self.endpoint(&format!("devices/{mower_id}/abilities/mower/command"))?;
        debug!(mower_id, location_id, name = %command.name, "sending mower command");

        let (status, payload) = self
            .post(url, &[("locationId", location_id)], command)
            .await?;
        Ok(CommandAck { status, payload })
    }
}
