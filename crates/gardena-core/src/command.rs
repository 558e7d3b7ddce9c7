// ── Command dispatch ──
//
// Mower commands are a name plus optional parameters, posted once to the
// mower's command endpoint. No retry and no idempotency key.

use std::sync::Arc;

use serde_json::Value;
use strum::{Display, IntoStaticStr};
use tracing::{info, warn};

use gardena_api::{CommandAck, CommandRequest, GardenaClient};

use crate::error::CoreError;
use crate::resolver::IdentifierResolver;

/// The commands the mower ability accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum MowerCommand {
    /// Mow now for `duration_secs`, ignoring the schedule.
    StartOverrideTimer { duration_secs: u32 },
    /// Go back to following the schedule.
    StartResumeSchedule,
    /// Return to the station until the next scheduled start.
    ParkUntilNextTimer,
    /// Return to the station and ignore the schedule.
    ParkUntilFurtherNotice,
}

impl MowerCommand {
    /// Wire name, e.g. `start_override_timer`.
    pub fn name(&self) -> &'static str {
        self.into()
    }

    pub fn to_request(&self) -> CommandRequest {
        let request = CommandRequest::new(self.name());
        match *self {
            Self::StartOverrideTimer { duration_secs } => {
                request.with_parameter("duration", duration_secs)
            }
            Self::StartResumeSchedule | Self::ParkUntilNextTimer | Self::ParkUntilFurtherNotice => {
                request
            }
        }
    }
}

/// Sends commands to the resolved mower.
#[derive(Debug, Clone)]
pub struct CommandDispatcher {
    client: Arc<GardenaClient>,
    ids: Arc<IdentifierResolver>,
}

impl CommandDispatcher {
    pub fn new(client: Arc<GardenaClient>, ids: Arc<IdentifierResolver>) -> Self {
        Self { client, ids }
    }

    pub async fn send(&self, command: MowerCommand) -> Result<CommandAck, CoreError> {
        self.send_request(&command.to_request()).await
    }

    /// Send an arbitrary command by name.
    pub async fn send_named(
        &self,
        name: &str,
        parameters: Option<serde_json::Map<String, Value>>,
    ) -> Result<CommandAck, CoreError> {
        let request = CommandRequest {
            name: name.to_owned(),
            parameters,
        };
        self.send_request(&request).await
    }

    /// Post `request` exactly once.
    ///
    /// If the outcome is unknown (client-side timeout, dropped connection)
    /// the command may or may not have run; sending it again is the
    /// caller's decision and may execute it twice.
    pub async fn send_request(&self, request: &CommandRequest) -> Result<CommandAck, CoreError> {
        let name = request.name.as_str();
        let unresolved = |err: CoreError| match err {
            CoreError::Auth { .. } => err,
            other => CoreError::Command {
                command: name.to_owned(),
                message: other.to_string(),
                status: None,
            },
        };

        let mower_id = self.ids.mower_id(&self.client).await.map_err(unresolved)?;
        let location_id = self
            .ids
            .location_id(&self.client)
            .await
            .map_err(unresolved)?;

        match self
            .client
            .send_mower_command(&mower_id, &location_id, request)
            .await
        {
            Ok(ack) => {
                info!(command = name, status = ack.status, "command accepted");
                Ok(ack)
            }
            Err(err) => {
                if err.is_not_found() {
                    warn!(%mower_id, "mower not found, clearing identifiers");
                    self.ids.invalidate().await;
                }
                Err(CoreError::command(name, err))
            }
        }
    }
}
