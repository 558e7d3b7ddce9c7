//! Command dispatch: bridges CLI args -> `Mower` calls -> output formatting.

pub mod config_cmd;
pub mod devices;
pub mod locations;
pub mod mower;
pub mod status;

use gardena_core::Mower;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a mower-bound command to the appropriate handler.
pub async fn dispatch(cmd: Command, mower: &Mower, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Status => status::handle(mower, global).await,
        Command::Start(args) => mower::start(mower, &args, global).await,
        Command::Park(args) => mower::park(mower, &args, global).await,
        Command::Resume => mower::resume(mower, global).await,
        Command::Locations => locations::handle(mower, global).await,
        Command::Devices => devices::handle(mower, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}
