//! Start / park / resume handlers.

use serde::Serialize;
use serde_json::Value;

use gardena_core::{CommandAck, Mower, MowerCommand};

use crate::cli::{GlobalOpts, ParkArgs, StartArgs};
use crate::error::CliError;
use crate::output;

#[derive(Debug, Serialize)]
struct CommandReport {
    command: &'static str,
    status: u16,
    payload: Option<Value>,
}

pub async fn start(mower: &Mower, args: &StartArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let duration_secs = args
        .duration
        .unwrap_or(mower.config().start_duration_secs);
    send(mower, MowerCommand::StartOverrideTimer { duration_secs }, global).await
}

pub async fn park(mower: &Mower, args: &ParkArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let command = if args.until_further_notice {
        MowerCommand::ParkUntilFurtherNotice
    } else {
        MowerCommand::ParkUntilNextTimer
    };
    send(mower, command, global).await
}

pub async fn resume(mower: &Mower, global: &GlobalOpts) -> Result<(), CliError> {
    send(mower, MowerCommand::StartResumeSchedule, global).await
}

async fn send(mower: &Mower, command: MowerCommand, global: &GlobalOpts) -> Result<(), CliError> {
    let CommandAck { status, payload } = mower.commands().send(command).await?;
    let report = CommandReport {
        command: command.name(),
        status,
        payload,
    };

    let out = output::render_single(global.output, &report, |r| {
        format!("{} accepted (HTTP {})", r.command, r.status)
    })?;
    output::print_output(&out, global.quiet);
    Ok(())
}
