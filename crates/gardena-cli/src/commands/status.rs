//! Status command: one device snapshot rendered as the accessory's
//! characteristics.

use serde::Serialize;

use gardena_core::{AccessoryInfo, Mower, MowerState};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

#[derive(Debug, Serialize)]
struct StatusReport<'a> {
    status: Option<&'a str>,
    mowing: bool,
    battery_level: Option<u8>,
    charging: Option<bool>,
    low_battery: Option<bool>,
    #[serde(flatten)]
    info: &'a AccessoryInfo,
}

impl<'a> StatusReport<'a> {
    fn new(state: &'a MowerState, info: &'a AccessoryInfo) -> Self {
        Self {
            status: state.status.as_deref(),
            mowing: state.is_mowing(),
            battery_level: state.battery_level,
            charging: state.charging,
            low_battery: state.is_low_battery(),
            info,
        }
    }
}

pub async fn handle(mower: &Mower, global: &GlobalOpts) -> Result<(), CliError> {
    let state = mower.state().await?;
    let report = StatusReport::new(&state, mower.accessory_info());
    let color = output::should_color(global.color);

    let out = output::render_single(global.output, &report, |r| detail(r, color))?;
    output::print_output(&out, global.quiet);
    Ok(())
}

fn detail(report: &StatusReport<'_>, color: bool) -> String {
    let unknown = || "-".to_owned();
    let yes_no = |flag: bool| if flag { "yes" } else { "no" };

    let mut rows = vec![
        ("Status", report.status.map_or_else(unknown, str::to_owned)),
        (
            "Mowing",
            output::paint(yes_no(report.mowing), report.mowing, color),
        ),
        (
            "Battery",
            report
                .battery_level
                .map_or_else(unknown, |level| format!("{level}%")),
        ),
        (
            "Charging",
            report.charging.map_or_else(unknown, |c| yes_no(c).to_owned()),
        ),
        (
            "Low battery",
            report
                .low_battery
                .map_or_else(unknown, |low| output::paint(yes_no(low), !low, color)),
        ),
    ];

    let info = report.info;
    for (key, value) in [
        ("Manufacturer", &info.manufacturer),
        ("Model", &info.model),
        ("Serial", &info.serial_number),
    ] {
        if let Some(value) = value {
            rows.push((key, value.clone()));
        }
    }

    output::detail(&rows)
}
