//! Devices command handler.

use tabled::Tabled;

use gardena_core::{Device, Mower};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct DeviceRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Abilities")]
    abilities: String,
}

fn row(d: &Device) -> DeviceRow {
    DeviceRow {
        id: d.id.clone(),
        name: d.name.clone().unwrap_or_else(|| "-".into()),
        category: d.category.clone(),
        abilities: d
            .abilities
            .iter()
            .map(|a| a.ability_type.as_str())
            .collect::<Vec<_>>()
            .join(", "),
    }
}

pub async fn handle(mower: &Mower, global: &GlobalOpts) -> Result<(), CliError> {
    let snapshot = mower.devices().await?;
    let out = output::render_list(global.output, &snapshot.devices, row)?;
    output::print_output(&out, global.quiet);
    Ok(())
}
