//! Locations command handler.

use tabled::Tabled;

use gardena_core::{Location, Mower};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct LocationRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
}

fn row(l: &Location) -> LocationRow {
    LocationRow {
        id: l.id.clone(),
        name: l.display_name().unwrap_or("-").to_owned(),
    }
}

pub async fn handle(mower: &Mower, global: &GlobalOpts) -> Result<(), CliError> {
    let locations = mower.locations().await?;
    let out = output::render_list(global.output, &locations, row)?;
    output::print_output(&out, global.quiet);
    Ok(())
}
