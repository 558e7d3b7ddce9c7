//! Config subcommand handlers.

use serde::Serialize;
use tabled::Tabled;

use gardena_config::{IdentifierMode, Profile, store_password};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts, OutputFormat};
use crate::config;
use crate::error::CliError;
use crate::output;

#[derive(Clone, Serialize, Tabled)]
struct ProfileRow {
    #[tabled(rename = "Profile")]
    name: String,
    #[tabled(rename = "Active")]
    active: bool,
    #[tabled(rename = "Identifiers")]
    identifiers: &'static str,
    #[tabled(rename = "Username")]
    username: String,
}

fn profile_row(active: &str, name: &str, profile: &Profile) -> ProfileRow {
    ProfileRow {
        name: name.to_owned(),
        active: name == active,
        identifiers: match profile.identifier_mode() {
            IdentifierMode::Static => "static",
            IdentifierMode::Discover => "discover",
        },
        username: profile.username.clone().unwrap_or_else(|| "-".into()),
    }
}

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Path => {
            output::print_output(&config::config_path(global).display().to_string(), false);
            Ok(())
        }

        ConfigCommand::Show => {
            let cfg = config::load(global)?.redacted();
            let out = match global.output {
                OutputFormat::Table => cfg.to_toml()?,
                OutputFormat::Json => serde_json::to_string_pretty(&cfg)?,
                OutputFormat::JsonCompact => serde_json::to_string(&cfg)?,
            };
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::Profiles => {
            let cfg = config::load(global)?;
            let active = config::active_profile_name(global, &cfg);
            let rows: Vec<ProfileRow> = cfg
                .profile_names()
                .iter()
                .filter_map(|name| {
                    cfg.profiles
                        .get(name)
                        .map(|p| profile_row(&active, name, p))
                })
                .collect();
            let out = output::render_list(global.output, &rows, ProfileRow::clone)?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::SetPassword => {
            let cfg = config::load(global)?;
            let name = config::active_profile_name(global, &cfg);
            cfg.profile(&name)?;

            let password = rpassword::prompt_password(format!("Password for '{name}': "))?;
            if password.is_empty() {
                return Err(CliError::Config {
                    message: "password cannot be empty".into(),
                });
            }
            store_password(&name, &password)?;
            if !global.quiet {
                eprintln!("Password for profile '{name}' stored in the system keyring");
            }
            Ok(())
        }
    }
}
