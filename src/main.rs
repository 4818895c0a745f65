// Entrypoint for the RSVP terminal client.
// - Resolves config (file, environment, flags), sets up logging, builds the
//   API client and hands it to the screen picked on the command line.

use anyhow::Context;
use clap::Parser;

use rsvp_cli::add_user::AddUserForm;
use rsvp_cli::api::ApiClient;
use rsvp_cli::cli::{Cli, Command};
use rsvp_cli::config::{Config, ConfigNote, Resolved};
use rsvp_cli::{logging, ui};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let Resolved { mut config, notes } = Config::resolve(cli.config.as_deref())?;
    cli.apply_to(&mut config);

    logging::init(&config.logging).context("Failed to initialise logging")?;
    notes.iter().for_each(ConfigNote::log);
    tracing::debug!(api = %config.api.base_url, guest = %config.links.guest_base_url, "configuration resolved");

    let api = ApiClient::from_config(&config.api)?;

    match cli.command {
        None => ui::main_menu(&api, &config),
        Some(Command::AddUser { name, mobile }) => {
            let form = AddUserForm::with_values(name.unwrap_or_default(), mobile.unwrap_or_default());
            ui::add_user_screen(&api, &config, form)
        }
        Some(Command::Guest { mobile }) => ui::guest_screen(&api, &mobile),
        Some(Command::Open { link }) => ui::open(&api, &config, &link),
    }
}
