// Command-line surface: global overrides for config, API and guest link
// bases, plus one subcommand per screen. No subcommand opens the menu.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::Config;

#[derive(Parser, Debug)]
#[command(name = "rsvp")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Add event guests, share guest links and collect RSVPs")]
pub struct Cli {
    /// Path to a TOML config file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// RSVP API base URL
    #[arg(long, env = "RSVP_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Base URL of the guest links handed out to invitees
    #[arg(long, env = "RSVP_GUEST_BASE_URL", global = true)]
    pub guest_base_url: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Add a guest and get their link
    AddUser {
        /// Guest name (prompted when missing)
        #[arg(long)]
        name: Option<String>,

        /// 10-digit mobile number (prompted when missing)
        #[arg(long)]
        mobile: Option<String>,
    },
    /// RSVP as the guest with this mobile number
    Guest {
        mobile: String,
    },
    /// Open a guest link or path, e.g. http://event.buddyforevents.com/guest/9999999999
    Open {
        link: String,
    },
}

impl Cli {
    /// Flags win over file and environment settings.
    pub fn apply_to(&self, config: &mut Config) {
        if let Some(url) = &self.api_url {
            config.api.base_url = url.clone();
        }
        if let Some(url) = &self.guest_base_url {
            config.links.guest_base_url = url.clone();
        }
    }
}
