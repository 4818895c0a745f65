// UI layer: the two screens rendered as interactive terminal flows using
// `dialoguer`, plus the main menu and the router entry point. Screen logic
// lives in `add_user` and `guest`; this module only prompts and prints.

use anyhow::Result;
use crossterm::style::Stylize;
use dialoguer::{Confirm, Input, Select};

use crate::add_user::{AddUserForm, GuestLinkDialog};
use crate::api::RsvpApi;
use crate::clipboard::TerminalClipboard;
use crate::config::Config;
use crate::guest::{GuestCount, Panel, RsvpFlow};
use crate::notify::{Notifier, TerminalNotifier};
use crate::route::Route;
use crate::validation::{
    validate, Rule, MOBILE_NUMBER_RULES, NAME_RULES, OTP_RULES, RSVP_NAME_RULES,
};

/// Main interactive menu. Runs until the user chooses "Exit".
pub fn main_menu<A: RsvpApi + ?Sized>(api: &A, config: &Config) -> Result<()> {
    let items = ["Add guest", "Open guest link", "Exit"];
    loop {
        let selection = Select::new().items(&items).default(0).interact()?;
        match selection {
            0 => add_user_screen(api, config, AddUserForm::new())?,
            1 => {
                let link: String = Input::new()
                    .with_prompt("Guest link or path")
                    .interact_text()?;
                open(api, config, &link)?;
            }
            _ => break,
        }
    }
    Ok(())
}

/// Route `input` (a link or a path) to the matching screen.
pub fn open<A: RsvpApi + ?Sized>(api: &A, config: &Config, input: &str) -> Result<()> {
    match Route::parse(input) {
        Route::AddUser => add_user_screen(api, config, AddUserForm::new()),
        Route::Guest(mobile_number) => guest_screen(api, &mobile_number),
        Route::Unknown(path) => {
            TerminalNotifier::new().error(&format!("No page at {path}"));
            Ok(())
        }
    }
}

/// Add-User screen: prompt, submit, then show the guest link dialog.
pub fn add_user_screen<A: RsvpApi + ?Sized>(
    api: &A,
    config: &Config,
    mut form: AddUserForm,
) -> Result<()> {
    let notifier = TerminalNotifier::new();
    let actions = ["Submit", "Reset", "Back"];

    loop {
        form.name = prompt("Name", &form.name, NAME_RULES)?;
        form.mobile_number = prompt("Mobile Number", &form.mobile_number, MOBILE_NUMBER_RULES)?;

        match Select::new().items(&actions).default(0).interact()? {
            0 => {
                let result = notifier.busy("Adding guest...", || {
                    form.submit(api, &notifier, &config.links.guest_base_url).cloned()
                });
                // Failures are already toasted; the fields stay for another try.
                if let Ok(dialog) = result {
                    link_dialog(&mut form, &dialog, &notifier)?;
                    if !Confirm::new()
                        .with_prompt("Add another guest?")
                        .default(true)
                        .interact()?
                    {
                        return Ok(());
                    }
                }
            }
            1 => form.reset(),
            _ => return Ok(()),
        }
    }
}

fn link_dialog(
    form: &mut AddUserForm,
    dialog: &GuestLinkDialog,
    notifier: &TerminalNotifier,
) -> Result<()> {
    println!();
    println!("{}", GuestLinkDialog::TITLE.bold());
    println!("  {}", dialog.link.as_str().cyan().underlined());
    println!();

    let items = ["Copy Link", "Close"];
    loop {
        match Select::new().items(&items).default(0).interact()? {
            0 => {
                // The outcome is toasted either way.
                let _ = form.copy_link(&TerminalClipboard, notifier);
            }
            _ => {
                form.close_dialog();
                return Ok(());
            }
        }
    }
}

/// Guest screen: OTP, RSVP details, thank-you.
pub fn guest_screen<A: RsvpApi + ?Sized>(api: &A, mobile_number: &str) -> Result<()> {
    let notifier = TerminalNotifier::new();

    let mut flow = notifier.busy("Looking up your invitation...", || {
        RsvpFlow::mount(api, &notifier, mobile_number)
    });

    loop {
        let panel = flow.panel();
        heading(&panel);
        match panel {
            Panel::NotFound | Panel::ThankYou => return Ok(()),
            Panel::OtpEntry => {
                let otp = prompt("OTP Code", "", OTP_RULES)?;
                let result = notifier.busy("Verifying...", || flow.submit_otp(&otp));
                if result.is_err() && !retry()? {
                    return Ok(());
                }
            }
            Panel::RsvpForm { name, guest_count } => {
                let name = prompt("Your Full Name", &name, RSVP_NAME_RULES)?;
                flow.set_name(name)?;

                let labels: Vec<String> = GuestCount::ALL.iter().map(ToString::to_string).collect();
                let picked = Select::new()
                    .with_prompt("How many guests will you bring?")
                    .items(&labels)
                    .default(usize::from(guest_count.get()))
                    .interact()?;
                flow.select_guests(GuestCount::ALL[picked])?;

                let result = notifier.busy("Submitting RSVP...", || flow.submit_rsvp());
                if result.is_err() && !retry()? {
                    return Ok(());
                }
            }
        }
    }
}

fn heading(panel: &Panel) {
    println!();
    println!("{}", panel.title().bold());
    if let Some(body) = panel.body() {
        println!("{}", body.dim());
    }
}

fn retry() -> Result<bool> {
    Ok(Confirm::new().with_prompt("Try again?").default(true).interact()?)
}

/// Prompt for a text field, validating it against `rules` inline.
fn prompt(label: &str, initial: &str, rules: &'static [Rule]) -> Result<String> {
    let value = Input::<String>::new()
        .with_prompt(label)
        .with_initial_text(initial)
        .allow_empty(true)
        .validate_with(move |input: &String| validate(input, rules))
        .interact_text()?;
    Ok(value)
}
