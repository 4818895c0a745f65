// Add-User screen controller: the organizer enters a guest, the API stores
// it, and the resulting guest link is shown in a dialog that can copy it.

use tracing::{info, warn};

use crate::api::{NewUserRequest, RsvpApi};
use crate::clipboard::Clipboard;
use crate::error::FlowError;
use crate::notify::Notifier;
use crate::route::guest_link;
use crate::validation::{validate, MOBILE_NUMBER_RULES, NAME_RULES};

const ADD_FAILED: &str = "Failed to add user. Please try again.";
const SERVER_ERROR: &str = "Server error. Please try again later.";
const LINK_FAILED: &str = "User added, but the guest link could not be built.";

/// Confirmation shown after a guest was added.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuestLinkDialog {
    pub link: String,
}

impl GuestLinkDialog {
    pub const TITLE: &'static str = "User Added Successfully";
}

/// Field values plus the (optional) open dialog.
#[derive(Debug, Default)]
pub struct AddUserForm {
    pub name: String,
    pub mobile_number: String,
    dialog: Option<GuestLinkDialog>,
}

impl AddUserForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-fill the fields, e.g. from command-line flags.
    pub fn with_values(name: impl Into<String>, mobile_number: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            mobile_number: mobile_number.into(),
            dialog: None,
        }
    }

    pub fn dialog(&self) -> Option<&GuestLinkDialog> {
        self.dialog.as_ref()
    }

    /// Clear both fields. The dialog is left as it is.
    pub fn reset(&mut self) {
        self.name.clear();
        self.mobile_number.clear();
    }

    /// Check the field rules and build the request body.
    pub fn validate(&self) -> Result<NewUserRequest, FlowError> {
        validate(&self.name, NAME_RULES).map_err(FlowError::Validation)?;
        validate(&self.mobile_number, MOBILE_NUMBER_RULES).map_err(FlowError::Validation)?;
        Ok(NewUserRequest {
            name: self.name.trim().to_string(),
            mobile_number: self.mobile_number.clone(),
        })
    }

    /// Submit the form.
    ///
    /// On success the guest link dialog opens and the fields are cleared. On
    /// failure an error toast is raised and the fields are kept for a retry.
    /// Validation failures make no API call and raise no toast; the prompt
    /// shows them next to the field.
    pub fn submit<A, N>(
        &mut self,
        api: &A,
        notifier: &N,
        guest_base_url: &str,
    ) -> Result<&GuestLinkDialog, FlowError>
    where
        A: RsvpApi + ?Sized,
        N: Notifier + ?Sized,
    {
        let req = self.validate()?;

        let user = match api.add_user(&req) {
            Ok(user) => user,
            Err(err) => {
                warn!(error = %err, "add user failed");
                let fallback = if err.is_upstream() { ADD_FAILED } else { SERVER_ERROR };
                notifier.error(err.user_message(fallback));
                return Err(err.into());
            }
        };

        // `parse_added_user` guarantees the number; fall back to what was sent.
        let mobile_number = user.mobile_number.unwrap_or(req.mobile_number);
        // The guest exists server-side from here on, so the fields are cleared
        // even if the link cannot be built.
        self.reset();
        let link = match guest_link(guest_base_url, &mobile_number) {
            Ok(link) => link,
            Err(err) => {
                warn!(error = %err, "guest link could not be built");
                notifier.error(LINK_FAILED);
                return Err(err.into());
            }
        };
        info!(%link, "guest added");

        Ok(self.dialog.insert(GuestLinkDialog { link }))
    }

    /// Copy the dialog's link to the clipboard, reporting the outcome.
    pub fn copy_link<C, N>(&self, clipboard: &C, notifier: &N) -> Result<(), FlowError>
    where
        C: Clipboard + ?Sized,
        N: Notifier + ?Sized,
    {
        let dialog = self.dialog.as_ref().ok_or(FlowError::Unavailable)?;
        match clipboard.write_text(&dialog.link) {
            Ok(()) => {
                notifier.success("Link copied to clipboard!");
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "clipboard write failed");
                notifier.error("Failed to copy");
                Err(err.into())
            }
        }
    }

    pub fn close_dialog(&mut self) {
        self.dialog = None;
    }
}
