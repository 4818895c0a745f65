// Guest screen controller: OTP verification, RSVP entry, confirmation.
//
// Every transition is gated by one completed API round trip. The step only
// ever moves forward.

use std::fmt;

use tracing::{info, warn};

use crate::api::{RsvpApi, RsvpUpdate, UserRecord};
use crate::error::{ApiError, FlowError};
use crate::notify::Notifier;
use crate::validation::{validate, OTP_RULES, RSVP_NAME_RULES};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Step {
    Otp,
    Guest,
    Done,
}

/// Number of extra attendees a guest brings, 0 to 3.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct GuestCount(u8);

impl GuestCount {
    pub const MAX: u8 = 3;

    /// The four selectable cards, in display order.
    pub const ALL: [GuestCount; 4] = [GuestCount(0), GuestCount(1), GuestCount(2), GuestCount(3)];

    #[cfg(test)]
    pub(crate) fn new(count: u8) -> Option<Self> {
        (count <= Self::MAX).then_some(GuestCount(count))
    }

    /// Map a stored `members` value onto a card: missing is 0, anything above
    /// the largest card selects the largest card.
    pub fn from_members(members: Option<u32>) -> Self {
        let count = members.unwrap_or(0).min(u32::from(Self::MAX));
        GuestCount(count as u8)
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl fmt::Display for GuestCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let noun = if self.0 == 1 { "Guest" } else { "Guests" };
        write!(f, "{} {}", self.0, noun)
    }
}

/// Everything the guest screen knows during one visit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RsvpSession {
    pub mobile_number: String,
    pub step: Step,
    pub name: Option<String>,
    pub guest_count: GuestCount,
    pub user_found: bool,
}

impl RsvpSession {
    fn new(mobile_number: String) -> Self {
        Self {
            mobile_number,
            step: Step::Otp,
            name: None,
            guest_count: GuestCount::default(),
            user_found: false,
        }
    }
}

/// What the guest screen renders for the current session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Panel {
    /// The number is unknown; nothing else can be done.
    NotFound,
    OtpEntry,
    RsvpForm { name: String, guest_count: GuestCount },
    ThankYou,
}

impl Panel {
    pub fn title(&self) -> &'static str {
        match self {
            Panel::NotFound => "🚨 User Not Found",
            Panel::OtpEntry => "Secure RSVP Access",
            Panel::RsvpForm { .. } => "Confirm Your Attendance",
            Panel::ThankYou => "🎉 RSVP Received",
        }
    }

    pub fn body(&self) -> Option<&'static str> {
        match self {
            Panel::NotFound => Some(
                "The mobile number you entered does not correspond to any registered user.",
            ),
            Panel::ThankYou => Some("Thank you for confirming. We look forward to seeing you!"),
            Panel::OtpEntry | Panel::RsvpForm { .. } => None,
        }
    }
}

/// Drives one guest's visit against the API.
pub struct RsvpFlow<'a, A: ?Sized, N: ?Sized> {
    api: &'a A,
    notifier: &'a N,
    session: RsvpSession,
}

impl<'a, A, N> RsvpFlow<'a, A, N>
where
    A: RsvpApi + ?Sized,
    N: Notifier + ?Sized,
{
    /// Open the screen for `mobile_number`: look the guest up, then ask the
    /// API to send them an OTP.
    ///
    /// A failed or empty lookup ends in the not-found panel. A failed OTP
    /// send is reported but the OTP form is still offered.
    pub fn mount(api: &'a A, notifier: &'a N, mobile_number: impl Into<String>) -> Self {
        let mut flow = Self {
            api,
            notifier,
            session: RsvpSession::new(mobile_number.into()),
        };
        if flow.session.mobile_number.is_empty() {
            return flow;
        }

        let mobile_number = flow.session.mobile_number.clone();
        match api.get_user(&mobile_number) {
            Ok(Some(_)) => {}
            Ok(None) => {
                info!(%mobile_number, "guest not found");
                notifier.error("User not found.");
                return flow;
            }
            Err(err) => {
                warn!(%mobile_number, error = %err, "guest lookup failed");
                notifier.error(err.user_message("Error fetching user. Please try again."));
                return flow;
            }
        }
        flow.session.user_found = true;

        if let Err(err) = api.send_otp(&mobile_number) {
            warn!(%mobile_number, error = %err, "sending otp failed");
            notifier.error(err.user_message("Failed to send OTP."));
        }
        flow
    }

    pub fn session(&self) -> &RsvpSession {
        &self.session
    }

    pub fn panel(&self) -> Panel {
        match (self.session.step, self.session.user_found) {
            (Step::Done, _) => Panel::ThankYou,
            (_, false) => Panel::NotFound,
            (Step::Otp, true) => Panel::OtpEntry,
            (Step::Guest, true) => Panel::RsvpForm {
                name: self.session.name.clone().unwrap_or_default(),
                guest_count: self.session.guest_count,
            },
        }
    }

    fn advance(&mut self, to: Step) {
        debug_assert!(to > self.session.step, "steps only move forward");
        info!(
            mobile_number = %self.session.mobile_number,
            from = ?self.session.step,
            to = ?to,
            "rsvp step advanced"
        );
        self.session.step = to;
    }

    fn require(&self, step: Step) -> Result<(), FlowError> {
        if self.session.user_found && self.session.step == step {
            Ok(())
        } else {
            Err(FlowError::Unavailable)
        }
    }

    /// Verify `otp`, then reload the guest's record to pre-fill the RSVP form.
    pub fn submit_otp(&mut self, otp: &str) -> Result<(), FlowError> {
        self.require(Step::Otp)?;
        validate(otp, OTP_RULES).map_err(FlowError::Validation)?;
        let otp = otp.trim();

        if let Err(err) = self.api.check_otp(&self.session.mobile_number, otp) {
            warn!(mobile_number = %self.session.mobile_number, error = %err, "otp rejected");
            self.notifier.error(err.user_message("Invalid OTP."));
            return Err(err.into());
        }

        let user = match self.api.get_user(&self.session.mobile_number) {
            Ok(Some(user)) => user,
            Ok(None) => {
                self.notifier
                    .error("Failed to load user after OTP verification.");
                return Err(ApiError::Decode("empty user record after otp".into()).into());
            }
            Err(err) => {
                warn!(mobile_number = %self.session.mobile_number, error = %err, "reload after otp failed");
                self.notifier
                    .error(err.user_message("Failed to load user after OTP verification."));
                return Err(err.into());
            }
        };

        self.seed(user);
        self.advance(Step::Guest);
        self.notifier.success("OTP verified and user data loaded!");
        Ok(())
    }

    fn seed(&mut self, user: UserRecord) {
        self.session.name = user.name;
        self.session.guest_count = GuestCount::from_members(user.members);
    }

    /// Pick a guest card. The last pick wins.
    pub fn select_guests(&mut self, count: GuestCount) -> Result<(), FlowError> {
        self.require(Step::Guest)?;
        self.session.guest_count = count;
        Ok(())
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> Result<(), FlowError> {
        self.require(Step::Guest)?;
        self.session.name = Some(name.into());
        Ok(())
    }

    /// Send the RSVP. Success ends the visit on the thank-you panel.
    pub fn submit_rsvp(&mut self) -> Result<(), FlowError> {
        self.require(Step::Guest)?;
        let name = self.session.name.as_deref().unwrap_or_default();
        validate(name, RSVP_NAME_RULES).map_err(FlowError::Validation)?;

        let update = RsvpUpdate {
            name: name.trim().to_string(),
            members: self.session.guest_count.get(),
        };
        if let Err(err) = self.api.update_rsvp(&self.session.mobile_number, &update) {
            warn!(mobile_number = %self.session.mobile_number, error = %err, "rsvp update failed");
            self.notifier.error(err.user_message("Failed to update RSVP."));
            return Err(err.into());
        }

        self.notifier
            .success("Your RSVP has been updated successfully.");
        self.advance(Step::Done);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::ToastKind;
    use crate::test_support::{upstream, user, Call, RecordingNotifier, ScriptedApi};

    const MOBILE: &str = "9999999999";

    fn found_api() -> ScriptedApi {
        ScriptedApi::new()
            .on_get_user(Ok(Some(user("Jane", MOBILE, Some(1)))))
            .on_send_otp(Ok(()))
    }

    #[test]
    fn failed_lookup_renders_not_found_without_otp_form() {
        let api = ScriptedApi::new().on_get_user(Err(upstream(404, Some("User not found"))));
        let notifier = RecordingNotifier::new();

        let mut flow = RsvpFlow::mount(&api, &notifier, MOBILE);

        assert_eq!(flow.panel(), Panel::NotFound);
        assert!(!flow.session().user_found);
        assert_eq!(api.calls(), vec![Call::GetUser(MOBILE.into())]);
        assert_eq!(notifier.errors(), vec!["User not found".to_string()]);

        assert!(matches!(flow.submit_otp("1234"), Err(FlowError::Unavailable)));
        assert_eq!(api.calls().len(), 1);
    }

    #[test]
    fn empty_lookup_is_not_found() {
        let api = ScriptedApi::new().on_get_user(Ok(None));
        let notifier = RecordingNotifier::new();

        let flow = RsvpFlow::mount(&api, &notifier, MOBILE);

        assert_eq!(flow.panel(), Panel::NotFound);
        assert_eq!(api.calls(), vec![Call::GetUser(MOBILE.into())]);
    }

    #[test]
    fn empty_id_makes_no_calls() {
        let api = ScriptedApi::new();
        let notifier = RecordingNotifier::new();

        let flow = RsvpFlow::mount(&api, &notifier, "");

        assert_eq!(flow.panel(), Panel::NotFound);
        assert!(api.calls().is_empty());
    }

    #[test]
    fn mount_sends_otp_after_successful_lookup() {
        let api = found_api();
        let notifier = RecordingNotifier::new();

        let flow = RsvpFlow::mount(&api, &notifier, MOBILE);

        assert_eq!(flow.panel(), Panel::OtpEntry);
        assert_eq!(
            api.calls(),
            vec![Call::GetUser(MOBILE.into()), Call::SendOtp(MOBILE.into())]
        );
        assert!(notifier.toasts().is_empty());
    }

    #[test]
    fn otp_send_failure_still_offers_otp_form() {
        let api = ScriptedApi::new()
            .on_get_user(Ok(Some(user("Jane", MOBILE, None))))
            .on_send_otp(Err(upstream(503, None)));
        let notifier = RecordingNotifier::new();

        let flow = RsvpFlow::mount(&api, &notifier, MOBILE);

        assert!(flow.session().user_found);
        assert_eq!(flow.panel(), Panel::OtpEntry);
        assert_eq!(notifier.errors(), vec!["Failed to send OTP.".to_string()]);
    }

    #[test]
    fn verified_otp_prefills_rsvp_form_from_fresh_record() {
        let api = found_api()
            .on_check_otp(Ok(()))
            .on_get_user(Ok(Some(user("Jane Doe", MOBILE, Some(2)))));
        let notifier = RecordingNotifier::new();
        let mut flow = RsvpFlow::mount(&api, &notifier, MOBILE);

        flow.submit_otp(" 4321 ").unwrap();

        assert_eq!(flow.session().step, Step::Guest);
        assert_eq!(
            flow.panel(),
            Panel::RsvpForm {
                name: "Jane Doe".into(),
                guest_count: GuestCount::new(2).unwrap(),
            }
        );
        assert_eq!(
            api.calls()[2..].to_vec(),
            vec![
                Call::CheckOtp(MOBILE.into(), "4321".into()),
                Call::GetUser(MOBILE.into()),
            ]
        );
        assert_eq!(
            notifier.last(),
            Some((ToastKind::Success, "OTP verified and user data loaded!".to_string()))
        );
    }

    #[test]
    fn rejected_otp_stays_on_otp_step_and_allows_retry() {
        let api = found_api()
            .on_check_otp(Err(upstream(400, Some("Invalid or expired OTP"))))
            .on_check_otp(Err(upstream(400, None)))
            .on_check_otp(Ok(()))
            .on_get_user(Ok(Some(user("Jane", MOBILE, None))));
        let notifier = RecordingNotifier::new();
        let mut flow = RsvpFlow::mount(&api, &notifier, MOBILE);

        assert!(flow.submit_otp("0000").is_err());
        assert!(flow.submit_otp("1111").is_err());
        assert_eq!(flow.panel(), Panel::OtpEntry);
        assert_eq!(
            notifier.errors(),
            vec!["Invalid or expired OTP".to_string(), "Invalid OTP.".to_string()]
        );

        flow.submit_otp("2222").unwrap();
        assert_eq!(
            flow.panel(),
            Panel::RsvpForm {
                name: "Jane".into(),
                guest_count: GuestCount::default(),
            }
        );
    }

    #[test]
    fn empty_otp_is_rejected_without_a_call() {
        let api = found_api();
        let notifier = RecordingNotifier::new();
        let mut flow = RsvpFlow::mount(&api, &notifier, MOBILE);

        assert!(matches!(
            flow.submit_otp("  "),
            Err(FlowError::Validation("Please enter the OTP."))
        ));
        assert_eq!(api.calls().len(), 2);
    }

    #[test]
    fn failed_reload_after_otp_stays_on_otp_step() {
        let api = found_api()
            .on_check_otp(Ok(()))
            .on_get_user(Err(upstream(500, None)));
        let notifier = RecordingNotifier::new();
        let mut flow = RsvpFlow::mount(&api, &notifier, MOBILE);

        assert!(flow.submit_otp("1234").is_err());

        assert_eq!(flow.session().step, Step::Otp);
        assert_eq!(
            notifier.errors(),
            vec!["Failed to load user after OTP verification.".to_string()]
        );
    }

    fn verified_flow<'a>(
        api: &'a ScriptedApi,
        notifier: &'a RecordingNotifier,
    ) -> RsvpFlow<'a, ScriptedApi, RecordingNotifier> {
        let mut flow = RsvpFlow::mount(api, notifier, MOBILE);
        flow.submit_otp("1234").unwrap();
        flow
    }

    fn verified_api() -> ScriptedApi {
        found_api()
            .on_check_otp(Ok(()))
            .on_get_user(Ok(Some(user("Jane", MOBILE, Some(0)))))
    }

    #[test]
    fn guest_selection_is_exclusive_and_idempotent() {
        let api = verified_api();
        let notifier = RecordingNotifier::new();
        let mut flow = verified_flow(&api, &notifier);
        let calls_before = api.calls().len();

        flow.select_guests(GuestCount::new(2).unwrap()).unwrap();
        flow.select_guests(GuestCount::new(1).unwrap()).unwrap();
        assert_eq!(flow.session().guest_count.get(), 1);

        flow.select_guests(GuestCount::new(1).unwrap()).unwrap();
        assert_eq!(flow.session().guest_count.get(), 1);

        assert_eq!(api.calls().len(), calls_before);
    }

    #[test]
    fn successful_rsvp_reaches_thank_you() {
        let api = verified_api().on_update_rsvp(Ok(()));
        let notifier = RecordingNotifier::new();
        let mut flow = verified_flow(&api, &notifier);

        flow.set_name("Jane").unwrap();
        flow.select_guests(GuestCount::new(3).unwrap()).unwrap();
        flow.submit_rsvp().unwrap();

        assert_eq!(flow.session().step, Step::Done);
        assert_eq!(flow.panel(), Panel::ThankYou);
        assert_eq!(
            flow.panel().body(),
            Some("Thank you for confirming. We look forward to seeing you!")
        );
        assert_eq!(
            api.calls().last(),
            Some(&Call::UpdateRsvp(
                MOBILE.into(),
                RsvpUpdate {
                    name: "Jane".into(),
                    members: 3,
                }
            ))
        );
        assert_eq!(
            notifier.last(),
            Some((ToastKind::Success, "Your RSVP has been updated successfully.".to_string()))
        );
    }

    #[test]
    fn failed_rsvp_stays_on_guest_step_with_error() {
        let api = verified_api().on_update_rsvp(Err(upstream(500, None)));
        let notifier = RecordingNotifier::new();
        let mut flow = verified_flow(&api, &notifier);

        flow.set_name("Jane").unwrap();
        flow.select_guests(GuestCount::new(3).unwrap()).unwrap();
        assert!(flow.submit_rsvp().is_err());

        assert_eq!(flow.session().step, Step::Guest);
        assert_eq!(
            notifier.last(),
            Some((ToastKind::Error, "Failed to update RSVP.".to_string()))
        );
    }

    #[test]
    fn empty_name_blocks_rsvp() {
        let api = verified_api();
        let notifier = RecordingNotifier::new();
        let mut flow = verified_flow(&api, &notifier);
        let calls_before = api.calls().len();

        flow.set_name("").unwrap();

        assert!(matches!(
            flow.submit_rsvp(),
            Err(FlowError::Validation("Name is required."))
        ));
        assert_eq!(api.calls().len(), calls_before);
    }

    #[test]
    fn done_is_terminal() {
        let api = verified_api().on_update_rsvp(Ok(()));
        let notifier = RecordingNotifier::new();
        let mut flow = verified_flow(&api, &notifier);
        flow.submit_rsvp().unwrap();
        let calls_before = api.calls().len();

        assert!(matches!(flow.submit_otp("1234"), Err(FlowError::Unavailable)));
        assert!(matches!(flow.submit_rsvp(), Err(FlowError::Unavailable)));
        assert!(matches!(
            flow.select_guests(GuestCount::default()),
            Err(FlowError::Unavailable)
        ));
        assert_eq!(flow.panel(), Panel::ThankYou);
        assert_eq!(api.calls().len(), calls_before);
    }

    #[test]
    fn guest_count_bounds_and_labels() {
        assert_eq!(GuestCount::new(4), None);
        assert_eq!(GuestCount::from_members(None).get(), 0);
        assert_eq!(GuestCount::from_members(Some(7)).get(), 3);
        let labels: Vec<String> = GuestCount::ALL.iter().map(ToString::to_string).collect();
        assert_eq!(labels, ["0 Guests", "1 Guest", "2 Guests", "3 Guests"]);
    }
}
