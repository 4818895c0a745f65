use std::cell::RefCell;
use std::collections::VecDeque;
use std::io;

use crate::api::{NewUserRequest, RsvpApi, RsvpUpdate, UserRecord};
use crate::clipboard::Clipboard;
use crate::error::ApiError;
use crate::notify::{Notifier, ToastKind};

// One entry per API call, in the order the controllers made them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Call {
    AddUser(NewUserRequest),
    GetUser(String),
    SendOtp(String),
    CheckOtp(String, String),
    UpdateRsvp(String, RsvpUpdate),
}

pub(crate) fn upstream(status: u16, message: Option<&str>) -> ApiError {
    ApiError::Upstream {
        status,
        message: message.map(str::to_string),
    }
}

pub(crate) fn user(name: &str, mobile_number: &str, members: Option<u32>) -> UserRecord {
    UserRecord {
        name: Some(name.to_string()),
        mobile_number: Some(mobile_number.to_string()),
        members,
    }
}

type Queue<T> = RefCell<VecDeque<Result<T, ApiError>>>;

// API fake answering from per-endpoint queues. An unscripted call panics so
// a test never silently hits a code path it did not plan for.
#[derive(Default)]
pub(crate) struct ScriptedApi {
    add_user: Queue<UserRecord>,
    get_user: Queue<Option<UserRecord>>,
    send_otp: Queue<()>,
    check_otp: Queue<()>,
    update_rsvp: Queue<()>,
    calls: RefCell<Vec<Call>>,
}

impl ScriptedApi {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn on_add_user(self, result: Result<UserRecord, ApiError>) -> Self {
        self.add_user.borrow_mut().push_back(result);
        self
    }

    pub(crate) fn on_get_user(self, result: Result<Option<UserRecord>, ApiError>) -> Self {
        self.get_user.borrow_mut().push_back(result);
        self
    }

    pub(crate) fn on_send_otp(self, result: Result<(), ApiError>) -> Self {
        self.send_otp.borrow_mut().push_back(result);
        self
    }

    pub(crate) fn on_check_otp(self, result: Result<(), ApiError>) -> Self {
        self.check_otp.borrow_mut().push_back(result);
        self
    }

    pub(crate) fn on_update_rsvp(self, result: Result<(), ApiError>) -> Self {
        self.update_rsvp.borrow_mut().push_back(result);
        self
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    fn answer<T>(&self, call: Call, queue: &Queue<T>) -> Result<T, ApiError> {
        let endpoint = format!("{call:?}");
        self.calls.borrow_mut().push(call);
        queue
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| panic!("unscripted api call: {endpoint}"))
    }
}

impl RsvpApi for ScriptedApi {
    fn add_user(&self, req: &NewUserRequest) -> Result<UserRecord, ApiError> {
        self.answer(Call::AddUser(req.clone()), &self.add_user)
    }

    fn get_user(&self, mobile_number: &str) -> Result<Option<UserRecord>, ApiError> {
        self.answer(Call::GetUser(mobile_number.to_string()), &self.get_user)
    }

    fn send_otp(&self, mobile_number: &str) -> Result<(), ApiError> {
        self.answer(Call::SendOtp(mobile_number.to_string()), &self.send_otp)
    }

    fn check_otp(&self, mobile_number: &str, otp: &str) -> Result<(), ApiError> {
        self.answer(
            Call::CheckOtp(mobile_number.to_string(), otp.to_string()),
            &self.check_otp,
        )
    }

    fn update_rsvp(&self, mobile_number: &str, update: &RsvpUpdate) -> Result<(), ApiError> {
        self.answer(
            Call::UpdateRsvp(mobile_number.to_string(), update.clone()),
            &self.update_rsvp,
        )
    }
}

#[derive(Default)]
pub(crate) struct RecordingNotifier {
    toasts: RefCell<Vec<(ToastKind, String)>>,
}

impl RecordingNotifier {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn toasts(&self) -> Vec<(ToastKind, String)> {
        self.toasts.borrow().clone()
    }

    pub(crate) fn last(&self) -> Option<(ToastKind, String)> {
        self.toasts.borrow().last().cloned()
    }

    pub(crate) fn errors(&self) -> Vec<String> {
        self.toasts
            .borrow()
            .iter()
            .filter(|(kind, _)| *kind == ToastKind::Error)
            .map(|(_, message)| message.clone())
            .collect()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, kind: ToastKind, message: &str) {
        self.toasts.borrow_mut().push((kind, message.to_string()));
    }
}

#[derive(Default)]
pub(crate) struct FakeClipboard {
    pub(crate) fail: bool,
    contents: RefCell<Option<String>>,
}

impl FakeClipboard {
    pub(crate) fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub(crate) fn contents(&self) -> Option<String> {
        self.contents.borrow().clone()
    }
}

impl Clipboard for FakeClipboard {
    fn write_text(&self, text: &str) -> io::Result<()> {
        if self.fail {
            return Err(io::Error::new(io::ErrorKind::Unsupported, "no clipboard"));
        }
        *self.contents.borrow_mut() = Some(text.to_string());
        Ok(())
    }
}
