// API client module: the payloads exchanged with the RSVP API, the
// `RsvpApi` port the screens talk to, and a blocking reqwest client that
// implements it.

use reqwest::blocking::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::config::ApiConfig;
use crate::error::ApiError;

/// Input of the add-user call.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NewUserRequest {
    pub name: String,
    pub mobile_number: String,
}

/// A user record as stored by the API. Only the fields the client reads are
/// modelled; everything else in the body is ignored.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub mobile_number: Option<String>,
    #[serde(default)]
    pub members: Option<u32>,
}

/// Body of a successful add-user response.
#[derive(Deserialize, Debug)]
struct AddUserResponse {
    user: Option<UserRecord>,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct SendOtpRequest<'a> {
    mobile_number: &'a str,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct CheckOtpRequest<'a> {
    mobile_number: &'a str,
    otp: &'a str,
}

/// RSVP details sent when the guest confirms.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct RsvpUpdate {
    pub name: String,
    pub members: u8,
}

/// Error body the API sends alongside non-2xx statuses.
#[derive(Deserialize, Debug)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

/// The calls the screens need from the RSVP API.
pub trait RsvpApi {
    /// Register a guest. The returned record carries the stored mobile number.
    fn add_user(&self, req: &NewUserRequest) -> Result<UserRecord, ApiError>;

    /// Look a guest up by mobile number. `Ok(None)` means the API answered
    /// with an empty body.
    fn get_user(&self, mobile_number: &str) -> Result<Option<UserRecord>, ApiError>;

    fn send_otp(&self, mobile_number: &str) -> Result<(), ApiError>;

    fn check_otp(&self, mobile_number: &str, otp: &str) -> Result<(), ApiError>;

    fn update_rsvp(&self, mobile_number: &str, update: &RsvpUpdate) -> Result<(), ApiError>;
}

/// Blocking client for the RSVP API.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Build a client from the `[api]` config section. Without a configured
    /// timeout reqwest's default applies.
    pub fn from_config(config: &ApiConfig) -> Result<Self, ApiError> {
        let mut builder = Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build().map_err(ApiError::Client)?;
        Ok(ApiClient {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send a request and return the raw body of a 2xx response.
    fn execute(&self, method: &str, path: &str, req: RequestBuilder) -> Result<String, ApiError> {
        debug!(method, path, "sending api request");
        let res = req.send().map_err(ApiError::Transport)?;
        let status = res.status().as_u16();
        let body = res.text().map_err(ApiError::Transport)?;
        debug!(method, path, status, "api response received");
        check_status(status, body)
    }
}

/// Turn a status/body pair into the body on 2xx, or an `Upstream` error that
/// carries the server's message when the body has one.
pub(crate) fn check_status(status: u16, body: String) -> Result<String, ApiError> {
    if (200..300).contains(&status) {
        return Ok(body);
    }
    let message = serde_json::from_str::<ErrorBody>(&body)
        .ok()
        .and_then(|b| b.message)
        .filter(|m| !m.trim().is_empty());
    Err(ApiError::Upstream { status, message })
}

/// Decode a get-user body. Empty and `null` bodies mean "no such user".
pub(crate) fn parse_user(body: &str) -> Result<Option<UserRecord>, ApiError> {
    if body.trim().is_empty() {
        return Ok(None);
    }
    serde_json::from_str::<Option<UserRecord>>(body)
        .map_err(|e| ApiError::Decode(format!("user record: {e}")))
}

/// Decode an add-user body, which must carry `user.mobileNumber`.
pub(crate) fn parse_added_user(body: &str) -> Result<UserRecord, ApiError> {
    let resp: AddUserResponse = serde_json::from_str(body)
        .map_err(|e| ApiError::Decode(format!("add-user response: {e}")))?;
    match resp.user {
        Some(user) if user.mobile_number.is_some() => Ok(user),
        _ => Err(ApiError::Decode(
            "add-user response is missing user.mobileNumber".into(),
        )),
    }
}

impl RsvpApi for ApiClient {
    fn add_user(&self, req: &NewUserRequest) -> Result<UserRecord, ApiError> {
        let path = "/api/users/add";
        let body = self.execute("POST", path, self.client.post(self.url(path)).json(req))?;
        parse_added_user(&body)
    }

    fn get_user(&self, mobile_number: &str) -> Result<Option<UserRecord>, ApiError> {
        let path = format!("/api/users/{}", urlencoding::encode(mobile_number));
        let body = self.execute("GET", &path, self.client.get(self.url(&path)))?;
        parse_user(&body)
    }

    fn send_otp(&self, mobile_number: &str) -> Result<(), ApiError> {
        let path = "/api/users/send-otp";
        let req = self
            .client
            .post(self.url(path))
            .json(&SendOtpRequest { mobile_number });
        self.execute("POST", path, req)?;
        Ok(())
    }

    fn check_otp(&self, mobile_number: &str, otp: &str) -> Result<(), ApiError> {
        let path = "/api/users/check-otp";
        let req = self
            .client
            .post(self.url(path))
            .json(&CheckOtpRequest { mobile_number, otp });
        self.execute("POST", path, req)?;
        Ok(())
    }

    fn update_rsvp(&self, mobile_number: &str, update: &RsvpUpdate) -> Result<(), ApiError> {
        let path = format!("/api/users/update/{}", urlencoding::encode(mobile_number));
        let req = self.client.put(self.url(&path)).json(update);
        self.execute("PUT", &path, req)?;
        Ok(())
    }
}
