// Guest links and the router that maps a link or path to a screen.

use thiserror::Error;
use url::Url;

// Bare paths are resolved against this so they parse like full links.
const PATH_BASE: &str = "http://localhost/";

/// Screen selected by a URL path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// `/`
    AddUser,
    /// `/guest/:id`, where the id is the guest's mobile number.
    Guest(String),
    /// Anything else.
    Unknown(String),
}

impl Route {
    /// Route a bare path (`/guest/9999999999`) or a full URL
    /// (`http://host/guest/9999999999?x=1`). The guest id is percent-decoded.
    pub fn parse(input: &str) -> Route {
        let input = input.trim();
        let url = match Url::parse(input) {
            Ok(url) => url,
            Err(url::ParseError::RelativeUrlWithoutBase) => {
                match Url::parse(PATH_BASE).and_then(|base| base.join(input)) {
                    Ok(url) => url,
                    Err(_) => return Route::Unknown(input.to_string()),
                }
            }
            Err(_) => return Route::Unknown(input.to_string()),
        };

        let Some(segments) = url.path_segments() else {
            return Route::Unknown(input.to_string());
        };
        let segments: Vec<&str> = segments.filter(|s| !s.is_empty()).collect();
        match segments.as_slice() {
            [] => Route::AddUser,
            ["guest", id] => match urlencoding::decode(id) {
                Ok(id) => Route::Guest(id.into_owned()),
                Err(_) => Route::Unknown(url.path().to_string()),
            },
            _ => Route::Unknown(url.path().to_string()),
        }
    }
}

#[derive(Error, Debug)]
pub enum LinkError {
    #[error("invalid guest base url: {0}")]
    Parse(#[from] url::ParseError),

    #[error("guest base url {0:?} cannot carry a path")]
    CannotBeABase(String),
}

/// Link a guest opens to reach their RSVP screen. Any path on the base is
/// kept and the mobile number is percent-encoded as one segment.
pub fn guest_link(guest_base_url: &str, mobile_number: &str) -> Result<String, LinkError> {
    let mut url = Url::parse(guest_base_url)?;
    url.path_segments_mut()
        .map_err(|_| LinkError::CannotBeABase(guest_base_url.to_string()))?
        .pop_if_empty()
        .push("guest")
        .push(mobile_number);
    Ok(url.into())
}
