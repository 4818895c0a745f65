// Library root
// -----------
// This crate exposes the library surface for the `rsvp` binary.
//
// Module responsibilities:
// - `api`: payloads, the `RsvpApi` port and the blocking HTTP client.
// - `add_user` / `guest`: the two screen controllers. They hold the form
//   and step state and talk to the API through `RsvpApi`.
// - `route`: guest links and the path router.
// - `validation`: declarative form rules.
// - `notify` / `clipboard`: terminal side effects behind small traits.
// - `ui`: prompts and rendering on top of the controllers.
// - `config` / `logging` / `cli`: the ambient setup the binary wires up.
pub mod add_user;
pub mod api;
pub mod cli;
pub mod clipboard;
pub mod config;
pub mod error;
pub mod guest;
pub mod logging;
pub mod notify;
pub mod route;
pub mod ui;
pub mod validation;

#[cfg(test)]
pub(crate) mod test_support;
