// Declarative form rules. Each field lists its rules in order and the first
// failing rule's message is what the user sees.

use regex::Regex;
use std::sync::OnceLock;

/// A single check applied to a form field.
#[derive(Clone, Copy)]
pub enum Rule {
    /// The value must contain something other than whitespace.
    Required(&'static str),
    /// The value must match the pattern. Empty values are left to `Required`.
    Pattern {
        regex: fn() -> &'static Regex,
        message: &'static str,
    },
}

impl Rule {
    pub fn check(&self, value: &str) -> Result<(), &'static str> {
        match self {
            Rule::Required(message) => {
                if value.trim().is_empty() {
                    Err(*message)
                } else {
                    Ok(())
                }
            }
            Rule::Pattern { regex, message } => {
                if value.is_empty() || regex().is_match(value) {
                    Ok(())
                } else {
                    Err(*message)
                }
            }
        }
    }
}

/// Run `rules` against `value`, stopping at the first failure.
pub fn validate(value: &str, rules: &[Rule]) -> Result<(), &'static str> {
    rules.iter().try_for_each(|rule| rule.check(value))
}

fn mobile_number_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[0-9]{10}$").expect("mobile number pattern is valid"))
}

pub const NAME_RULES: &[Rule] = &[Rule::Required("Please enter the name")];

pub const MOBILE_NUMBER_RULES: &[Rule] = &[
    Rule::Required("Please enter a mobile number"),
    Rule::Pattern {
        regex: mobile_number_pattern,
        message: "Mobile number must be 10 digits",
    },
];

pub const OTP_RULES: &[Rule] = &[Rule::Required("Please enter the OTP.")];

pub const RSVP_NAME_RULES: &[Rule] = &[Rule::Required("Name is required.")];
