//! Throttle classifier.
//!
//! Both upstreams answer throttling and bad requests with a 2xx status and a
//! JSON body, so every body is classified before it is trusted:
//!
//! | Body | Class |
//! |------|-------|
//! | `"Error Message"` field | [`Classification::ParamError`] |
//! | `"error"` object without limit wording | [`Classification::ParamError`] |
//! | `"Note"` / `"Information"` / limit `"error"` with minute wording | [`Classification::MinuteThrottle`] |
//! | the same with day wording | [`Classification::DailyCap`] |
//! | any other non-empty note | [`Classification::MinuteThrottle`] |
//! | anything else | [`Classification::Success`] |

use serde_json::Value;

/// Outcome of inspecting one upstream body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    Success,
    ParamError(String),
    MinuteThrottle(String),
    DailyCap(String),
}

impl Classification {
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::ParamError(_) => "param_error",
            Self::MinuteThrottle(_) => "minute_throttle",
            Self::DailyCap(_) => "daily_cap",
        }
    }
}

const NOTE_FIELDS: [&str; 2] = ["Note", "Information"];

const LIMIT_PHRASES: [&str; 5] = ["limit", "too many", "quota", "throttl", "frequency"];

const MINUTE_PHRASES: [&str; 7] = [
    "per minute",
    "per-minute",
    "/min",
    "calls per second",
    "too many requests",
    "rate_limit",
    "last 60 seconds",
];

const DAY_PHRASES: [&str; 6] = [
    "per day",
    "daily",
    "24-hour",
    "24 hour",
    "usage limit",
    "usage_limit",
];

/// Classify an upstream body. Total: every JSON value maps to a class.
pub fn classify(body: &Value) -> Classification {
    let Some(object) = body.as_object() else {
        return Classification::Success;
    };

    if let Some(message) = object.get("Error Message") {
        return Classification::ParamError(render_text(message));
    }

    if let Some(error) = object.get("error").filter(|error| !error.is_null()) {
        let text = render_error_object(error);
        if !contains_any(&text, &LIMIT_PHRASES) {
            return Classification::ParamError(text);
        }
        return classify_note(text);
    }

    NOTE_FIELDS
        .iter()
        .filter_map(|field| object.get(*field))
        .map(render_text)
        .find(|text| !text.trim().is_empty())
        .map_or(Classification::Success, classify_note)
}

// Minute wording wins over day wording: the price upstream's per-minute note
// quotes its daily allowance in the same sentence.
fn classify_note(text: String) -> Classification {
    if contains_any(&text, &MINUTE_PHRASES) {
        Classification::MinuteThrottle(text)
    } else if contains_any(&text, &DAY_PHRASES) {
        Classification::DailyCap(text)
    } else {
        Classification::MinuteThrottle(text)
    }
}

fn render_error_object(error: &Value) -> String {
    let Some(fields) = error.as_object() else {
        return render_text(error);
    };
    let code = fields.get("code").map(render_text).unwrap_or_default();
    let message = fields.get("message").map(render_text).unwrap_or_default();
    match (code.is_empty(), message.is_empty()) {
        (false, false) => format!("{code}: {message}"),
        (false, true) => code,
        (true, false) => message,
        (true, true) => error.to_string(),
    }
}

fn render_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

fn contains_any(text: &str, phrases: &[&str]) -> bool {
    let lowered = text.to_ascii_lowercase();
    phrases.iter().any(|phrase| lowered.contains(phrase))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn body_without_markers_is_success() {
        assert_eq!(classify(&json!({ "Meta Data": {} })), Classification::Success);
        assert_eq!(classify(&json!({ "data": [] })), Classification::Success);
        assert_eq!(classify(&json!([])), Classification::Success);
    }

    #[test]
    fn error_message_is_param_error() {
        let body = json!({ "Error Message": "Invalid API call. Please retry or visit the documentation." });
        assert!(matches!(classify(&body), Classification::ParamError(message) if message.starts_with("Invalid API call")));
    }

    #[test]
    fn per_minute_note_is_minute_throttle() {
        let body = json!({
            "Note": "Our standard API call frequency is 5 calls per minute and 500 calls per day."
        });
        assert_eq!(classify(&body).label(), "minute_throttle");
    }

    #[test]
    fn twenty_four_hour_information_is_daily_cap() {
        let body = json!({
            "Information": "You have reached the 24-hour request limit for this key."
        });
        assert_eq!(classify(&body).label(), "daily_cap");
    }

    #[test]
    fn per_day_information_is_daily_cap() {
        let body = json!({
            "Information": "Our standard API rate limit is 25 requests per day."
        });
        assert!(matches!(classify(&body), Classification::DailyCap(message) if message.contains("25 requests")));
    }

    #[test]
    fn unknown_note_defaults_to_minute_throttle() {
        let body = json!({ "Information": "Please spread out your requests." });
        assert_eq!(classify(&body).label(), "minute_throttle");
    }

    #[test]
    fn empty_note_is_ignored() {
        assert_eq!(classify(&json!({ "Note": "  ", "Meta Data": {} })), Classification::Success);
    }

    #[test]
    fn news_limit_errors_are_throttles() {
        let usage = json!({ "error": { "code": "usage_limit_reached", "message": "The usage limit for this account has been reached." } });
        let rate = json!({ "error": { "code": "rate_limit_reached", "message": "Too many requests in the last 60 seconds." } });

        assert_eq!(classify(&usage).label(), "daily_cap");
        assert_eq!(classify(&rate).label(), "minute_throttle");
    }

    #[test]
    fn news_error_without_limit_wording_is_param_error() {
        let body = json!({ "error": { "code": "malformed_parameters", "message": "The symbols parameter is malformed." } });
        assert_eq!(
            classify(&body),
            Classification::ParamError(String::from(
                "malformed_parameters: The symbols parameter is malformed."
            ))
        );
    }
}
