extern crate serde;
extern crate serde_json;

use crate::result;

pub const ALERTS_TIMEOUT_SECS: u64 = 10;
pub const ALERTS_INITIAL_BACKOFF_SECS: u64 = 20;

// https://external.transitapp.com/v3/public/alerts?global_agency_id=MUNI
#[derive(Serialize, Deserialize, Debug)]
struct AlertsResponse {
    alerts: Vec<Alert>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct Alert {
    #[serde(default)]
    active_periods: Vec<ActivePeriod>,
    #[serde(default)]
    informed_entities: Vec<InformedEntity>,
    header_text: TranslatedText,
}

#[derive(Serialize, Deserialize, Debug)]
struct ActivePeriod {
    start: i64,
    end: i64,
}

#[derive(Serialize, Deserialize, Debug)]
struct InformedEntity {
    #[serde(default)]
    global_stop_id: Option<String>,
}

#[derive(Serialize, Deserialize, Debug)]
struct TranslatedText {
    translation: Vec<Translation>,
}

#[derive(Serialize, Deserialize, Debug)]
struct Translation {
    text: String,
    language: Option<String>,
}

pub fn alerts_url(agency: &str) -> String {
    return format!(
        "https://external.transitapp.com/v3/public/alerts?global_agency_id={}",
        agency);
}

pub fn parse_alerts(response_body: &str) -> result::RailsignResult<Vec<Alert>> {
    let response: AlertsResponse = serde_json::from_str(response_body)?;
    return Ok(response.alerts);
}

impl Alert {
    // An alert with no periods at all is always in effect.
    fn is_active(&self, now: i64) -> bool {
        if self.active_periods.is_empty() {
            return true;
        }
        return self.active_periods.iter().any(
            |period| period.start <= now && now <= period.end);
    }

    fn affects_stop(&self, stop_code: &str) -> bool {
        return self.informed_entities.iter().any(
            |entity| entity.global_stop_id.as_deref() == Some(stop_code));
    }

    fn english_text(&self) -> Option<&str> {
        return self.header_text.translation.iter()
            .find(|t| t.language.as_deref() == Some("en"))
            .map(|t| t.text.as_str());
    }
}

/// The filter pipeline: active window contains `now` (inclusive at both
/// ends), the alert names this stop, it carries English text, and the text
/// matches no ignored substring. Source order is preserved.
pub fn alerts_for_stop(alerts: &[Alert], stop_code: &str, ignored_substrings: &[String], now: i64) -> Vec<String> {
    return alerts.iter()
        .filter(|alert| alert.is_active(now))
        .filter(|alert| alert.affects_stop(stop_code))
        .filter_map(|alert| alert.english_text())
        .filter(|text| !ignored_substrings.iter().any(|s| text.contains(s.as_str())))
        .map(|text| text.to_string())
        .collect();
}
