extern crate serde;
extern crate serde_json;
extern crate std;

use crate::result;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Stop {
    /// Display identifier for the row, e.g. "N" or "J".
    pub line: String,
    /// Upstream stop identifier passed to the departures endpoint.
    pub stop_code: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Config {
    pub api_keys: Vec<String>,
    pub agency: String,
    /// Exactly two: top row, bottom row.
    pub stops: Vec<Stop>,

    #[serde(default)]
    pub ignored_alert_substrings: Vec<String>,

    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
    #[serde(default = "default_alert_poll_interval_secs")]
    pub alert_poll_interval_secs: u64,
    #[serde(default = "default_render_interval_ms")]
    pub render_interval_ms: u64,
    #[serde(default = "default_stale_threshold_secs")]
    pub stale_threshold_secs: i64,

    #[serde(default = "default_font_path")]
    pub font_path: String,
}

fn default_poll_interval_secs() -> u64 { return 20; }
fn default_alert_poll_interval_secs() -> u64 { return 60; }
fn default_render_interval_ms() -> u64 { return 50; }
fn default_stale_threshold_secs() -> i64 { return 120; }
fn default_font_path() -> String {
    return "/usr/share/fonts/truetype/dejavu/DejaVuSansMono.ttf".to_string();
}

pub fn load(path: &str) -> result::RailsignResult<Config> {
    let contents = std::fs::read_to_string(path)?;
    return parse(&contents);
}

fn parse(contents: &str) -> result::RailsignResult<Config> {
    let config: Config = serde_json::from_str(contents)?;
    validate(&config)?;
    return Ok(config);
}

fn validate(config: &Config) -> result::RailsignResult<()> {
    if config.api_keys.is_empty() {
        return Err(result::RailsignError::ConfigError(
            "api_keys must not be empty".to_string()));
    }
    if config.stops.len() != 2 {
        return Err(result::RailsignError::ConfigError(format!(
            "expected exactly 2 stops (top row, bottom row), got {}",
            config.stops.len())));
    }
    return Ok(());
}
