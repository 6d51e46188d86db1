extern crate anyhow;
extern crate reqwest;
extern crate std;

use crate::clock;
use crate::clock::Clock;
use crate::result;

use anyhow::Context;

pub fn client_with_timeout(timeout_secs: u64) -> result::RailsignResult<reqwest::blocking::Client> {
    return Ok(reqwest::blocking::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_secs))
        .build()?);
}

pub fn http_get(client: &reqwest::blocking::Client, url: &str, api_key: &str) -> result::RailsignResult<String> {
    use std::io::Read;

    let mut response = client.get(url)
        .header("apiKey", api_key)
        .send()
        .and_then(|r| r.error_for_status())
        .with_context(|| format!("while fetching url: {}", url))?;
    let mut response_body = String::new();
    response.read_to_string(&mut response_body)?;
    return Ok(response_body);
}

/// Retries `attempt` forever, doubling the sleep after each failure. Never
/// returns an error: the upstream API is treated as eventually-available,
/// and the calling scheduler loop runs forever anyway.
pub fn fetch_with_backoff<F>(mut attempt: F, initial_backoff_secs: u64, clock: &dyn clock::Clock) -> String
        where F: FnMut() -> result::RailsignResult<String> {
    let mut backoff_secs = initial_backoff_secs;
    loop {
        match attempt() {
            Ok(body) => return body,
            Err(err) => {
                warn!("Fetch failed: {}. Retrying in {}s", err, backoff_secs);
                clock.sleep(std::time::Duration::from_secs(backoff_secs));
                backoff_secs *= 2;
            },
        }
    }
}
