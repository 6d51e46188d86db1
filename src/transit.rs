extern crate serde;
extern crate serde_json;

use crate::result;

// The departures endpoint answers quickly or not at all; the alerts feed
// (see alerts.rs) is given more slack.
pub const PREDICTIONS_TIMEOUT_SECS: u64 = 5;
pub const PREDICTIONS_INITIAL_BACKOFF_SECS: u64 = 10;

// https://external.transitapp.com/v3/public/stop_departures?global_stop_id=MUNI:13911
#[derive(Serialize, Deserialize, Debug)]
struct StopDeparturesResponse {
    route_departures: Vec<RouteDepartures>,
}

#[derive(Serialize, Deserialize, Debug)]
struct RouteDepartures {
    global_route_id: String,
    route_short_name: String,
    itineraries: Vec<Itinerary>,
}

#[derive(Serialize, Deserialize, Debug)]
struct Itinerary {
    direction_headsign: String,
    schedule_items: Vec<ScheduleItem>,
}

#[derive(Serialize, Deserialize, Debug)]
struct ScheduleItem {
    departure_time: i64,
    is_real_time: bool,
}

pub fn departures_url(agency: &str, stop_code: &str) -> String {
    return format!(
        "https://external.transitapp.com/v3/public/stop_departures?global_stop_id={}:{}",
        agency, stop_code);
}

/// All departure timestamps at the stop, ascending. Empty is valid and
/// means "no data". A payload that doesn't match the model is an API
/// contract change and surfaces as an error (fatal to the polling loop).
pub fn parse_departures(response_body: &str) -> result::RailsignResult<Vec<i64>> {
    let response: StopDeparturesResponse = serde_json::from_str(response_body)?;

    let mut departures = vec![];
    for route in &response.route_departures {
        for itinerary in &route.itineraries {
            for item in &itinerary.schedule_items {
                departures.push(item.departure_time);
            }
        }
    }
    departures.sort();
    return Ok(departures);
}

pub fn minutes_until(now: i64, departure: i64) -> i64 {
    if departure <= now {
        return 0;
    }
    return (departure - now) / 60;
}
