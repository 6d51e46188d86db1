extern crate std;

use crate::alerts;
use crate::clock;
use crate::clock::Clock;
use crate::config;
use crate::result;
use crate::store;
use crate::transit;

/// One prediction fetch cycle: fan out one worker per stop, join, then
/// stamp freshness. The scope is the join barrier: it cannot exit until
/// every worker has finished, so every row write happens-before the
/// freshness update, and one slow stop delays the stamp for all lines.
///
/// `fetch` retries transport errors internally and always yields a body;
/// a body that doesn't parse is an API contract change and is fatal.
pub fn prediction_cycle<F>(store: &store::PredictionStore,
                           stops: &[config::Stop],
                           fetch: &F,
                           clock: &dyn clock::Clock) -> result::RailsignResult<()>
        where F: Fn(&config::Stop) -> String + Sync {
    let results: Vec<result::RailsignResult<()>> = std::thread::scope(|scope| {
        let workers: Vec<_> = stops.iter().map(|stop| {
            scope.spawn(move || -> result::RailsignResult<()> {
                let body = fetch(stop);
                let departures = transit::parse_departures(&body)?;
                debug!("Line {}: {} upcoming departures", stop.line, departures.len());
                store.replace(&stop.line, departures);
                return Ok(());
            })
        }).collect();
        workers.into_iter()
            .map(|worker| worker.join().expect("prediction worker panicked"))
            .collect()
    });

    for worker_result in results {
        worker_result?;
    }

    store.update_freshness(clock.now_ts());
    return Ok(());
}

pub fn run_prediction_loop<F>(store: &store::PredictionStore,
                              stops: &[config::Stop],
                              fetch: &F,
                              interval: std::time::Duration,
                              clock: &dyn clock::Clock) -> result::RailsignResult<()>
        where F: Fn(&config::Stop) -> String + Sync {
    loop {
        prediction_cycle(store, stops, fetch, clock)?;
        clock.sleep(interval);
    }
}

/// One alert fetch cycle: a single fetch for the whole agency, then the
/// filter pipeline and one atomic replace per line, then the freshness
/// stamp.
pub fn alert_cycle<F>(store: &store::AlertStore,
                      stops: &[config::Stop],
                      ignored_substrings: &[String],
                      fetch: &F,
                      clock: &dyn clock::Clock) -> result::RailsignResult<()>
        where F: Fn() -> String {
    let body = fetch();
    let all_alerts = alerts::parse_alerts(&body)?;

    let now = clock.now_ts();
    for stop in stops {
        let for_line = alerts::alerts_for_stop(
            &all_alerts, &stop.stop_code, ignored_substrings, now);
        debug!("Line {}: {} active alerts", stop.line, for_line.len());
        store.replace(&stop.line, for_line);
    }

    store.update_freshness(clock.now_ts());
    return Ok(());
}

pub fn run_alert_loop<F>(store: &store::AlertStore,
                         stops: &[config::Stop],
                         ignored_substrings: &[String],
                         fetch: &F,
                         interval: std::time::Duration,
                         clock: &dyn clock::Clock) -> result::RailsignResult<()>
        where F: Fn() -> String {
    loop {
        alert_cycle(store, stops, ignored_substrings, fetch, clock)?;
        clock.sleep(interval);
    }
}
