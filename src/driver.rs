extern crate std;

use crate::alerts;
use crate::clock;
use crate::clock::Clock;
use crate::config;
use crate::fetch;
use crate::keys;
use crate::panel;
use crate::panel::Panel;
use crate::poller;
use crate::render;
use crate::result;
use crate::store;
use crate::transit;

use std::sync::Arc;

fn prediction_fetcher(agency: String, rotator: Arc<keys::KeyRotator>)
        -> result::RailsignResult<impl Fn(&config::Stop) -> String + Send + Sync + 'static> {
    let client = fetch::client_with_timeout(transit::PREDICTIONS_TIMEOUT_SECS)?;
    return Ok(move |stop: &config::Stop| -> String {
        let url = transit::departures_url(&agency, &stop.stop_code);
        return fetch::fetch_with_backoff(
            || fetch::http_get(&client, &url, rotator.next()),
            transit::PREDICTIONS_INITIAL_BACKOFF_SECS,
            &clock::SystemClock);
    });
}

fn alert_fetcher(agency: String, rotator: Arc<keys::KeyRotator>)
        -> result::RailsignResult<impl Fn() -> String + Send + Sync + 'static> {
    let client = fetch::client_with_timeout(alerts::ALERTS_TIMEOUT_SECS)?;
    let url = alerts::alerts_url(&agency);
    return Ok(move || -> String {
        return fetch::fetch_with_backoff(
            || fetch::http_get(&client, &url, rotator.next()),
            alerts::ALERTS_INITIAL_BACKOFF_SECS,
            &clock::SystemClock);
    });
}

/// Copy current store state out under the row locks, then run the
/// animation tick lock-free. No lock is held across any panel call.
fn compute_frame(state: &mut render::RenderState,
                 stops: &[config::Stop],
                 stale_threshold_secs: i64,
                 predictions: &store::PredictionStore,
                 alert_store: &store::AlertStore,
                 clock: &dyn clock::Clock) -> Vec<render::DrawOp> {
    let now = clock.now_ts();
    let prediction_rows = predictions.snapshot_all();
    let alert_rows = alert_store.snapshot_all();
    let secs_stale = std::cmp::max(0, now - predictions.freshness_ts());

    let mut rows = vec![];
    for ((stop, prediction_row), alert_row) in stops.iter()
            .zip(prediction_rows.into_iter())
            .zip(alert_rows.into_iter()) {
        rows.push(render::RowSnapshot{
            line: stop.line.clone(),
            predictions: prediction_row,
            alerts: alert_row,
        });
    }

    return render::render_tick(state, &rows, secs_stale, now, stale_threshold_secs);
}

/// Starts the two polling threads and runs the render loop on the calling
/// thread until the process is terminated. In one-shot mode, performs a
/// single synchronous fetch-and-render pass instead and returns.
pub fn run(config: config::Config, panel: &mut dyn panel::Panel, one_shot: bool) -> result::RailsignResult<()> {
    let lines: Vec<String> = config.stops.iter().map(|stop| stop.line.clone()).collect();
    let predictions = Arc::new(store::PredictionStore::new(&lines));
    let alert_store = Arc::new(store::AlertStore::new(&lines));
    let rotator = Arc::new(keys::KeyRotator::new(config.api_keys.clone())?);

    let clock = clock::SystemClock;
    let mut state = render::RenderState::new();

    if one_shot {
        let fetch_stop = prediction_fetcher(config.agency.clone(), rotator.clone())?;
        poller::prediction_cycle(&predictions, &config.stops, &fetch_stop, &clock)?;

        let fetch_alerts = alert_fetcher(config.agency.clone(), rotator.clone())?;
        poller::alert_cycle(&alert_store, &config.stops,
                            &config.ignored_alert_substrings, &fetch_alerts, &clock)?;

        let ops = compute_frame(&mut state, &config.stops, config.stale_threshold_secs,
                                &predictions, &alert_store, &clock);
        panel.apply(&ops);
        return panel.swap_frame();
    }

    {
        let store = predictions.clone();
        let stops = config.stops.clone();
        let interval = std::time::Duration::from_secs(config.poll_interval_secs);
        let fetch_stop = prediction_fetcher(config.agency.clone(), rotator.clone())?;
        std::thread::spawn(move || {
            info!("Prediction polling thread started");
            if let Err(err) = poller::run_prediction_loop(
                    &store, &stops, &fetch_stop, interval, &clock::SystemClock) {
                error!("Prediction loop failed: {}", err);
                std::process::exit(1);
            }
        });
    }

    {
        let store = alert_store.clone();
        let stops = config.stops.clone();
        let ignored = config.ignored_alert_substrings.clone();
        let interval = std::time::Duration::from_secs(config.alert_poll_interval_secs);
        let fetch_alerts = alert_fetcher(config.agency.clone(), rotator.clone())?;
        std::thread::spawn(move || {
            info!("Alert polling thread started");
            if let Err(err) = poller::run_alert_loop(
                    &store, &stops, &ignored, &fetch_alerts, interval, &clock::SystemClock) {
                error!("Alert loop failed: {}", err);
                std::process::exit(1);
            }
        });
    }

    let render_interval = std::time::Duration::from_millis(config.render_interval_ms);
    loop {
        let ops = compute_frame(&mut state, &config.stops, config.stale_threshold_secs,
                                &predictions, &alert_store, &clock);
        panel.apply(&ops);
        panel.swap_frame()?;
        clock.sleep(render_interval);
    }
}
