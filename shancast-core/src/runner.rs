//! Event loop tying the dashboard to a provider and the refresh timer.

use std::{sync::Arc, time::Duration};

use tokio::{
    sync::mpsc,
    task::JoinSet,
    time::{self, Instant, Interval, MissedTickBehavior},
};
use tracing::{debug, info, warn};

use crate::{
    FetchError,
    dashboard::{Dashboard, DashboardEvent, Effect, FetchTicket},
    model::WeatherSnapshot,
    provider::WeatherProvider,
};

/// Shortest polling period the loop accepts.
pub const MIN_REFRESH_INTERVAL: Duration = Duration::from_secs(1);
/// Longest polling period the loop accepts.
pub const MAX_REFRESH_INTERVAL: Duration = Duration::from_secs(24 * 60 * 60);

type FetchResult = (FetchTicket, Result<WeatherSnapshot, FetchError>);

/// Drive `dashboard` until a quit event arrives or the event channel closes.
///
/// Fetches the selected city immediately, then every `refresh` (clamped to
/// [`MIN_REFRESH_INTERVAL`]..=[`MAX_REFRESH_INTERVAL`]). A city change
/// or an explicit refresh restarts the timer. In-flight fetches are not
/// cancelled when the city changes; the dashboard drops their results. All
/// of them are aborted on return. `on_change` is called after every state
/// change worth redrawing.
pub async fn run<F>(
    mut dashboard: Dashboard,
    provider: Arc<dyn WeatherProvider>,
    refresh: Duration,
    mut events: mpsc::Receiver<DashboardEvent>,
    mut on_change: F,
) -> Dashboard
where
    F: FnMut(&Dashboard) + Send,
{
    let mut in_flight: JoinSet<FetchResult> = JoinSet::new();

    spawn_fetch(&mut dashboard, &provider, &mut in_flight);
    let mut ticker = refresh_timer(refresh);
    on_change(&dashboard);

    loop {
        tokio::select! {
            event = events.recv() => {
                let Some(event) = event else {
                    debug!("event channel closed");
                    break;
                };
                match dashboard.handle(event) {
                    Effect::None => {}
                    Effect::Fetch => {
                        ticker = refresh_timer(refresh);
                        spawn_fetch(&mut dashboard, &provider, &mut in_flight);
                    }
                    Effect::Quit => break,
                }
                on_change(&dashboard);
            }
            _ = ticker.tick() => {
                debug!(city = %dashboard.selected_city(), "refresh timer fired");
                spawn_fetch(&mut dashboard, &provider, &mut in_flight);
                on_change(&dashboard);
            }
            Some(joined) = in_flight.join_next() => {
                match joined {
                    Ok((ticket, result)) => {
                        dashboard.complete_fetch(&ticket, result);
                    }
                    Err(err) => {
                        warn!(%err, "fetch task did not complete");
                        dashboard.abandon_fetch();
                    }
                }
                on_change(&dashboard);
            }
        }
    }

    in_flight.abort_all();
    info!("dashboard stopped");
    dashboard
}

fn spawn_fetch(
    dashboard: &mut Dashboard,
    provider: &Arc<dyn WeatherProvider>,
    in_flight: &mut JoinSet<FetchResult>,
) {
    let ticket = dashboard.begin_fetch();
    let provider = Arc::clone(provider);
    in_flight.spawn(async move {
        let result = provider.fetch(ticket.city()).await;
        (ticket, result)
    });
}

// First tick one full period from now; the initial fetch is issued by hand.
fn refresh_timer(period: Duration) -> Interval {
    let period = period.clamp(MIN_REFRESH_INTERVAL, MAX_REFRESH_INTERVAL);
    let mut ticker = time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    ticker
}
