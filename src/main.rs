use std::str::FromStr;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use fleetbook::console::{self, Session};
use fleetbook::engine::{Engine, Policy};
use fleetbook::model::CalendarDate;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // stdout carries protocol replies; logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let metrics_port: Option<u16> = std::env::var("FLEET_METRICS_PORT")
        .ok()
        .and_then(|s| s.parse().ok());
    fleetbook::observability::init(metrics_port)?;

    let defaults = Policy::default();
    let policy = Policy {
        max_advance_months: env_or("FLEET_MAX_ADVANCE_MONTHS", defaults.max_advance_months),
        max_booking_days: env_or("FLEET_MAX_BOOKING_DAYS", defaults.max_booking_days),
    };
    policy.check()?;

    let today = match std::env::var("FLEET_TODAY") {
        Ok(s) => {
            let date: CalendarDate = s.parse()?;
            if !date.is_valid() {
                return Err(format!("FLEET_TODAY: {date} is not a valid calendar date").into());
            }
            Some(date)
        }
        Err(_) => None,
    };

    info!("fleetbook starting");
    info!("  max_advance_months: {}", policy.max_advance_months);
    info!("  max_booking_days: {}", policy.max_booking_days);
    info!("  today: {}", today.map_or("system clock".to_string(), |d| d.to_string()));
    info!("  metrics: {}", metrics_port.map_or("disabled".to_string(), |p| format!("http://0.0.0.0:{p}/metrics")));

    let mut session = Session::new(Engine::new(policy), today);
    tokio::select! {
        result = console::run(tokio::io::stdin(), tokio::io::stdout(), &mut session) => result?,
        _ = tokio::signal::ctrl_c() => info!("shutdown signal received"),
    }

    let engine = session.engine();
    info!(
        vehicles = engine.fleet().len(),
        bookings = engine.ledger().len(),
        trips = engine.trips().len(),
        "fleetbook stopped"
    );
    Ok(())
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    parse_or(key, std::env::var(key).ok(), default)
}

/// Parse a set variable, warning and falling back to `default` when the
/// value does not parse.
fn parse_or<T: FromStr>(key: &str, raw: Option<String>, default: T) -> T {
    let Some(raw) = raw else { return default };
    match raw.trim().parse() {
        Ok(value) => value,
        Err(_) => {
            warn!("{key}={raw:?} is not a valid value, using the default");
            default
        }
    }
}
