use std::net::SocketAddr;

use crate::command::Command;

// ── Request metrics ─────────────────────────────────────────────

/// Counter: commands processed. Labels: command, status.
pub const COMMANDS_TOTAL: &str = "fleet_commands_total";

/// Histogram: command latency in seconds. Labels: command.
pub const COMMAND_DURATION_SECONDS: &str = "fleet_command_duration_seconds";

// ── State metrics ───────────────────────────────────────────────

/// Gauge: vehicles in the fleet.
pub const VEHICLES_ACTIVE: &str = "fleet_vehicles_active";

/// Gauge: active bookings in the ledger.
pub const BOOKINGS_ACTIVE: &str = "fleet_bookings_active";

/// Counter: vehicles returned and logged as trips.
pub const TRIPS_COMPLETED_TOTAL: &str = "fleet_trips_completed_total";

/// Install Prometheus metrics exporter on the given port. No-op if port is None.
pub fn init(port: Option<u16>) -> Result<(), Box<dyn std::error::Error>> {
    let Some(port) = port else { return Ok(()) };
    let addr: SocketAddr = ([0, 0, 0, 0], port).into();
    metrics_exporter_prometheus::PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()?;
    tracing::info!("metrics endpoint: http://0.0.0.0:{port}/metrics");
    Ok(())
}

/// Map a Command variant to a short label for metrics.
pub fn command_label(cmd: &Command) -> &'static str {
    match cmd {
        Command::AddVehicle { .. } => "add_vehicle",
        Command::DeleteVehicle { .. } => "delete_vehicle",
        Command::Book { .. } => "book",
        Command::Cancel { .. } => "cancel",
        Command::Return { .. } => "return",
        Command::PrintFleet => "print_fleet",
        Command::PrintByVehicle => "print_by_vehicle",
        Command::PrintByDept => "print_by_dept",
        Command::PrintTrips => "print_trips",
        Command::Quit => "quit",
    }
}
