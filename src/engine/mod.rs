mod conflict;
mod error;
mod fleet;
mod ledger;
mod mutations;
mod queries;
mod trips;

pub use conflict::{today, Policy};
pub use error::{DateRole, EngineError, ErrorKind, PolicyViolation};
pub use fleet::FleetRegistry;
pub use ledger::ReservationLedger;
pub use trips::TripLog;

use crate::observability::{BOOKINGS_ACTIVE, VEHICLES_ACTIVE};

/// Fleet, active bookings and trip history, owned by one command loop.
///
/// Every mutation runs its checks before touching any collection, so a
/// rejected request leaves no partial state behind.
#[derive(Debug, Default)]
pub struct Engine {
    fleet: FleetRegistry,
    ledger: ReservationLedger,
    trips: TripLog,
    policy: Policy,
}

impl Engine {
    pub fn new(policy: Policy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    pub fn policy(&self) -> &Policy {
        &self.policy
    }

    pub fn fleet(&self) -> &FleetRegistry {
        &self.fleet
    }

    pub fn ledger(&self) -> &ReservationLedger {
        &self.ledger
    }

    pub fn trips(&self) -> &TripLog {
        &self.trips
    }

    fn record_sizes(&self) {
        metrics::gauge!(VEHICLES_ACTIVE).set(self.fleet.len() as f64);
        metrics::gauge!(BOOKINGS_ACTIVE).set(self.ledger.len() as f64);
    }
}
