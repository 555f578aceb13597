use crate::model::*;

/// Insertion-ordered vehicle records, unique by plate.
#[derive(Debug, Default)]
pub struct FleetRegistry {
    vehicles: Vec<SharedVehicle>,
}

impl FleetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.vehicles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vehicles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SharedVehicle> {
        self.vehicles.iter()
    }

    fn position(&self, vehicle: &Vehicle) -> Option<usize> {
        self.vehicles.iter().position(|v| *v.borrow() == *vehicle)
    }

    /// Append unless a vehicle with the same plate is already present.
    /// Returns whether the record was inserted.
    pub fn add(&mut self, vehicle: SharedVehicle) -> bool {
        if self.search_by_plate(vehicle.borrow().plate()).is_some() {
            return false;
        }
        self.vehicles.push(vehicle);
        true
    }

    /// Remove the first record matching by plate. The last record takes its
    /// slot, so insertion order is not preserved.
    pub fn remove(&mut self, vehicle: &Vehicle) -> Option<SharedVehicle> {
        let idx = self.position(vehicle)?;
        Some(self.vehicles.swap_remove(idx))
    }

    pub fn contains(&self, vehicle: &Vehicle) -> bool {
        self.position(vehicle).is_some()
    }

    /// Case-insensitive exact plate match.
    pub fn search_by_plate(&self, plate: &str) -> Option<SharedVehicle> {
        self.vehicles
            .iter()
            .find(|v| v.borrow().plate().eq_ignore_ascii_case(plate))
            .cloned()
    }

    /// Sort the records in place by make, then date obtained. The sort is
    /// stable, so equal keys keep their relative order.
    pub fn sort_by_make(&mut self) -> &[SharedVehicle] {
        self.vehicles
            .sort_by(|a, b| a.borrow().cmp_by_make(&b.borrow()));
        &self.vehicles
    }
}
