//! Fleet queries and availability changes.

use tracing::instrument;
use tripnest_core::{Availability, Vehicle, VehicleId, VehicleType};

use super::EntityClient;
use crate::error::ClientError;

impl EntityClient<Vehicle> {
    /// Vehicles of one category.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    #[instrument(skip(self))]
    pub async fn by_type(&self, vehicle_type: VehicleType) -> Result<Vec<Vehicle>, ClientError> {
        self.list(&format!("/by-type/{vehicle_type}")).await
    }

    /// Vehicles that can currently be booked.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    #[instrument(skip(self))]
    pub async fn available(&self) -> Result<Vec<Vehicle>, ClientError> {
        self.list("/available").await
    }

    /// Change a vehicle's availability.
    ///
    /// The fleet API only offers full replacement, so the current record is
    /// fetched, patched and written back.
    ///
    /// # Errors
    ///
    /// Returns error if either request fails.
    #[instrument(skip(self))]
    pub async fn set_availability(
        &self,
        id: VehicleId,
        availability: Availability,
    ) -> Result<Vehicle, ClientError> {
        let mut vehicle = self.get(id).await?;
        vehicle.availability = availability;
        self.update(id, &vehicle).await
    }
}
