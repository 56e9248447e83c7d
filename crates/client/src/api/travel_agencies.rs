//! Travel agency-specific queries.

use tracing::instrument;
use tripnest_core::TravelAgency;

use super::EntityClient;
use crate::error::ClientError;

impl EntityClient<TravelAgency> {
    /// Agencies operating from `location` (e.g. "Kandy").
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    #[instrument(skip(self))]
    pub async fn by_location(&self, location: &str) -> Result<Vec<TravelAgency>, ClientError> {
        self.list(&format!("/by-location/{}", urlencoding::encode(location.trim())))
            .await
    }
}
