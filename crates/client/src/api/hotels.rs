//! Hotel-specific queries.

use tracing::instrument;
use tripnest_core::Hotel;

use super::EntityClient;
use crate::error::ClientError;

impl EntityClient<Hotel> {
    /// Hotels offering `amenity` (e.g. "pool").
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    #[instrument(skip(self))]
    pub async fn by_amenity(&self, amenity: &str) -> Result<Vec<Hotel>, ClientError> {
        self.list(&format!("/by-amenity/{}", urlencoding::encode(amenity.trim())))
            .await
    }
}
