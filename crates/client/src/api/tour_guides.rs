//! Tour guide-specific queries.

use tracing::instrument;
use tripnest_core::TourGuide;

use super::EntityClient;
use crate::error::ClientError;

impl EntityClient<TourGuide> {
    /// Guides who speak `language`.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    #[instrument(skip(self))]
    pub async fn by_language(&self, language: &str) -> Result<Vec<TourGuide>, ClientError> {
        self.list(&format!("/by-language/{}", urlencoding::encode(language.trim())))
            .await
    }
}
