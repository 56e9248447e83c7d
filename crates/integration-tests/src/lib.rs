//! Integration tests for TripNest provider clients.
//!
//! Every scenario runs against two local mock servers, one standing in for
//! the marketplace API and one for the image host, so the tests need no
//! network access or credentials.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p tripnest-integration-tests
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Arc;

use mockito::ServerGuard;
use secrecy::SecretString;
use tripnest_client::api::{ApiClient, EntityClient};
use tripnest_client::config::ImageHostConfig;
use tripnest_client::session::{ACCESS_TOKEN_KEY, SERVICE_PROVIDER_KEY, Session};
use tripnest_client::snapshot::SnapshotRepository;
use tripnest_client::store::{KeyValueStore, MemoryStore};
use tripnest_client::upload::{CloudinaryHost, UploadPipeline};
use tripnest_client::wizard::{Draft, NoDelay, Wizard, WizardContext, WizardOptions};
use tripnest_core::{ProviderRecord, ServiceProviderId};

/// Bearer token stored for the signed-in provider.
pub const TEST_TOKEN: &str = "test-access-token";

/// Id of the signed-in provider.
pub const TEST_PROVIDER_ID: i64 = 7;

/// Cloud name used in the image host endpoint.
pub const TEST_CLOUD: &str = "tripnest-test";

/// Mock API and image host plus a signed-in local store.
pub struct TestContext {
    pub api_server: ServerGuard,
    pub image_server: ServerGuard,
    pub store: Arc<MemoryStore>,
}

/// Wizard wired to the mock servers with no transition delays.
pub type TestWizard<D> =
    Wizard<D, EntityClient<<D as Draft>::Record>, CloudinaryHost, NoDelay>;

impl TestContext {
    /// Start both mock servers and sign in provider [`TEST_PROVIDER_ID`].
    pub async fn new() -> Self {
        let store = MemoryStore::with_entries([
            (ACCESS_TOKEN_KEY.to_string(), TEST_TOKEN.to_string()),
            (
                SERVICE_PROVIDER_KEY.to_string(),
                format!(r#"{{"id":{TEST_PROVIDER_ID},"name":"Test Provider"}}"#),
            ),
        ]);

        Self {
            api_server: mockito::Server::new_async().await,
            image_server: mockito::Server::new_async().await,
            store: Arc::new(store),
        }
    }

    /// The provider id as a typed id.
    #[must_use]
    pub const fn provider_id() -> ServiceProviderId {
        ServiceProviderId::new(TEST_PROVIDER_ID)
    }

    /// Path of the image upload endpoint on the mock host.
    #[must_use]
    pub fn upload_path() -> String {
        format!("/v1_1/{TEST_CLOUD}/image/upload")
    }

    fn shared_store(&self) -> Arc<dyn KeyValueStore> {
        Arc::clone(&self.store) as Arc<dyn KeyValueStore>
    }

    /// Session read from the local store.
    ///
    /// # Panics
    ///
    /// Panics if the store holds no session.
    #[must_use]
    pub fn session(&self) -> Session {
        Session::from_store(self.store.as_ref()).expect("test store holds a session")
    }

    /// Snapshot repository over the local store.
    #[must_use]
    pub fn snapshots(&self) -> SnapshotRepository {
        SnapshotRepository::new(self.shared_store())
    }

    /// Typed client against the mock API.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client fails to build.
    #[must_use]
    pub fn client<R: ProviderRecord>(&self) -> EntityClient<R> {
        let api = ApiClient::new(&self.api_server.url(), self.session())
            .expect("HTTP client builds");
        EntityClient::new(api, self.snapshots())
    }

    /// Upload pipeline against the mock image host.
    #[must_use]
    pub fn uploads(&self) -> Arc<UploadPipeline<CloudinaryHost>> {
        let config = ImageHostConfig {
            upload_url: self.image_server.url(),
            cloud_name: TEST_CLOUD.to_string(),
            upload_preset: SecretString::from("provider_unsigned"),
        };
        Arc::new(UploadPipeline::new(CloudinaryHost::new(&config)))
    }

    /// Collaborators for a wizard of draft type `D`.
    #[must_use]
    pub fn wizard_context<D: Draft>(
        &self,
    ) -> WizardContext<EntityClient<D::Record>, CloudinaryHost, NoDelay> {
        WizardContext {
            api: self.client::<D::Record>(),
            uploads: self.uploads(),
            session: self.session(),
            timer: NoDelay,
            options: WizardOptions::default(),
        }
    }

    /// A fresh create-mode wizard.
    #[must_use]
    pub fn wizard<D: Draft>(&self) -> TestWizard<D> {
        Wizard::new(self.wizard_context::<D>())
    }
}
