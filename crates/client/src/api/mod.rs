//! Marketplace REST API client.
//!
//! [`ApiClient`] turns one typed call into one HTTP request: it attaches the
//! session's bearer token, sends JSON, and normalizes the response into an
//! [`ApiBody`] or a [`ClientError::Http`]. [`EntityClient`] layers the CRUD
//! endpoints shared by every entity kind on top, and mirrors confirmed
//! results into the profile snapshot cache.
//!
//! # Endpoints
//!
//! For each kind's base path (`/api/hotels`, `/api/tour-guides`, ...):
//!
//! | Operation | Request |
//! |-----------|---------|
//! | create | `POST {base}/create` |
//! | get | `GET {base}/{id}` |
//! | all | `GET {base}/all` |
//! | update | `PUT {base}/{id}` |
//! | delete | `DELETE {base}/{id}` |
//! | by service provider | `GET {base}/service-provider/{id}` |
//!
//! Kind-specific queries live in the per-kind modules.
//!
//! No retries and no timeouts beyond the HTTP client's defaults.

mod hotels;
mod tour_guides;
mod travel_agencies;
mod vehicles;

use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;

use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use tracing::{debug, instrument, warn};
use tripnest_core::{Hotel, ProviderRecord, ServiceProviderId, TourGuide, TravelAgency, Vehicle};

use crate::error::ClientError;
use crate::session::Session;
use crate::snapshot::SnapshotRepository;
use crate::store::StoreError;

/// Client for hotel profiles.
pub type HotelClient = EntityClient<Hotel>;
/// Client for tour guide profiles.
pub type TourGuideClient = EntityClient<TourGuide>;
/// Client for travel agency profiles.
pub type TravelAgencyClient = EntityClient<TravelAgency>;
/// Client for fleet vehicles.
pub type VehicleClient = EntityClient<Vehicle>;

/// A successful response body.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiBody {
    /// The server declared `application/json`.
    Json(Value),
    /// Anything else, verbatim.
    Text(String),
}

impl ApiBody {
    /// Decode a JSON body into `T`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::UnexpectedBody`] for text bodies or JSON of the
    /// wrong shape.
    pub fn into_json<T: DeserializeOwned>(self) -> Result<T, ClientError> {
        match self {
            Self::Json(value) => serde_json::from_value(value)
                .map_err(|e| ClientError::UnexpectedBody(e.to_string())),
            Self::Text(text) => Err(ClientError::UnexpectedBody(format!(
                "expected JSON, got text: {}",
                truncate(&text, 120)
            ))),
        }
    }

    /// Human-readable rendering, for text confirmations such as delete.
    #[must_use]
    pub fn to_display_string(&self) -> String {
        match self {
            Self::Json(value) => value.to_string(),
            Self::Text(text) => text.clone(),
        }
    }
}

/// Marketplace API client bound to one session.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: String,
    session: Session,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url)
            .field("session", &self.inner.session)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Create a client for the API rooted at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(base_url: &str, session: Session) -> Result<Self, ClientError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                client,
                base_url: base_url.trim_end_matches('/').to_string(),
                session,
            }),
        })
    }

    /// The session every request is authorized with.
    #[must_use]
    pub fn session(&self) -> &Session {
        &self.inner.session
    }

    /// API root URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    /// Execute a GET request.
    pub(crate) async fn get(&self, path: &str) -> Result<ApiBody, ClientError> {
        self.send(self.request(Method::GET, path)).await
    }

    /// Execute a POST request with a JSON body.
    pub(crate) async fn post<B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<ApiBody, ClientError> {
        self.send(self.request(Method::POST, path).json(body)).await
    }

    /// Execute a PUT request with a JSON body.
    pub(crate) async fn put<B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<ApiBody, ClientError> {
        self.send(self.request(Method::PUT, path).json(body)).await
    }

    /// Execute a DELETE request.
    pub(crate) async fn delete(&self, path: &str) -> Result<ApiBody, ClientError> {
        self.send(self.request(Method::DELETE, path)).await
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.inner
            .client
            .request(method, format!("{}{path}", self.inner.base_url))
            .bearer_auth(self.inner.session.access_token())
    }

    async fn send(&self, request: RequestBuilder) -> Result<ApiBody, ClientError> {
        let response = request.send().await?;
        handle_response(response).await
    }
}

/// Normalize a response into a body or an HTTP error.
async fn handle_response(response: Response) -> Result<ApiBody, ClientError> {
    let status = response.status();
    let is_json = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.contains("application/json"));
    let text = response.text().await?;

    if !status.is_success() {
        let message = error_message(status, &text);
        debug!(status = status.as_u16(), %message, "API request failed");
        return Err(ClientError::Http {
            status: status.as_u16(),
            message,
        });
    }

    if is_json && !text.trim().is_empty() {
        let value = serde_json::from_str(&text)
            .map_err(|e| ClientError::UnexpectedBody(format!("invalid JSON: {e}")))?;
        return Ok(ApiBody::Json(value));
    }

    Ok(ApiBody::Text(text))
}

/// Pick the error message out of a failed response body.
///
/// Prefers a string `message`, then a string `error`, then the status line.
fn error_message(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|value| {
            ["message", "error"].iter().find_map(|field| {
                value
                    .get(field)
                    .and_then(Value::as_str)
                    .filter(|s| !s.trim().is_empty())
                    .map(str::to_string)
            })
        })
        .unwrap_or_else(|| {
            format!(
                "HTTP {}: {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown Status")
            )
        })
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", text.get(..idx).unwrap_or(text)),
        None => text.to_string(),
    }
}

/// Create and update operations a wizard submits through.
pub trait ProfileApi<R: ProviderRecord>: Send + Sync {
    /// Create a record.
    fn create(&self, payload: &R) -> impl Future<Output = Result<R, ClientError>> + Send;

    /// Replace the record with `id`.
    fn update(&self, id: R::Id, payload: &R)
    -> impl Future<Output = Result<R, ClientError>> + Send;
}

/// CRUD client for one entity kind.
pub struct EntityClient<R> {
    api: ApiClient,
    snapshots: SnapshotRepository,
    _record: PhantomData<fn() -> R>,
}

impl<R> Clone for EntityClient<R> {
    fn clone(&self) -> Self {
        Self {
            api: self.api.clone(),
            snapshots: self.snapshots.clone(),
            _record: PhantomData,
        }
    }
}

impl<R: ProviderRecord> std::fmt::Debug for EntityClient<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntityClient")
            .field("kind", &R::KIND)
            .field("api", &self.api)
            .finish_non_exhaustive()
    }
}

impl<R: ProviderRecord> EntityClient<R> {
    /// Create a client over `api`, mirroring into `snapshots`.
    #[must_use]
    pub const fn new(api: ApiClient, snapshots: SnapshotRepository) -> Self {
        Self {
            api,
            snapshots,
            _record: PhantomData,
        }
    }

    /// Snapshot cache this client mirrors into.
    #[must_use]
    pub const fn snapshots(&self) -> &SnapshotRepository {
        &self.snapshots
    }

    fn path(suffix: &str) -> String {
        format!("{}{suffix}", R::KIND.base_path())
    }

    /// Create a record.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the server rejects the payload.
    #[instrument(skip_all, fields(kind = %R::KIND))]
    pub async fn create(&self, payload: &R) -> Result<R, ClientError> {
        let record: R = self.api.post(&Self::path("/create"), payload).await?.into_json()?;
        debug!(id = ?record.id().map(|id| id.to_string()), "Record created");
        self.mirror_saved(&record, None);
        Ok(record)
    }

    /// Fetch one record.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the record does not exist.
    #[instrument(skip_all, fields(kind = %R::KIND, id = %id))]
    pub async fn get(&self, id: R::Id) -> Result<R, ClientError> {
        self.api.get(&Self::path(&format!("/{id}"))).await?.into_json()
    }

    /// Fetch every record of this kind.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    #[instrument(skip_all, fields(kind = %R::KIND))]
    pub async fn all(&self) -> Result<Vec<R>, ClientError> {
        self.list("/all").await
    }

    /// Replace the record with `id`.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the server rejects the payload.
    #[instrument(skip_all, fields(kind = %R::KIND, id = %id))]
    pub async fn update(&self, id: R::Id, payload: &R) -> Result<R, ClientError> {
        let record: R = self
            .api
            .put(&Self::path(&format!("/{id}")), payload)
            .await?
            .into_json()?;
        debug!("Record updated");
        self.mirror_saved(&record, Some(id));
        Ok(record)
    }

    /// Delete the record with `id`. The snapshot is only dropped once the
    /// server confirms.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the server refuses.
    #[instrument(skip_all, fields(kind = %R::KIND, id = %id))]
    pub async fn delete(&self, id: R::Id) -> Result<ApiBody, ClientError> {
        let body = self.api.delete(&Self::path(&format!("/{id}"))).await?;
        debug!("Record deleted");
        self.mirror_deleted(id);
        Ok(body)
    }

    /// Records owned by `provider`.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    #[instrument(skip_all, fields(kind = %R::KIND, provider = %provider))]
    pub async fn by_service_provider(
        &self,
        provider: ServiceProviderId,
    ) -> Result<Vec<R>, ClientError> {
        self.list(&format!("/service-provider/{provider}")).await
    }

    /// Records owned by the signed-in provider.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    pub async fn mine(&self) -> Result<Vec<R>, ClientError> {
        self.by_service_provider(self.api.session().service_provider_id())
            .await
    }

    /// GET a list endpoint under this kind's base path.
    pub(crate) async fn list(&self, suffix: &str) -> Result<Vec<R>, ClientError> {
        self.api.get(&Self::path(suffix)).await?.into_json()
    }

    /// Whether `record` belongs to the signed-in provider. Records without an
    /// owner are treated as the caller's own, since the server echoes the
    /// caller's payload.
    fn belongs_to_session(&self, record: &R) -> bool {
        record
            .service_provider_id()
            .is_none_or(|owner| owner == self.api.session().service_provider_id())
    }

    /// Whether an update of `id` should refresh the snapshot: either the
    /// snapshot holds that record or nothing is cached yet.
    fn update_targets_snapshot(&self, id: R::Id) -> Result<bool, StoreError> {
        if self.snapshots.load_raw(R::KIND)?.is_none() {
            return Ok(true);
        }
        self.snapshots.holds::<R>(id)
    }

    /// Best-effort snapshot write after a confirmed create/update.
    fn mirror_saved(&self, record: &R, updated_id: Option<R::Id>) {
        if R::KIND.snapshot_key().is_none() {
            return;
        }

        let matches = match updated_id {
            Some(id) => match self.update_targets_snapshot(id) {
                Ok(matches) => matches,
                Err(e) => {
                    // An unreadable value names no profile, so it is replaced.
                    warn!(kind = %R::KIND, error = %e, "Replacing unreadable snapshot");
                    true
                }
            },
            None => self.belongs_to_session(record),
        };

        if !matches {
            return;
        }

        if let Err(e) = self.snapshots.save(record) {
            warn!(kind = %R::KIND, error = %e, "Failed to mirror record into snapshot");
        }
    }

    /// Best-effort snapshot removal after a confirmed delete.
    fn mirror_deleted(&self, id: R::Id) {
        if R::KIND.snapshot_key().is_none() {
            return;
        }

        let result = self.snapshots.holds::<R>(id).and_then(|held| {
            if held {
                self.snapshots.remove(R::KIND).map(|_| ())
            } else {
                Ok(())
            }
        });

        if let Err(e) = result {
            warn!(kind = %R::KIND, error = %e, "Failed to clear snapshot after delete");
        }
    }
}

impl<R: ProviderRecord> ProfileApi<R> for EntityClient<R> {
    fn create(&self, payload: &R) -> impl Future<Output = Result<R, ClientError>> + Send {
        Self::create(self, payload)
    }

    fn update(
        &self,
        id: R::Id,
        payload: &R,
    ) -> impl Future<Output = Result<R, ClientError>> + Send {
        Self::update(self, id, payload)
    }
}
