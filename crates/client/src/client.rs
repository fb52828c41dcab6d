//! Typed client for the cartrack REST API.
//!
//! Wraps the backend's JSON-over-HTTP contract in one method per
//! endpoint. All state is explicit: the base URL and the [`Session`]
//! holding the bearer token are supplied at construction. Payloads are
//! validated locally before submission; non-2xx responses surface
//! verbatim as [`ClientError::Api`]; nothing is retried.

use reqwest::Method;
use serde::de::DeserializeOwned;
use uuid::Uuid;
use validator::Validate;

use cartrack_core::model::{
    Car, CarCreate, CarUpdate, Household, HouseholdCreate, LoginRequest, ReminderPreferences,
    RenewalCreate, RenewalKind, RenewalRecord, RenewalUpdate, SignupRequest, TokenResponse,
    UpcomingRenewalEntry, User,
};
use cartrack_core::reminders;

use crate::error::{ClientError, ClientResult};
use crate::session::Session;

/// Default backend base URL for local development.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Bounds accepted by the upcoming-renewals window parameter.
const UPCOMING_DAYS_MIN: i64 = 1;
const UPCOMING_DAYS_MAX: i64 = 365;

/// HTTP client for the cartrack backend API.
///
/// Cheap to clone; clones share the session and the underlying
/// connection pool.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: Session,
}

impl ApiClient {
    /// Create a client for the backend at `base_url`.
    pub fn new(base_url: impl Into<String>, session: Session) -> Self {
        Self::with_client(reqwest::Client::new(), base_url, session)
    }

    /// Create a client reusing an existing [`reqwest::Client`]
    /// (useful for connection pooling across clients).
    pub fn with_client(
        http: reqwest::Client,
        base_url: impl Into<String>,
        session: Session,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http,
            base_url,
            session,
        }
    }

    /// The session this client authenticates with.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// The backend base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // -----------------------------------------------------------------------
    // Request plumbing
    // -----------------------------------------------------------------------

    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{path}", self.base_url);
        let mut builder = self.http.request(method, url);
        if let Some(token) = self.session.token() {
            builder = builder.bearer_auth(token);
        }
        builder
    }

    /// Send a request and decode a JSON body.
    async fn send<T: DeserializeOwned>(
        &self,
        builder: reqwest::RequestBuilder,
    ) -> ClientResult<T> {
        let response = check_status(builder.send().await?).await?;
        Ok(response.json().await?)
    }

    /// Send a request, expecting no body on success.
    async fn send_no_content(&self, builder: reqwest::RequestBuilder) -> ClientResult<()> {
        check_status(builder.send().await?).await?;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Auth
    // -----------------------------------------------------------------------

    /// `POST /api/auth/signup`
    pub async fn signup(&self, payload: &SignupRequest) -> ClientResult<User> {
        payload.validate()?;
        self.send(self.request(Method::POST, "/api/auth/signup").json(payload))
            .await
    }

    /// `POST /api/auth/login`
    ///
    /// Returns the token; storing it in the session is the caller's
    /// decision.
    pub async fn login(&self, payload: &LoginRequest) -> ClientResult<TokenResponse> {
        self.send(self.request(Method::POST, "/api/auth/login").json(payload))
            .await
    }

    // -----------------------------------------------------------------------
    // Households
    // -----------------------------------------------------------------------

    /// `POST /api/households`
    pub async fn create_household(&self, payload: &HouseholdCreate) -> ClientResult<Household> {
        payload.validate()?;
        self.send(self.request(Method::POST, "/api/households").json(payload))
            .await
    }

    /// `GET /api/households/current`
    pub async fn current_household(&self) -> ClientResult<Household> {
        self.send(self.request(Method::GET, "/api/households/current"))
            .await
    }

    // -----------------------------------------------------------------------
    // Cars
    // -----------------------------------------------------------------------

    /// `GET /api/cars`
    pub async fn list_cars(&self, include_archived: bool) -> ClientResult<Vec<Car>> {
        self.send(
            self.request(Method::GET, "/api/cars")
                .query(&[("include_archived", include_archived)]),
        )
        .await
    }

    /// `POST /api/cars`
    pub async fn create_car(&self, payload: &CarCreate) -> ClientResult<Car> {
        payload.validate()?;
        self.send(self.request(Method::POST, "/api/cars").json(payload))
            .await
    }

    /// `GET /api/cars/{id}`
    pub async fn get_car(&self, car_id: Uuid) -> ClientResult<Car> {
        self.send(self.request(Method::GET, &format!("/api/cars/{car_id}")))
            .await
    }

    /// `PATCH /api/cars/{id}`
    pub async fn update_car(&self, car_id: Uuid, payload: &CarUpdate) -> ClientResult<Car> {
        payload.validate()?;
        self.send(
            self.request(Method::PATCH, &format!("/api/cars/{car_id}"))
                .json(payload),
        )
        .await
    }

    /// `POST /api/cars/{id}/archive`
    pub async fn archive_car(&self, car_id: Uuid) -> ClientResult<Car> {
        self.send(self.request(Method::POST, &format!("/api/cars/{car_id}/archive")))
            .await
    }

    /// `POST /api/cars/{id}/unarchive`
    pub async fn unarchive_car(&self, car_id: Uuid) -> ClientResult<Car> {
        self.send(self.request(Method::POST, &format!("/api/cars/{car_id}/unarchive")))
            .await
    }

    // -----------------------------------------------------------------------
    // Renewals
    // -----------------------------------------------------------------------

    /// `GET /api/cars/{id}/renewals`
    pub async fn list_renewals(
        &self,
        car_id: Uuid,
        kind: Option<RenewalKind>,
    ) -> ClientResult<Vec<RenewalRecord>> {
        let mut builder = self.request(Method::GET, &format!("/api/cars/{car_id}/renewals"));
        if let Some(kind) = kind {
            builder = builder.query(&[("kind", kind.as_str())]);
        }
        self.send(builder).await
    }

    /// `POST /api/cars/{id}/renewals`
    pub async fn create_renewal(
        &self,
        car_id: Uuid,
        payload: &RenewalCreate,
    ) -> ClientResult<RenewalRecord> {
        payload.validate()?;
        payload.validate_range().map_err(ClientError::Validation)?;
        self.send(
            self.request(Method::POST, &format!("/api/cars/{car_id}/renewals"))
                .json(payload),
        )
        .await
    }

    /// `GET /api/renewals/{id}`
    pub async fn get_renewal(&self, renewal_id: Uuid) -> ClientResult<RenewalRecord> {
        self.send(self.request(Method::GET, &format!("/api/renewals/{renewal_id}")))
            .await
    }

    /// `PATCH /api/renewals/{id}`
    pub async fn update_renewal(
        &self,
        renewal_id: Uuid,
        payload: &RenewalUpdate,
    ) -> ClientResult<RenewalRecord> {
        payload.validate()?;
        payload.validate_range().map_err(ClientError::Validation)?;
        self.send(
            self.request(Method::PATCH, &format!("/api/renewals/{renewal_id}"))
                .json(payload),
        )
        .await
    }

    /// `DELETE /api/renewals/{id}` (soft delete; backend answers 204)
    pub async fn delete_renewal(&self, renewal_id: Uuid) -> ClientResult<()> {
        self.send_no_content(self.request(Method::DELETE, &format!("/api/renewals/{renewal_id}")))
            .await
    }

    /// `GET /api/renewals/upcoming`
    pub async fn upcoming_renewals(&self, days: i64) -> ClientResult<Vec<UpcomingRenewalEntry>> {
        if !(UPCOMING_DAYS_MIN..=UPCOMING_DAYS_MAX).contains(&days) {
            return Err(ClientError::Validation(format!(
                "days must be between {UPCOMING_DAYS_MIN} and {UPCOMING_DAYS_MAX} (got {days})"
            )));
        }
        self.send(
            self.request(Method::GET, "/api/renewals/upcoming")
                .query(&[("days", days)]),
        )
        .await
    }

    // -----------------------------------------------------------------------
    // Settings
    // -----------------------------------------------------------------------

    /// `GET /api/settings/reminders`
    pub async fn reminder_preferences(&self) -> ClientResult<ReminderPreferences> {
        self.send(self.request(Method::GET, "/api/settings/reminders"))
            .await
    }

    /// `PUT /api/settings/reminders`
    ///
    /// Offsets are validated and normalised locally before submission; a
    /// negative offset never reaches the wire.
    pub async fn save_reminder_preferences(
        &self,
        prefs: &ReminderPreferences,
    ) -> ClientResult<ReminderPreferences> {
        reminders::validate_offsets(prefs).map_err(ClientError::Validation)?;
        let normalized = reminders::normalize(prefs);
        self.send(
            self.request(Method::PUT, "/api/settings/reminders")
                .json(&normalized),
        )
        .await
    }
}

/// Turn a non-2xx response into [`ClientError::Api`], preferring the
/// backend's `detail` message when the body carries one.
async fn check_status(response: reqwest::Response) -> ClientResult<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|value| {
            value
                .get("detail")
                .and_then(|detail| detail.as_str())
                .map(str::to_string)
        })
        .unwrap_or_else(|| {
            if body.is_empty() {
                "Request failed".to_string()
            } else {
                body
            }
        });

    tracing::warn!(status = status.as_u16(), %message, "API request failed");
    Err(ClientError::Api {
        status: status.as_u16(),
        message,
    })
}
