//! In-process stub of the backend API for integration tests.
//!
//! Implements just enough of the fixed REST contract (auth, cars,
//! renewals, upcoming, reminder settings) to exercise the client
//! end-to-end over real HTTP. Backed by an in-memory state the tests can
//! seed and inspect directly.

#![allow(dead_code)]

use std::sync::{Arc, Mutex, MutexGuard};

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use cartrack_client::{ApiClient, Session};
use cartrack_core::model::{
    Car, ReminderPreferences, RenewalKind, RenewalRecord, UpcomingRenewalEntry,
};
use cartrack_core::reminders;

/// Bearer token the stub accepts on authenticated routes.
pub const VALID_TOKEN: &str = "stub-token-1234";
/// Credentials the stub's login endpoint accepts.
pub const VALID_EMAIL: &str = "user@example.com";
pub const VALID_PASSWORD: &str = "correct-horse-battery";
/// Email the stub treats as already registered.
pub const TAKEN_EMAIL: &str = "taken@example.com";

/// Household every stub car belongs to.
pub const HOUSEHOLD_ID: Uuid = Uuid::from_u128(42);

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct StubState {
    pub cars: Vec<Car>,
    pub renewals: Vec<RenewalRecord>,
    pub upcoming: Vec<UpcomingRenewalEntry>,
    pub preferences: Option<ReminderPreferences>,
}

pub type SharedState = Arc<Mutex<StubState>>;

/// A running stub server plus handles for seeding and inspection.
pub struct StubServer {
    pub base_url: String,
    pub state: SharedState,
}

impl StubServer {
    /// A client that authenticates with the stub's valid token.
    pub fn authed_client(&self) -> ApiClient {
        ApiClient::new(self.base_url.as_str(), Session::with_token(VALID_TOKEN))
    }

    /// A client with an anonymous session.
    pub fn anonymous_client(&self) -> ApiClient {
        ApiClient::new(self.base_url.as_str(), Session::new())
    }

    pub fn lock(&self) -> MutexGuard<'_, StubState> {
        self.state.lock().expect("stub state lock")
    }

    /// Insert a car row and return it.
    pub fn seed_car(&self, registration_number: &str) -> Car {
        let now = Utc::now();
        let car = Car {
            id: Uuid::new_v4(),
            household_id: HOUSEHOLD_ID,
            registration_number: registration_number.to_string(),
            make: None,
            model: None,
            is_archived: false,
            created_at: now,
            updated_at: now,
        };
        self.lock().cars.push(car.clone());
        car
    }

    /// Insert a renewal row and return it. The date strings are stored
    /// verbatim, so tests can seed malformed dates.
    pub fn seed_renewal(
        &self,
        car_id: Uuid,
        kind: RenewalKind,
        valid_from: &str,
        valid_to: &str,
    ) -> RenewalRecord {
        let now = Utc::now();
        let record = RenewalRecord {
            id: Uuid::new_v4(),
            car_id,
            kind,
            valid_from: valid_from.to_string(),
            valid_to: valid_to.to_string(),
            provider: None,
            reference: None,
            cost_pence: None,
            notes: None,
            is_deleted: false,
            created_at: now,
            updated_at: now,
        };
        self.lock().renewals.push(record.clone());
        record
    }

    /// Replace the canned upcoming-renewals aggregate.
    pub fn seed_upcoming(&self, entries: Vec<UpcomingRenewalEntry>) {
        self.lock().upcoming = entries;
    }
}

/// Bind the stub to an ephemeral local port and serve it in the
/// background for the remainder of the test.
pub async fn spawn_stub() -> StubServer {
    let state: SharedState = Arc::default();
    let app = router(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind stub listener");
    let addr = listener.local_addr().expect("stub listener address");

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("stub server failed");
    });

    StubServer {
        base_url: format!("http://{addr}"),
        state,
    }
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

fn router(state: SharedState) -> Router {
    Router::new()
        .route("/api/auth/signup", post(signup))
        .route("/api/auth/login", post(login))
        .route("/api/cars", get(list_cars).post(create_car))
        .route("/api/cars/{car_id}", get(get_car).patch(update_car))
        .route("/api/cars/{car_id}/archive", post(archive_car))
        .route("/api/cars/{car_id}/unarchive", post(unarchive_car))
        .route(
            "/api/cars/{car_id}/renewals",
            get(list_renewals).post(create_renewal),
        )
        .route("/api/renewals/upcoming", get(upcoming_renewals))
        .route(
            "/api/renewals/{renewal_id}",
            get(get_renewal).patch(update_renewal).delete(delete_renewal),
        )
        .route(
            "/api/settings/reminders",
            get(get_reminders).put(put_reminders),
        )
        .with_state(state)
}

fn error(status: StatusCode, detail: &str) -> Response {
    (status, Json(json!({ "detail": detail }))).into_response()
}

fn authed(headers: &HeaderMap) -> Result<(), Response> {
    let expected = format!("Bearer {VALID_TOKEN}");
    let ok = headers
        .get("authorization")
        .and_then(|value| value.to_str().ok())
        .map(|value| value == expected)
        .unwrap_or(false);
    if ok {
        Ok(())
    } else {
        Err(error(StatusCode::UNAUTHORIZED, "Invalid token"))
    }
}

// ---------------------------------------------------------------------------
// Auth handlers
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct CredentialsBody {
    email: String,
    password: String,
}

async fn signup(Json(body): Json<CredentialsBody>) -> Response {
    if body.email == TAKEN_EMAIL {
        return error(StatusCode::CONFLICT, "Email already registered");
    }
    (
        StatusCode::CREATED,
        Json(json!({
            "id": Uuid::new_v4(),
            "email": body.email,
            "created_at": Utc::now(),
        })),
    )
        .into_response()
}

async fn login(Json(body): Json<CredentialsBody>) -> Response {
    if body.email == VALID_EMAIL && body.password == VALID_PASSWORD {
        Json(json!({ "access_token": VALID_TOKEN, "token_type": "bearer" })).into_response()
    } else {
        error(StatusCode::UNAUTHORIZED, "Invalid credentials")
    }
}

// ---------------------------------------------------------------------------
// Car handlers
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct ListCarsQuery {
    #[serde(default)]
    include_archived: Option<bool>,
}

async fn list_cars(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Query(query): Query<ListCarsQuery>,
) -> Response {
    if let Err(response) = authed(&headers) {
        return response;
    }
    let state = state.lock().expect("stub state lock");
    let include_archived = query.include_archived.unwrap_or(false);
    let cars: Vec<Car> = state
        .cars
        .iter()
        .filter(|car| include_archived || !car.is_archived)
        .cloned()
        .collect();
    Json(cars).into_response()
}

#[derive(Deserialize)]
struct CarCreateBody {
    registration_number: String,
    #[serde(default)]
    make: Option<String>,
    #[serde(default)]
    model: Option<String>,
}

async fn create_car(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Json(body): Json<CarCreateBody>,
) -> Response {
    if let Err(response) = authed(&headers) {
        return response;
    }
    let now = Utc::now();
    // The backend normalises the VRM on write.
    let car = Car {
        id: Uuid::new_v4(),
        household_id: HOUSEHOLD_ID,
        registration_number: body.registration_number.trim().to_uppercase(),
        make: body.make,
        model: body.model,
        is_archived: false,
        created_at: now,
        updated_at: now,
    };
    state.lock().expect("stub state lock").cars.push(car.clone());
    (StatusCode::CREATED, Json(car)).into_response()
}

async fn get_car(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(car_id): Path<Uuid>,
) -> Response {
    if let Err(response) = authed(&headers) {
        return response;
    }
    let state = state.lock().expect("stub state lock");
    match state.cars.iter().find(|car| car.id == car_id) {
        Some(car) => Json(car.clone()).into_response(),
        None => error(StatusCode::NOT_FOUND, "Car not found"),
    }
}

#[derive(Deserialize)]
struct CarUpdateBody {
    #[serde(default)]
    registration_number: Option<String>,
    #[serde(default)]
    make: Option<String>,
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    is_archived: Option<bool>,
}

async fn update_car(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(car_id): Path<Uuid>,
    Json(body): Json<CarUpdateBody>,
) -> Response {
    if let Err(response) = authed(&headers) {
        return response;
    }
    let mut state = state.lock().expect("stub state lock");
    let Some(car) = state.cars.iter_mut().find(|car| car.id == car_id) else {
        return error(StatusCode::NOT_FOUND, "Car not found");
    };
    if let Some(vrm) = body.registration_number {
        car.registration_number = vrm.trim().to_uppercase();
    }
    if let Some(make) = body.make {
        car.make = Some(make);
    }
    if let Some(model) = body.model {
        car.model = Some(model);
    }
    if let Some(is_archived) = body.is_archived {
        car.is_archived = is_archived;
    }
    car.updated_at = Utc::now();
    Json(car.clone()).into_response()
}

async fn archive_car(
    state: State<SharedState>,
    headers: HeaderMap,
    path: Path<Uuid>,
) -> Response {
    set_archived(state, headers, path, true).await
}

async fn unarchive_car(
    state: State<SharedState>,
    headers: HeaderMap,
    path: Path<Uuid>,
) -> Response {
    set_archived(state, headers, path, false).await
}

async fn set_archived(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(car_id): Path<Uuid>,
    archived: bool,
) -> Response {
    if let Err(response) = authed(&headers) {
        return response;
    }
    let mut state = state.lock().expect("stub state lock");
    let Some(car) = state.cars.iter_mut().find(|car| car.id == car_id) else {
        return error(StatusCode::NOT_FOUND, "Car not found");
    };
    car.is_archived = archived;
    car.updated_at = Utc::now();
    Json(car.clone()).into_response()
}

// ---------------------------------------------------------------------------
// Renewal handlers
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct ListRenewalsQuery {
    #[serde(default)]
    kind: Option<String>,
}

async fn list_renewals(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(car_id): Path<Uuid>,
    Query(query): Query<ListRenewalsQuery>,
) -> Response {
    if let Err(response) = authed(&headers) {
        return response;
    }
    let kind = match query.kind.as_deref().map(RenewalKind::from_str_value) {
        None => None,
        Some(Ok(kind)) => Some(kind),
        Some(Err(detail)) => return error(StatusCode::UNPROCESSABLE_ENTITY, &detail),
    };

    let state = state.lock().expect("stub state lock");
    if !state.cars.iter().any(|car| car.id == car_id) {
        return error(StatusCode::NOT_FOUND, "Car not found");
    }
    let rows: Vec<RenewalRecord> = state
        .renewals
        .iter()
        .filter(|row| row.car_id == car_id && !row.is_deleted)
        .filter(|row| kind.map_or(true, |kind| row.kind == kind))
        .cloned()
        .collect();
    Json(rows).into_response()
}

#[derive(Deserialize)]
struct RenewalCreateBody {
    kind: RenewalKind,
    valid_from: String,
    valid_to: String,
    #[serde(default)]
    provider: Option<String>,
    #[serde(default)]
    reference: Option<String>,
    #[serde(default)]
    cost_pence: Option<i64>,
    #[serde(default)]
    notes: Option<String>,
}

async fn create_renewal(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(car_id): Path<Uuid>,
    Json(body): Json<RenewalCreateBody>,
) -> Response {
    if let Err(response) = authed(&headers) {
        return response;
    }
    let mut state = state.lock().expect("stub state lock");
    if !state.cars.iter().any(|car| car.id == car_id) {
        return error(StatusCode::NOT_FOUND, "Car not found");
    }
    let now = Utc::now();
    let record = RenewalRecord {
        id: Uuid::new_v4(),
        car_id,
        kind: body.kind,
        valid_from: body.valid_from,
        valid_to: body.valid_to,
        provider: body.provider,
        reference: body.reference,
        cost_pence: body.cost_pence,
        notes: body.notes,
        is_deleted: false,
        created_at: now,
        updated_at: now,
    };
    state.renewals.push(record.clone());
    (StatusCode::CREATED, Json(record)).into_response()
}

async fn get_renewal(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(renewal_id): Path<Uuid>,
) -> Response {
    if let Err(response) = authed(&headers) {
        return response;
    }
    let state = state.lock().expect("stub state lock");
    match state
        .renewals
        .iter()
        .find(|row| row.id == renewal_id && !row.is_deleted)
    {
        Some(row) => Json(row.clone()).into_response(),
        None => error(StatusCode::NOT_FOUND, "Renewal not found"),
    }
}

#[derive(Deserialize)]
struct RenewalUpdateBody {
    #[serde(default)]
    valid_from: Option<String>,
    #[serde(default)]
    valid_to: Option<String>,
    #[serde(default)]
    provider: Option<String>,
    #[serde(default)]
    reference: Option<String>,
    #[serde(default)]
    cost_pence: Option<i64>,
    #[serde(default)]
    notes: Option<String>,
}

async fn update_renewal(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(renewal_id): Path<Uuid>,
    Json(body): Json<RenewalUpdateBody>,
) -> Response {
    if let Err(response) = authed(&headers) {
        return response;
    }
    let mut state = state.lock().expect("stub state lock");
    let Some(row) = state
        .renewals
        .iter_mut()
        .find(|row| row.id == renewal_id && !row.is_deleted)
    else {
        return error(StatusCode::NOT_FOUND, "Renewal not found");
    };
    if let Some(valid_from) = body.valid_from {
        row.valid_from = valid_from;
    }
    if let Some(valid_to) = body.valid_to {
        row.valid_to = valid_to;
    }
    if let Some(provider) = body.provider {
        row.provider = Some(provider);
    }
    if let Some(reference) = body.reference {
        row.reference = Some(reference);
    }
    if let Some(cost_pence) = body.cost_pence {
        row.cost_pence = Some(cost_pence);
    }
    if let Some(notes) = body.notes {
        row.notes = Some(notes);
    }
    row.updated_at = Utc::now();
    Json(row.clone()).into_response()
}

async fn delete_renewal(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(renewal_id): Path<Uuid>,
) -> Response {
    if let Err(response) = authed(&headers) {
        return response;
    }
    let mut state = state.lock().expect("stub state lock");
    if let Some(row) = state.renewals.iter_mut().find(|row| row.id == renewal_id) {
        row.is_deleted = true;
        row.updated_at = Utc::now();
    }
    StatusCode::NO_CONTENT.into_response()
}

#[derive(Deserialize)]
struct UpcomingQuery {
    #[serde(default)]
    days: Option<i64>,
}

async fn upcoming_renewals(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Query(_query): Query<UpcomingQuery>,
) -> Response {
    if let Err(response) = authed(&headers) {
        return response;
    }
    let state = state.lock().expect("stub state lock");
    Json(state.upcoming.clone()).into_response()
}

// ---------------------------------------------------------------------------
// Settings handlers
// ---------------------------------------------------------------------------

async fn get_reminders(State(state): State<SharedState>, headers: HeaderMap) -> Response {
    if let Err(response) = authed(&headers) {
        return response;
    }
    let state = state.lock().expect("stub state lock");
    let prefs = state
        .preferences
        .clone()
        .unwrap_or_else(reminders::default_preferences);
    Json(prefs).into_response()
}

async fn put_reminders(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Json(body): Json<ReminderPreferences>,
) -> Response {
    if let Err(response) = authed(&headers) {
        return response;
    }
    let mut state = state.lock().expect("stub state lock");
    state.preferences = Some(body.clone());
    Json(body).into_response()
}
