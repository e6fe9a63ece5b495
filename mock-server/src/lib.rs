//! In-memory movies backend used by tests and local development.
//!
//! Implements the `/v1/movies` contract: envelopes (`{"movies": [...]}`,
//! `{"movie": ...}`, `{"error": "..."}`), a `Location` header on create, empty
//! 404 bodies, and the backend's input validation.

use std::{collections::BTreeMap, sync::Arc};

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::Datelike;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::json;
use tokio::{net::TcpListener, sync::RwLock};
use tower_http::trace::TraceLayer;
use tracing::info;

const TITLE_MAX_BYTES: usize = 500;
const YEAR_MIN: i32 = 1888;
const GENRES_MAX: usize = 5;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movie {
    pub id: i64,
    pub version: i32,
    pub title: String,
    pub year: i32,
    pub runtime: String,
    pub genres: Vec<String>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateMovieRequest {
    pub title: String,
    pub year: i32,
    pub runtime_min: i32,
    pub genres: Vec<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateMovieRequest {
    pub title: Option<String>,
    pub year: Option<i32>,
    pub runtime_min: Option<i32>,
    pub genres: Option<Vec<String>>,
}

#[derive(Clone, Debug)]
struct StoredMovie {
    id: i64,
    version: i32,
    input: CreateMovieRequest,
}

impl StoredMovie {
    fn to_api(&self) -> Movie {
        Movie {
            id: self.id,
            version: self.version,
            title: self.input.title.clone(),
            year: self.input.year,
            runtime: format!("{} min", self.input.runtime_min),
            genres: self.input.genres.clone(),
        }
    }
}

#[derive(Debug, Default)]
pub struct Store {
    last_id: i64,
    movies: BTreeMap<i64, StoredMovie>,
}

pub type Db = Arc<RwLock<Store>>;

/// Failures the contract declares.
#[derive(Debug, PartialEq, Eq)]
pub enum ServerError {
    BadRequest(String),
    NotFound,
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        match self {
            ServerError::BadRequest(message) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response()
            }
            ServerError::NotFound => StatusCode::NOT_FOUND.into_response(),
        }
    }
}

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::default()));
    Router::new()
        .route("/v1/movies", get(list_movies).post(create_movie))
        .route("/v1/movies/{id}", get(get_movie).patch(update_movie))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app().layer(TraceLayer::new_for_http())).await
}

async fn list_movies(State(db): State<Db>) -> Json<serde_json::Value> {
    let store = db.read().await;
    let movies: Vec<Movie> = store.movies.values().map(StoredMovie::to_api).collect();
    Json(json!({ "movies": movies }))
}

async fn create_movie(State(db): State<Db>, body: Bytes) -> Result<Response, ServerError> {
    let input: CreateMovieRequest = read_json(&body)?;
    validate(&input).map_err(ServerError::BadRequest)?;

    let mut store = db.write().await;
    store.last_id += 1;
    let stored = StoredMovie {
        id: store.last_id,
        version: 1,
        input,
    };
    store.movies.insert(stored.id, stored.clone());

    let movie = stored.to_api();
    info!(id = movie.id, title = %movie.title, "created movie");
    let location = format!("/v1/movies/{}", movie.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(json!({ "movie": movie })),
    )
        .into_response())
}

async fn get_movie(
    State(db): State<Db>,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, ServerError> {
    let store = db.read().await;
    let movie = store.movies.get(&id).ok_or(ServerError::NotFound)?;
    Ok(Json(json!({ "movie": movie.to_api() })))
}

async fn update_movie(
    State(db): State<Db>,
    Path(id): Path<i64>,
    body: Bytes,
) -> Result<Json<serde_json::Value>, ServerError> {
    let updates: UpdateMovieRequest = read_json(&body)?;

    let mut store = db.write().await;
    let stored = store.movies.get_mut(&id).ok_or(ServerError::NotFound)?;
    let merged = merge(&stored.input, updates);
    validate(&merged).map_err(ServerError::BadRequest)?;

    stored.input = merged;
    stored.version += 1;
    let movie = stored.to_api();
    info!(id = movie.id, version = movie.version, "updated movie");
    Ok(Json(json!({ "movie": movie })))
}

fn read_json<T: DeserializeOwned>(body: &[u8]) -> Result<T, ServerError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(ServerError::BadRequest("body must not be empty".to_string()));
    }
    serde_json::from_slice(body)
        .map_err(|e| ServerError::BadRequest(format!("body contains invalid JSON: {e}")))
}

fn merge(existing: &CreateMovieRequest, updates: UpdateMovieRequest) -> CreateMovieRequest {
    CreateMovieRequest {
        title: updates.title.unwrap_or_else(|| existing.title.clone()),
        year: updates.year.unwrap_or(existing.year),
        runtime_min: updates.runtime_min.unwrap_or(existing.runtime_min),
        genres: updates.genres.unwrap_or_else(|| existing.genres.clone()),
    }
}

/// Check a complete movie. Reports the first problem per field, joined as
/// `field: message; ...`.
pub fn validate(input: &CreateMovieRequest) -> Result<(), String> {
    let current_year = chrono::Utc::now().year();
    let mut errors = Vec::new();

    let title = if input.title.is_empty() {
        Some("must be provided")
    } else if input.title.len() > TITLE_MAX_BYTES {
        Some("must not be more than 500 bytes long")
    } else {
        None
    };
    let year = if input.year == 0 {
        Some("must be provided")
    } else if input.year < YEAR_MIN {
        Some("must be greater than 1888")
    } else if input.year > current_year {
        Some("must not be in the future")
    } else {
        None
    };
    let runtime = if input.runtime_min == 0 {
        Some("must be provided")
    } else if input.runtime_min < 0 {
        Some("must be a positive integer")
    } else {
        None
    };
    let genres = if input.genres.is_empty() {
        Some("must contain at least 1 genre")
    } else if input.genres.len() > GENRES_MAX {
        Some("must not contain more than 5 genres")
    } else if has_duplicates(&input.genres) {
        Some("must not contain duplicate values")
    } else {
        None
    };

    for (field, problem) in [
        ("title", title),
        ("year", year),
        ("runtimeMin", runtime),
        ("genres", genres),
    ] {
        if let Some(message) = problem {
            errors.push(format!("{field}: {message}"));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors.join("; "))
    }
}

fn has_duplicates(values: &[String]) -> bool {
    values
        .iter()
        .enumerate()
        .any(|(i, v)| values[..i].contains(v))
}
