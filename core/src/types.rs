//! Wire DTOs for the movies API.
//!
//! # Design
//! These types mirror the contract schemas field for field. `id` and
//! `version` appear only on `Movie`: they are assigned by the backend and
//! never sent by the client. Response envelopes keep every field optional
//! because the contract declares them optional.

use serde::{Deserialize, Serialize};

/// A movie as returned by the backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Movie {
    pub id: i64,
    pub version: i32,
    pub title: String,
    pub year: i32,
    /// Runtime formatted as `"<N> min"`.
    pub runtime: String,
    pub genres: Vec<String>,
}

impl Movie {
    /// Runtime in minutes, recovered from the `"<N> min"` text form.
    pub fn runtime_minutes(&self) -> Option<i32> {
        self.runtime.strip_suffix(" min")?.parse().ok()
    }
}

/// Render a runtime in minutes the way the backend does.
pub fn format_runtime(minutes: i32) -> String {
    format!("{minutes} min")
}

/// Request payload for creating a movie. All fields are required.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CreateMovieRequest {
    pub title: String,
    pub year: i32,
    pub runtime_min: i32,
    pub genres: Vec<String>,
}

/// Partial update payload. Omitted fields stay unchanged on the server.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMovieRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runtime_min: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genres: Option<Vec<String>>,
}

/// `200` body of `GET /v1/movies`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ListMoviesResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub movies: Option<Vec<Movie>>,
}

/// Single-movie envelope used by get, create and update.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct MovieResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub movie: Option<Movie>,
}

/// `400` body: `{ "error": "..." }`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Result of a successful create: the envelope plus the `Location` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedMovie {
    pub movie: Option<Movie>,
    pub location: Option<String>,
}
