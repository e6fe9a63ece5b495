//! Typed client for the movies REST API.
//!
//! # Overview
//! `contract` describes every endpoint once. `MoviesClient` builds
//! `HttpRequest` values and parses `HttpResponse` values from that
//! description without touching the network (host-does-IO pattern); a
//! `Transport` performs the round-trip. `MoviesApi` pairs the two, and
//! `swr::Hooks` hands out the cache-policy accessors scoped under `"movies"`.
//!
//! # Design
//! - Every call returns `Result<data, ApiError>`; nothing panics across the
//!   client boundary and nothing is retried.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod api;
pub mod client;
pub mod config;
pub mod contract;
pub mod error;
pub mod home;
pub mod http;
pub mod swr;
pub mod transport;
pub mod types;

pub use api::MoviesApi;
pub use client::MoviesClient;
pub use config::ClientConfig;
pub use contract::{Endpoint, Operation};
pub use error::{ApiError, ConfigError, ContractError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use swr::{Accessor, CachePolicy, Hooks, QueryKey};
pub use transport::{ReqwestTransport, Transport};
pub use types::{
    CreateMovieRequest, CreatedMovie, ErrorResponse, ListMoviesResponse, Movie, MovieResponse,
    UpdateMovieRequest,
};
