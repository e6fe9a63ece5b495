//! Stateless HTTP request builder and response parser for the movies API.
//!
//! # Design
//! `MoviesClient` holds only a `base_url` and carries no mutable state between
//! calls. Each operation is split into a `build_*` method that produces an
//! `HttpRequest` and a `parse_*` method that consumes an `HttpResponse`.
//! Methods, paths and status handling come from the endpoint table in
//! `contract`, so nothing here repeats a route by hand.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::contract::{BodyShape, Endpoint, Operation};
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::types::{
    CreateMovieRequest, CreatedMovie, ErrorResponse, ListMoviesResponse, MovieResponse,
    UpdateMovieRequest,
};

/// Synchronous, stateless client for the movies API.
#[derive(Debug, Clone)]
pub struct MoviesClient {
    base_url: String,
}

impl MoviesClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_list_movies(&self) -> Result<HttpRequest, ApiError> {
        self.build(Operation::ListMovies, &[], None)
    }

    pub fn build_get_movie(&self, id: i64) -> Result<HttpRequest, ApiError> {
        self.build(Operation::GetMovie, &[("id", id)], None)
    }

    pub fn build_create_movie(&self, input: &CreateMovieRequest) -> Result<HttpRequest, ApiError> {
        let body = to_json(input)?;
        self.build(Operation::CreateMovie, &[], Some(body))
    }

    pub fn build_update_movie(
        &self,
        id: i64,
        input: &UpdateMovieRequest,
    ) -> Result<HttpRequest, ApiError> {
        let body = to_json(input)?;
        self.build(Operation::UpdateMovie, &[("id", id)], Some(body))
    }

    pub fn parse_list_movies(&self, response: HttpResponse) -> Result<ListMoviesResponse, ApiError> {
        parse(Operation::ListMovies.endpoint(), &response)
    }

    pub fn parse_get_movie(&self, response: HttpResponse) -> Result<MovieResponse, ApiError> {
        parse(Operation::GetMovie.endpoint(), &response)
    }

    pub fn parse_create_movie(&self, response: HttpResponse) -> Result<CreatedMovie, ApiError> {
        let envelope: MovieResponse = parse(Operation::CreateMovie.endpoint(), &response)?;
        Ok(CreatedMovie {
            movie: envelope.movie,
            location: response.header("location").map(str::to_string),
        })
    }

    pub fn parse_update_movie(&self, response: HttpResponse) -> Result<MovieResponse, ApiError> {
        parse(Operation::UpdateMovie.endpoint(), &response)
    }

    /// Build the request for any contract operation from its descriptor.
    pub fn build(
        &self,
        operation: Operation,
        params: &[(&str, i64)],
        body: Option<String>,
    ) -> Result<HttpRequest, ApiError> {
        self.build_endpoint(operation.endpoint(), params, body)
    }

    pub fn build_endpoint(
        &self,
        endpoint: &Endpoint,
        params: &[(&str, i64)],
        body: Option<String>,
    ) -> Result<HttpRequest, ApiError> {
        let path = endpoint.render_path(params)?;
        let headers = match body {
            Some(_) => vec![("content-type".to_string(), "application/json".to_string())],
            None => Vec::new(),
        };
        Ok(HttpRequest {
            method: endpoint.method,
            url: format!("{}{path}", self.base_url),
            headers,
            body,
        })
    }
}

fn to_json<T: Serialize>(input: &T) -> Result<String, ApiError> {
    serde_json::to_string(input).map_err(|e| ApiError::Serialization(e.to_string()))
}

/// Map a response onto the endpoint's declared outcomes.
pub(crate) fn parse<T: DeserializeOwned>(
    endpoint: &Endpoint,
    response: &HttpResponse,
) -> Result<T, ApiError> {
    let Some(spec) = endpoint.response(response.status) else {
        return Err(ApiError::UnexpectedStatus {
            status: response.status,
            body: response.body.clone(),
        });
    };

    if spec.is_success() {
        return serde_json::from_str(&response.body)
            .map_err(|e| ApiError::Deserialization(e.to_string()));
    }

    match spec.body {
        BodyShape::Error => {
            // A 400 whose body is not the error envelope still counts as a 400.
            let envelope: ErrorResponse = serde_json::from_str(&response.body).unwrap_or_default();
            Err(ApiError::BadRequest {
                error: envelope.error,
            })
        }
        _ if response.status == 404 => Err(ApiError::NotFound),
        _ => Err(ApiError::UnexpectedStatus {
            status: response.status,
            body: response.body.clone(),
        }),
    }
}
