//! The configured movies API client.
//!
//! `MoviesApi` pairs a `MoviesClient` with a `Transport`: every method builds
//! the request, performs one round-trip and parses the outcome. Failures of
//! any kind come back as the `Err` branch; nothing is retried.

use crate::client::MoviesClient;
use crate::config::ClientConfig;
use crate::contract;
use crate::error::ApiError;
use crate::transport::{ReqwestTransport, Transport};
use crate::types::{
    CreateMovieRequest, CreatedMovie, ListMoviesResponse, MovieResponse, UpdateMovieRequest,
};

#[derive(Debug, Clone)]
pub struct MoviesApi<T = ReqwestTransport> {
    client: MoviesClient,
    transport: T,
}

impl MoviesApi<ReqwestTransport> {
    pub fn from_config(config: &ClientConfig) -> Result<Self, ApiError> {
        Self::new(config, ReqwestTransport::new())
    }
}

impl<T: Transport> MoviesApi<T> {
    /// Bind a transport to the contract. Fails if the endpoint table is
    /// inconsistent.
    pub fn new(config: &ClientConfig, transport: T) -> Result<Self, ApiError> {
        contract::ensure_valid()?;
        Ok(Self {
            client: MoviesClient::new(&config.base_url),
            transport,
        })
    }

    pub fn client(&self) -> &MoviesClient {
        &self.client
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub async fn list_movies(&self) -> Result<ListMoviesResponse, ApiError> {
        let request = self.client.build_list_movies()?;
        let response = self.transport.execute(&request).await?;
        self.client.parse_list_movies(response)
    }

    pub async fn get_movie(&self, id: i64) -> Result<MovieResponse, ApiError> {
        let request = self.client.build_get_movie(id)?;
        let response = self.transport.execute(&request).await?;
        self.client.parse_get_movie(response)
    }

    pub async fn create_movie(&self, input: &CreateMovieRequest) -> Result<CreatedMovie, ApiError> {
        let request = self.client.build_create_movie(input)?;
        let response = self.transport.execute(&request).await?;
        self.client.parse_create_movie(response)
    }

    pub async fn update_movie(
        &self,
        id: i64,
        input: &UpdateMovieRequest,
    ) -> Result<MovieResponse, ApiError> {
        let request = self.client.build_update_movie(id, input)?;
        let response = self.transport.execute(&request).await?;
        self.client.parse_update_movie(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::HttpMethod;
    use crate::transport::stub::StubTransport;

    fn api(transport: StubTransport) -> MoviesApi<StubTransport> {
        let config = ClientConfig::new("http://movies.test").unwrap();
        MoviesApi::new(&config, transport).unwrap()
    }

    #[tokio::test]
    async fn list_movies_issues_one_get() {
        let api = api(StubTransport::default().respond(200, r#"{"movies":[]}"#));
        let list = api.list_movies().await.unwrap();
        assert_eq!(list.movies, Some(vec![]));

        let sent = api.transport().sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].method, HttpMethod::Get);
        assert_eq!(sent[0].url, "http://movies.test/v1/movies");
    }

    #[tokio::test]
    async fn transport_failure_is_the_error_branch() {
        let api = api(StubTransport::default().fail("connection refused"));
        let err = api.get_movie(1).await.unwrap_err();
        assert!(matches!(err, ApiError::Transport(msg) if msg == "connection refused"));
        assert_eq!(api.transport().sent().len(), 1);
    }

    #[tokio::test]
    async fn update_sends_patch_with_partial_body() {
        let api = api(StubTransport::default().respond(404, ""));
        let input = UpdateMovieRequest {
            genres: Some(vec!["Drama".to_string()]),
            ..Default::default()
        };
        let err = api.update_movie(5, &input).await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound));

        let sent = api.transport().sent();
        assert_eq!(sent[0].method, HttpMethod::Patch);
        assert_eq!(sent[0].url, "http://movies.test/v1/movies/5");
        assert_eq!(sent[0].body.as_deref(), Some(r#"{"genres":["Drama"]}"#));
    }

    #[tokio::test]
    async fn create_surfaces_validation_message() {
        let api = api(StubTransport::default().respond(400, r#"{"error":"year: must be provided"}"#));
        let input = CreateMovieRequest {
            title: "Up".to_string(),
            year: 0,
            runtime_min: 96,
            genres: vec!["Animation".to_string()],
        };
        let err = api.create_movie(&input).await.unwrap_err();
        assert!(
            matches!(err, ApiError::BadRequest { error: Some(ref msg) } if msg == "year: must be provided")
        );
    }
}
