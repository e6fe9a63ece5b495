//! Read accessors scoped under the `"movies"` cache prefix.
//!
//! # Design
//! `query`, `immutable` and `infinite` are not three transports. They are
//! one request function tagged with a `CachePolicy`, which a consuming cache
//! layer reads to decide whether to revalidate. Each call performs exactly
//! one request and never caches anything itself.
//!
//! Incremental fetching needs a paginated endpoint; the contract has none, so
//! the `infinite` accessor reports `PaginationUnsupported` instead of
//! inventing a cursor scheme.

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::api::MoviesApi;
use crate::client;
use crate::contract::{Endpoint, Operation};
use crate::error::ApiError;
use crate::http::HttpResponse;
use crate::transport::{ReqwestTransport, Transport};
use crate::types::{ListMoviesResponse, MovieResponse};

pub const PREFIX: &str = "movies";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CachePolicy {
    /// Fetch every time; cached data may be revalidated.
    NoCache,
    /// The resource never changes for the lifetime of its key.
    Immutable,
    /// Lazy, restartable sequence of pages.
    Infinite,
}

impl CachePolicy {
    /// Whether a cache holding data for this key should ever refetch it.
    pub fn revalidates(self) -> bool {
        !matches!(self, CachePolicy::Immutable)
    }
}

/// Cache key for one accessor call: the prefix plus the rendered path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey {
    pub prefix: &'static str,
    pub path: String,
}

/// Factory for the three accessors, all sharing one `MoviesApi`.
#[derive(Debug, Clone)]
pub struct Hooks<T = ReqwestTransport> {
    api: MoviesApi<T>,
    prefix: &'static str,
}

impl<T: Transport> Hooks<T> {
    pub fn new(api: MoviesApi<T>) -> Self {
        Self {
            api,
            prefix: PREFIX,
        }
    }

    pub fn api(&self) -> &MoviesApi<T> {
        &self.api
    }

    pub fn prefix(&self) -> &'static str {
        self.prefix
    }

    pub fn query(&self) -> Accessor<'_, T> {
        self.accessor(CachePolicy::NoCache)
    }

    pub fn immutable(&self) -> Accessor<'_, T> {
        self.accessor(CachePolicy::Immutable)
    }

    pub fn infinite(&self) -> Accessor<'_, T> {
        self.accessor(CachePolicy::Infinite)
    }

    fn accessor(&self, policy: CachePolicy) -> Accessor<'_, T> {
        Accessor {
            hooks: self,
            policy,
        }
    }
}

#[derive(Debug)]
pub struct Accessor<'a, T> {
    hooks: &'a Hooks<T>,
    policy: CachePolicy,
}

impl<'a, T: Transport> Accessor<'a, T> {
    pub fn policy(&self) -> CachePolicy {
        self.policy
    }

    pub fn key(&self, operation: Operation, params: &[(&str, i64)]) -> Result<QueryKey, ApiError> {
        Ok(QueryKey {
            prefix: self.hooks.prefix,
            path: operation.endpoint().render_path(params)?,
        })
    }

    pub async fn list_movies(&self) -> Result<ListMoviesResponse, ApiError> {
        let response = self.fetch(Operation::ListMovies.endpoint(), &[]).await?;
        self.hooks.api.client().parse_list_movies(response)
    }

    pub async fn get_movie(&self, id: i64) -> Result<MovieResponse, ApiError> {
        let response = self.fetch(Operation::GetMovie.endpoint(), &[("id", id)]).await?;
        self.hooks.api.client().parse_get_movie(response)
    }

    /// Incremental view over `operation`. Nothing is fetched until
    /// `Pages::next_page` is called.
    pub fn pages(&self, operation: Operation) -> Pages<'a, T> {
        self.pages_for(operation.endpoint())
    }

    fn pages_for(&self, endpoint: &'static Endpoint) -> Pages<'a, T> {
        Pages {
            hooks: self.hooks,
            policy: self.policy,
            endpoint,
            index: 0,
        }
    }

    async fn fetch(
        &self,
        endpoint: &'static Endpoint,
        params: &[(&str, i64)],
    ) -> Result<HttpResponse, ApiError> {
        if self.policy == CachePolicy::Infinite && !endpoint.paginated {
            return Err(ApiError::PaginationUnsupported {
                path: endpoint.path.to_string(),
            });
        }

        let path = endpoint.render_path(params)?;
        debug!(prefix = self.hooks.prefix, path = %path, policy = ?self.policy, "fetching");
        let request = self.hooks.api.client().build_endpoint(endpoint, params, None)?;
        self.hooks.api.transport().execute(&request).await
    }
}

/// Restartable page sequence over one endpoint. Pages are fetched only when
/// asked for, under the policy of the accessor that created the sequence.
///
/// The contract defines no cursor or offset convention, so every page
/// request is the endpoint's plain request; `index` only counts pages.
#[derive(Debug)]
pub struct Pages<'a, T> {
    hooks: &'a Hooks<T>,
    policy: CachePolicy,
    endpoint: &'static Endpoint,
    index: usize,
}

impl<'a, T: Transport> Pages<'a, T> {
    /// Number of pages fetched since the last restart.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn policy(&self) -> CachePolicy {
        self.policy
    }

    pub fn restart(&mut self) {
        self.index = 0;
    }

    pub async fn next_page<P: DeserializeOwned>(&mut self) -> Result<P, ApiError> {
        if self.policy != CachePolicy::Infinite {
            return Err(ApiError::PaginationUnsupported {
                path: self.endpoint.path.to_string(),
            });
        }

        let accessor = Accessor {
            hooks: self.hooks,
            policy: self.policy,
        };
        let response = accessor.fetch(self.endpoint, &[]).await?;
        let page = client::parse(self.endpoint, &response)?;
        self.index += 1;
        Ok(page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use crate::transport::stub::StubTransport;

    const UP: &str =
        r#"{"id":1,"version":1,"title":"Up","year":2009,"runtime":"96 min","genres":["Animation"]}"#;

    fn hooks(transport: StubTransport) -> Hooks<StubTransport> {
        let config = ClientConfig::new("http://movies.test").unwrap();
        Hooks::new(MoviesApi::new(&config, transport).unwrap())
    }

    #[test]
    fn policies_and_prefix() {
        let hooks = hooks(StubTransport::default());
        assert_eq!(hooks.prefix(), "movies");
        assert_eq!(hooks.query().policy(), CachePolicy::NoCache);
        assert_eq!(hooks.immutable().policy(), CachePolicy::Immutable);
        assert_eq!(hooks.infinite().policy(), CachePolicy::Infinite);

        assert!(CachePolicy::NoCache.revalidates());
        assert!(!CachePolicy::Immutable.revalidates());
    }

    #[test]
    fn key_renders_path_under_prefix() {
        let hooks = hooks(StubTransport::default());
        let key = hooks.query().key(Operation::GetMovie, &[("id", 3)]).unwrap();
        assert_eq!(
            key,
            QueryKey {
                prefix: "movies",
                path: "/v1/movies/3".to_string()
            }
        );
    }

    #[tokio::test]
    async fn query_returns_parsed_movies() {
        let body = format!(r#"{{"movies":[{UP}]}}"#);
        let hooks = hooks(StubTransport::default().respond(200, &body));
        let list = hooks.query().list_movies().await.unwrap();
        assert_eq!(list.movies.unwrap()[0].title, "Up");
    }

    #[tokio::test]
    async fn immutable_issues_one_request_per_call() {
        let body = format!(r#"{{"movie":{UP}}}"#);
        let hooks = hooks(
            StubTransport::default()
                .respond(200, &body)
                .respond(200, &body),
        );
        let first = hooks.immutable().get_movie(1).await.unwrap();
        let second = hooks.immutable().get_movie(1).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(hooks.api().transport().sent().len(), 2);
    }

    #[tokio::test]
    async fn missing_movie_is_the_error_branch() {
        let hooks = hooks(StubTransport::default().respond(404, ""));
        let result = hooks.query().get_movie(999).await;
        assert!(matches!(result, Err(ApiError::NotFound)));
    }

    #[tokio::test]
    async fn infinite_rejects_unpaginated_endpoints_without_a_request() {
        let hooks = hooks(StubTransport::default());
        let err = hooks.infinite().list_movies().await.unwrap_err();
        assert!(matches!(err, ApiError::PaginationUnsupported { ref path } if path == "/v1/movies"));
        assert!(hooks.api().transport().sent().is_empty());
    }

    #[tokio::test]
    async fn pages_reject_unpaginated_endpoints() {
        let hooks = hooks(StubTransport::default());
        let mut pages = hooks.infinite().pages(Operation::ListMovies);
        let err = pages.next_page::<ListMoviesResponse>().await.unwrap_err();
        assert!(matches!(err, ApiError::PaginationUnsupported { ref path } if path == "/v1/movies"));
        assert_eq!(pages.index(), 0);
        assert!(hooks.api().transport().sent().is_empty());
    }

    fn paginated_list() -> &'static Endpoint {
        Box::leak(Box::new(Endpoint {
            paginated: true,
            ..*Operation::ListMovies.endpoint()
        }))
    }

    #[tokio::test]
    async fn pages_advance_and_restart_on_paginated_endpoint() {
        let body = format!(r#"{{"movies":[{UP}]}}"#);
        let hooks = hooks(
            StubTransport::default()
                .respond(200, &body)
                .respond(200, r#"{"movies":[]}"#)
                .respond(200, &body),
        );
        let mut pages = hooks.infinite().pages_for(paginated_list());
        assert_eq!(pages.policy(), CachePolicy::Infinite);

        let first: ListMoviesResponse = pages.next_page().await.unwrap();
        assert_eq!(first.movies.unwrap()[0].title, "Up");
        assert_eq!(pages.index(), 1);

        let second: ListMoviesResponse = pages.next_page().await.unwrap();
        assert_eq!(second.movies, Some(vec![]));
        assert_eq!(pages.index(), 2);

        pages.restart();
        assert_eq!(pages.index(), 0);

        let again: ListMoviesResponse = pages.next_page().await.unwrap();
        assert_eq!(again.movies.unwrap()[0].title, "Up");
        assert_eq!(pages.index(), 1);
        assert_eq!(hooks.api().transport().sent().len(), 3);
    }

    #[tokio::test]
    async fn pages_from_non_infinite_accessors_are_rejected() {
        let hooks = hooks(StubTransport::default().respond(200, r#"{"movies":[]}"#));
        for accessor in [hooks.query(), hooks.immutable()] {
            let mut pages = accessor.pages_for(paginated_list());
            assert_eq!(pages.policy(), accessor.policy());
            let err = pages.next_page::<ListMoviesResponse>().await.unwrap_err();
            assert!(matches!(err, ApiError::PaginationUnsupported { .. }));
            assert_eq!(pages.index(), 0);
        }
        assert!(hooks.api().transport().sent().is_empty());
    }
}
