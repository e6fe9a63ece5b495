//! Rendering for the movie list page.

use crate::error::ApiError;
use crate::types::ListMoviesResponse;

pub const NO_MOVIES: &str = "No movies found";

/// Render the outcome of `GET /v1/movies`.
pub fn render_home(result: &Result<ListMoviesResponse, ApiError>) -> String {
    let data = match result {
        Ok(data) => data,
        Err(err) => return render_error(err),
    };

    match &data.movies {
        Some(movies) if !movies.is_empty() => match serde_json::to_string_pretty(data) {
            Ok(page) => page,
            Err(e) => render_error(&ApiError::Serialization(e.to_string())),
        },
        _ => NO_MOVIES.to_string(),
    }
}

fn render_error(err: &ApiError) -> String {
    format!("An error occurred: {}", err.payload())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Movie;

    #[test]
    fn empty_list_renders_not_found() {
        let result = Ok(ListMoviesResponse {
            movies: Some(vec![]),
        });
        assert_eq!(render_home(&result), "No movies found");
    }

    #[test]
    fn absent_list_renders_not_found() {
        let result = Ok(ListMoviesResponse::default());
        assert_eq!(render_home(&result), "No movies found");
    }

    #[test]
    fn movies_render_as_json() {
        let result = Ok(ListMoviesResponse {
            movies: Some(vec![Movie {
                id: 1,
                version: 1,
                title: "Up".to_string(),
                year: 2009,
                runtime: "96 min".to_string(),
                genres: vec!["Animation".to_string()],
            }]),
        });
        let page = render_home(&result);
        assert!(page.contains("\"title\": \"Up\""));
        assert!(page.starts_with('{'));
    }

    #[test]
    fn errors_render_their_payload() {
        let result = Err(ApiError::BadRequest {
            error: Some("boom".to_string()),
        });
        assert_eq!(render_home(&result), r#"An error occurred: {"error":"boom"}"#);

        let result = Err(ApiError::NotFound);
        assert_eq!(render_home(&result), "An error occurred: null");
    }

    #[test]
    fn serialization_failures_render_as_errors() {
        let err = ApiError::Serialization("key must be a string".to_string());
        assert_eq!(
            render_error(&err),
            r#"An error occurred: {"error":"serialization failed: key must be a string"}"#
        );
    }
}
