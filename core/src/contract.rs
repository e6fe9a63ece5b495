//! Static description of the movies API.
//!
//! # Design
//! Every endpoint the client may call is listed once in `ENDPOINTS`: method,
//! path template, path parameters, request body shape and the mapping from
//! status code to response body shape. The client derives URLs and status
//! handling from this table instead of hard-coding them, so the table is the
//! single interop boundary with the backend.
//!
//! The table is checked once per process by `ensure_valid`, not on every
//! call.

use once_cell::sync::Lazy;

use crate::error::ContractError;
use crate::http::HttpMethod;

/// The operations the contract defines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    ListMovies,
    CreateMovie,
    GetMovie,
    UpdateMovie,
}

impl Operation {
    pub fn endpoint(self) -> &'static Endpoint {
        match self {
            Operation::ListMovies => &ENDPOINTS[0],
            Operation::CreateMovie => &ENDPOINTS[1],
            Operation::GetMovie => &ENDPOINTS[2],
            Operation::UpdateMovie => &ENDPOINTS[3],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    Integer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathParam {
    pub name: &'static str,
    pub kind: ParamKind,
}

/// Named schemas a request or response body can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyShape {
    /// `{ movies?: Movie[] }`
    MovieList,
    /// `{ movie?: Movie }`
    SingleMovie,
    /// `{ error?: string }`
    Error,
    CreateMovieRequest,
    UpdateMovieRequest,
    /// No content.
    Empty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResponseSpec {
    pub status: u16,
    pub description: &'static str,
    pub body: BodyShape,
    /// Headers the contract documents for this response.
    pub headers: &'static [&'static str],
}

impl ResponseSpec {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoint {
    pub operation: Operation,
    pub method: HttpMethod,
    pub path: &'static str,
    pub summary: &'static str,
    pub path_params: &'static [PathParam],
    pub request_body: Option<BodyShape>,
    pub responses: &'static [ResponseSpec],
    pub paginated: bool,
}

const ID_PARAM: &[PathParam] = &[PathParam {
    name: "id",
    kind: ParamKind::Integer,
}];

const BAD_REQUEST: ResponseSpec = ResponseSpec {
    status: 400,
    description: "Bad request",
    body: BodyShape::Error,
    headers: &[],
};

const NOT_FOUND: ResponseSpec = ResponseSpec {
    status: 404,
    description: "Movie not found",
    body: BodyShape::Empty,
    headers: &[],
};

pub static ENDPOINTS: [Endpoint; 4] = [
    Endpoint {
        operation: Operation::ListMovies,
        method: HttpMethod::Get,
        path: "/v1/movies",
        summary: "List all movies",
        path_params: &[],
        request_body: None,
        responses: &[ResponseSpec {
            status: 200,
            description: "List of movies",
            body: BodyShape::MovieList,
            headers: &[],
        }],
        paginated: false,
    },
    Endpoint {
        operation: Operation::CreateMovie,
        method: HttpMethod::Post,
        path: "/v1/movies",
        summary: "Create a new movie",
        path_params: &[],
        request_body: Some(BodyShape::CreateMovieRequest),
        responses: &[
            ResponseSpec {
                status: 201,
                description: "Movie created successfully",
                body: BodyShape::SingleMovie,
                headers: &["Location"],
            },
            BAD_REQUEST,
        ],
        paginated: false,
    },
    Endpoint {
        operation: Operation::GetMovie,
        method: HttpMethod::Get,
        path: "/v1/movies/{id}",
        summary: "Get a movie by ID",
        path_params: ID_PARAM,
        request_body: None,
        responses: &[
            ResponseSpec {
                status: 200,
                description: "Movie found",
                body: BodyShape::SingleMovie,
                headers: &[],
            },
            NOT_FOUND,
        ],
        paginated: false,
    },
    Endpoint {
        operation: Operation::UpdateMovie,
        method: HttpMethod::Patch,
        path: "/v1/movies/{id}",
        summary: "Update a movie",
        path_params: ID_PARAM,
        request_body: Some(BodyShape::UpdateMovieRequest),
        responses: &[
            ResponseSpec {
                status: 200,
                description: "Movie updated successfully",
                body: BodyShape::SingleMovie,
                headers: &[],
            },
            BAD_REQUEST,
            NOT_FOUND,
        ],
        paginated: false,
    },
];

impl Endpoint {
    /// The declared response for `status`, if any.
    pub fn response(&self, status: u16) -> Option<&'static ResponseSpec> {
        self.responses.iter().find(|r| r.status == status)
    }

    /// The first declared 2xx status.
    pub fn success_status(&self) -> u16 {
        self.responses
            .iter()
            .find(|r| r.is_success())
            .map(|r| r.status)
            .unwrap_or(200)
    }

    /// Substitute path parameters into the template.
    ///
    /// Every placeholder needs a value and every value needs a placeholder.
    pub fn render_path(&self, params: &[(&str, i64)]) -> Result<String, ContractError> {
        for (name, _) in params {
            if !self.path_params.iter().any(|p| p.name == *name) {
                return Err(ContractError::UnknownParameter {
                    path: self.path,
                    name: name.to_string(),
                });
            }
        }

        let mut rendered = String::with_capacity(self.path.len());
        for segment in self.path.split('/').skip(1) {
            rendered.push('/');
            match placeholder(segment) {
                Some(name) => {
                    let param = self
                        .path_params
                        .iter()
                        .find(|p| p.name == name)
                        .ok_or_else(|| ContractError::UndeclaredPlaceholder {
                            path: self.path,
                            name: name.to_string(),
                        })?;
                    let (_, value) = params
                        .iter()
                        .find(|(n, _)| *n == param.name)
                        .ok_or(ContractError::MissingParameter {
                            path: self.path,
                            name: param.name,
                        })?;
                    rendered.push_str(&value.to_string());
                }
                None => rendered.push_str(segment),
            }
        }
        Ok(rendered)
    }
}

fn placeholder(segment: &str) -> Option<&str> {
    segment.strip_prefix('{')?.strip_suffix('}')
}

fn placeholders(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter_map(placeholder)
}

/// Look up an endpoint by method and path template.
pub fn find(method: HttpMethod, path: &str) -> Option<&'static Endpoint> {
    ENDPOINTS.iter().find(|e| e.method == method && e.path == path)
}

/// Check a descriptor table for internal consistency.
pub fn validate(endpoints: &[Endpoint]) -> Result<(), ContractError> {
    for (i, endpoint) in endpoints.iter().enumerate() {
        let method = endpoint.method.as_str();
        let path = endpoint.path;

        if endpoints[..i]
            .iter()
            .any(|e| e.method == endpoint.method && e.path == path)
        {
            return Err(ContractError::DuplicateEndpoint { method, path });
        }

        for name in placeholders(path) {
            if !endpoint.path_params.iter().any(|p| p.name == name) {
                return Err(ContractError::UndeclaredPlaceholder {
                    path,
                    name: name.to_string(),
                });
            }
        }
        for param in endpoint.path_params {
            if !placeholders(path).any(|name| name == param.name) {
                return Err(ContractError::UnusedParameter {
                    path,
                    name: param.name,
                });
            }
        }

        if !endpoint.responses.iter().any(ResponseSpec::is_success) {
            return Err(ContractError::NoSuccessResponse { method, path });
        }

        if endpoint.method.has_body() != endpoint.request_body.is_some() {
            return Err(ContractError::BodyMismatch { method, path });
        }
    }
    Ok(())
}

static VALIDATION: Lazy<Result<(), ContractError>> = Lazy::new(|| validate(&ENDPOINTS));

/// Result of validating `ENDPOINTS`, computed on first use.
pub fn ensure_valid() -> Result<(), ContractError> {
    VALIDATION.clone()
}
