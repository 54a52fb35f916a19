use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Extension, Json,
};
use serde::{Serialize, Serializer};
use serde_json::Value as JsonValue;
use std::fmt;

fn serialize_status<S>(value: &StatusCode, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_u16(value.as_u16())
}

/// Implementation of a Problem Details response for HTTP APIs as of
/// the specification [RFC-7807](https://datatracker.ietf.org/doc/html/rfc7807).
#[derive(Debug, Serialize)]
pub struct Problem {
    #[serde(rename = "status", serialize_with = "serialize_status")]
    pub status: StatusCode,
    #[serde(rename = "type")]
    pub ty: &'static str,
    /// URI reference of the failing request, usually its path.
    #[serde(rename = "instance", skip_serializing_if = "Option::is_none")]
    pub instance: Option<String>,
    #[serde(rename = "detail")]
    pub detail: String,

    // This property is returned only if service configuration allows it
    #[serde(rename = "sensitive")]
    pub sensitive: JsonValue,
}

impl Problem {
    pub fn new(status: StatusCode, ty: &'static str) -> Self {
        Problem {
            status,
            ty,
            instance: None,
            detail: String::new(),
            sensitive: JsonValue::Null,
        }
    }

    pub fn not_found() -> Self {
        Self::new(StatusCode::NOT_FOUND, "not-found")
    }

    pub fn not_found_ty(ty: &'static str) -> Self {
        Self::new(StatusCode::NOT_FOUND, ty)
    }

    pub fn internal_error() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "server-error")
    }

    pub fn internal_error_ty(ty: &'static str) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, ty)
    }

    pub fn with_detail<S: ToString>(self, detail: S) -> Self {
        Self {
            detail: detail.to_string(),
            ..self
        }
    }

    pub fn with_instance<S: ToString>(self, instance: S) -> Self {
        Self {
            instance: Some(instance.to_string()),
            ..self
        }
    }

    pub fn with_sensitive<S>(self, sensitive: S) -> Self
    where
        S: Serialize,
    {
        let sensitive = serde_json::to_value(sensitive).unwrap_or_else(|err| {
            log::warn!("Failed to serialize problem details: {err}");
            JsonValue::Null
        });
        Self { sensitive, ..self }
    }

    pub fn with_sensitive_dbg<S>(self, sensitive: S) -> Self
    where
        S: fmt::Debug,
    {
        self.with_sensitive(format!("{sensitive:#?}"))
    }
}

/// Controls the amount of the internal details exposed in the problem responses.
#[derive(Clone, Debug)]
pub struct ProblemConfig {
    include_internal: bool,
}

impl ProblemConfig {
    pub fn new(include_internal: bool) -> Self {
        Self { include_internal }
    }

    pub fn into_layer(self) -> Extension<Self> {
        Extension(self)
    }

    pub fn transform<P>(&self, problem: P) -> Problem
    where
        P: Into<Problem>,
    {
        let problem = problem.into();
        if !self.include_internal {
            Problem {
                sensitive: JsonValue::Null,
                ..problem
            }
        } else {
            problem
        }
    }
}

pub trait IntoProblemResponse {
    fn into_problem_response(self, config: &ProblemConfig) -> ProblemResponse;
}

impl<T> IntoProblemResponse for T
where
    T: Into<Problem>,
{
    fn into_problem_response(self, config: &ProblemConfig) -> ProblemResponse {
        ProblemResponse::new(config, self)
    }
}

/// Problem response
pub struct ProblemResponse {
    pub config: ProblemConfig,
    pub problem: Problem,
}

impl ProblemResponse {
    pub fn new<P>(config: &ProblemConfig, problem: P) -> Self
    where
        P: Into<Problem>,
    {
        Self {
            config: config.clone(),
            problem: problem.into(),
        }
    }
}

impl IntoResponse for ProblemResponse {
    fn into_response(self) -> Response {
        let ProblemResponse { problem, config } = self;
        log::info!("problem response: {problem:#?}");
        let problem = config.transform(problem);
        (problem.status, Json(problem)).into_response()
    }
}
