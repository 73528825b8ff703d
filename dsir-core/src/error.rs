use reqwest::StatusCode;
use thiserror::Error;

use crate::model::{ErrorPayload, FailureReason};

/// Why a request to the backend did not produce a usable payload.
#[derive(Error, Debug)]
pub enum LookupError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    /// Non-2xx answer. `payload` is `None` when the body was not a JSON error object.
    #[error("server answered {status}")]
    Status { status: StatusCode, payload: Option<ErrorPayload> },
    #[error("could not decode response body: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("invalid endpoint url: {0}")]
    Url(#[from] url::ParseError),
}

impl LookupError {
    /// The server's reason string, classified.
    pub fn reason(&self) -> FailureReason {
        match self {
            LookupError::Status { payload: Some(payload), .. } => payload.reason(),
            _ => FailureReason::Unrecognised,
        }
    }
}

#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("template '{0}' is not registered")]
    Missing(String),
    #[error("failed to register template '{name}': {source}")]
    Register {
        name: String,
        #[source]
        source: Box<handlebars::TemplateError>,
    },
    #[error("failed to render template: {0}")]
    Render(#[from] handlebars::RenderError),
    #[error("failed to read templates: {0}")]
    Io(#[from] std::io::Error),
}
