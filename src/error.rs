use crate::domain::Title;
use axum::response::{IntoResponse, Response};
use http::StatusCode;
use std::path::PathBuf;
use thiserror::Error;

const NOT_FOUND_BODY: &str = "404 page not found";

#[derive(Debug, Error)]
pub enum WikiError {
    #[error("invalid page path {0}")]
    InvalidPath(String),

    #[error("invalid page title {0:?}")]
    InvalidTitle(String),

    #[error("failed to read page {title}")]
    Load {
        title: Title,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to save page {title}")]
    Save {
        title: Title,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to render template {name}")]
    Render {
        name: String,
        #[source]
        source: tera::Error,
    },

    #[error("failed to read template directory {}", .dir.display())]
    TemplateDir {
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse templates in {}", .dir.display())]
    TemplateParse {
        dir: PathBuf,
        #[source]
        source: tera::Error,
    },
}

impl WikiError {
    pub fn status(&self) -> StatusCode {
        match self {
            WikiError::InvalidPath(_) | WikiError::InvalidTitle(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Turns the error into a response. Server errors are always logged with
    /// their full source chain; the chain only reaches the client when
    /// `expose` is set.
    pub fn into_response_for(self, expose: bool) -> Response {
        let status = self.status();
        if status == StatusCode::NOT_FOUND {
            tracing::debug!(error = %self, "rejected request");
            return (status, NOT_FOUND_BODY).into_response();
        }

        let detail = format!("{:#}", anyhow::Error::new(self));
        tracing::error!(error = %detail, "request failed");

        let body = if expose {
            detail
        } else {
            status
                .canonical_reason()
                .unwrap_or("Internal Server Error")
                .to_string()
        };
        (status, body).into_response()
    }
}

impl IntoResponse for WikiError {
    fn into_response(self) -> Response {
        self.into_response_for(false)
    }
}
