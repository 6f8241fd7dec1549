use crate::AppState;
use crate::domain::Title;
use crate::error::WikiError;
use axum::extract::FromRequestParts;
use http::request::Parts;
use regex::Regex;

const PAGE_PATH_PATTERN: &str = r"^/(edit|save|view)/([a-zA-Z0-9]+)$";

/// Validates page paths against `/(edit|save|view)/<title>`.
pub struct PathRouter {
    valid_path: Regex,
}

impl PathRouter {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            valid_path: Regex::new(PAGE_PATH_PATTERN)?,
        })
    }

    pub fn title(&self, path: &str) -> Result<Title, WikiError> {
        let captures = self
            .valid_path
            .captures(path)
            .ok_or_else(|| WikiError::InvalidPath(path.to_string()))?;

        Title::new(&captures[2])
    }
}

/// The validated title of a page route. Rejects with a 404 before the
/// handler runs.
pub struct PageTitle(pub Title);

impl FromRequestParts<AppState> for PageTitle {
    type Rejection = WikiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        state.paths.title(parts.uri.path()).map(PageTitle)
    }
}
