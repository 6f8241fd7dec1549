use crate::error::WikiError;
use derive_more::derive::Display;
use std::borrow::Cow;

/// A page identifier. Only ever built through [`Title::new`], so it always
/// matches `[a-zA-Z0-9]+`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Display)]
#[display("{_0}")]
pub struct Title(String);

impl Title {
    pub fn new(raw: &str) -> Result<Self, WikiError> {
        if raw.is_empty() || !raw.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(WikiError::InvalidTitle(raw.to_string()));
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Name of the file backing this page.
    pub fn file_name(&self) -> String {
        format!("{}.txt", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub title: Title,
    pub body: Vec<u8>,
}

impl Page {
    pub fn new(title: Title, body: impl Into<Vec<u8>>) -> Self {
        Self {
            title,
            body: body.into(),
        }
    }

    // what a missing page looks like on the edit form
    pub fn blank(title: Title) -> Self {
        Self::new(title, Vec::new())
    }

    pub fn body_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }
}
