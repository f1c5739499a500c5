use std::fmt;

/// Public ClickUp REST API, version 2.
pub const DEFAULT_BASE_URL: &str = "https://api.clickup.com/api/v2";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClickUpURL(String);

impl AsRef<str> for ClickUpURL {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ClickUpURL {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Default for ClickUpURL {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl ClickUpURL {
    pub fn new(base: impl Into<String>) -> Self {
        let base = base.into();
        Self(base.trim_end_matches('/').to_string())
    }

    /// Append the given path to the URL.
    pub fn append_path(&self, path: &str) -> Self {
        let trimmed_url = self.0.trim_end_matches('/');
        let trimmed_path = path.trim_start_matches('/');
        Self(format!("{}/{}", trimmed_url, trimmed_path))
    }

    /// Append a single percent-encoded path segment, e.g. a task or team id.
    pub fn append_segment(&self, segment: &str) -> Self {
        Self(format!(
            "{}/{}",
            self.0.trim_end_matches('/'),
            urlencoding::encode(segment)
        ))
    }
}
