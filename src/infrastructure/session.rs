use crate::domain::ports::TokenSource;
use async_trait::async_trait;
use std::path::PathBuf;
use tracing::warn;

/// Reads the session token from an environment variable at lookup time.
#[derive(Debug, Clone)]
pub struct EnvTokenSource {
    var: String,
}

impl EnvTokenSource {
    pub const DEFAULT_VAR: &'static str = "SESSION_TOKEN";

    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

impl Default for EnvTokenSource {
    fn default() -> Self {
        Self::new(Self::DEFAULT_VAR)
    }
}

#[async_trait]
impl TokenSource for EnvTokenSource {
    async fn token(&self) -> String {
        std::env::var(&self.var)
            .map(|value| value.trim().to_string())
            .unwrap_or_default()
    }
}

/// Reads the session token from the first line of a file.
///
/// A missing or unreadable file is an absent session.
#[derive(Debug, Clone)]
pub struct FileTokenSource {
    path: PathBuf,
}

impl FileTokenSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl TokenSource for FileTokenSource {
    async fn token(&self) -> String {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents.lines().next().unwrap_or("").trim().to_string(),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "cannot read session token file");
                String::new()
            }
        }
    }
}
