//! File-backed context source.
//!
//! The surrounding system is expected to drop the current operational
//! state as JSON at `~/.adjutant/context.json` (override with
//! `ADJUTANT_CONTEXT_PATH`). Missing or unreadable file means the fetch
//! produced nothing usable; per-domain gaps should instead appear as
//! missing fields inside the file.

use std::path::PathBuf;

use adjutant_core::context_data::RawContextData;
use adjutant_core::error::UpstreamError;
use adjutant_core::provider::ContextSource;
use async_trait::async_trait;
use tracing::debug;

pub struct FileContextSource {
    path: PathBuf,
}

impl FileContextSource {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Default location, honoring the `ADJUTANT_CONTEXT_PATH` override.
    pub fn from_env() -> Self {
        let path = std::env::var("ADJUTANT_CONTEXT_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| adjutant_config::config_dir().join("context.json"));
        Self::new(path)
    }
}

#[async_trait]
impl ContextSource for FileContextSource {
    async fn fetch_raw_context(&self) -> Result<RawContextData, UpstreamError> {
        let content = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            UpstreamError::Unavailable(format!("{}: {e}", self.path.display()))
        })?;

        let raw: RawContextData = serde_json::from_str(&content)
            .map_err(|e| UpstreamError::Unavailable(format!("{}: {e}", self.path.display())))?;

        debug!(path = %self.path.display(), agencies = raw.agencies.len(), "raw context loaded");
        Ok(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn missing_file_is_unavailable() {
        let source = FileContextSource::new(PathBuf::from("/nonexistent/context.json"));
        assert!(source.fetch_raw_context().await.is_err());
    }

    #[tokio::test]
    async fn reads_partial_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"tasks": {{"active": 12, "overdue": 2}}}}"#).unwrap();

        let source = FileContextSource::new(file.path().to_path_buf());
        let raw = source.fetch_raw_context().await.unwrap();
        assert_eq!(raw.tasks.unwrap().active, Some(12));
        assert!(raw.agencies.is_empty());
    }
}
