//! The static exporter: the combo chart written once to a standalone HTML file.

use crate::app::combo_page;
use crate::data::Dataset;
use crate::error::Re;
use crate::utils;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// What was written by `export`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportSummary {
    path: PathBuf,
    bytes: usize,
}

impl ExportSummary {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn bytes(&self) -> usize {
        self.bytes
    }
}

/// Renders the combo chart page and writes it to `path`, creating the parent directory if
/// needed. There is no retry; any failure is returned to the caller.
pub async fn export(dataset: &Dataset, path: &Path) -> Re<ExportSummary> {
    let document = combo_page(dataset)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        utils::make_dir(parent).await?;
    }
    debug!("Writing {} bytes to {}", document.len(), path.display());
    utils::write(path, &document).await?;
    info!("Exported the combo chart to {}", path.display());
    Ok(ExportSummary {
        path: path.to_path_buf(),
        bytes: document.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Scope;
    use crate::html;
    use crate::test::TestEnv;

    #[tokio::test]
    async fn test_export_writes_file() {
        let env = TestEnv::new().await;
        let dataset = Dataset::load(env.config(), Scope::Combo).await.unwrap();
        let path = env.root().join("out/nested/combo.html");

        let summary = export(&dataset, &path).await.unwrap();
        assert_eq!(summary.path(), path);

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written.len(), summary.bytes());
        assert!(written.starts_with("<!DOCTYPE html>"));
        assert!(written.contains(html::PLOTLY_CDN));
        assert!(written.contains("plotly_legendclick"));
        assert!(written.contains(r#""name":"Small-Scale (cumulative)""#));
    }

    #[tokio::test]
    async fn test_export_is_idempotent() {
        let env = TestEnv::new().await;
        let dataset = Dataset::load(env.config(), Scope::Combo).await.unwrap();
        let path = env.root().join("combo.html");

        export(&dataset, &path).await.unwrap();
        let first = std::fs::read(&path).unwrap();

        let reloaded = Dataset::load(env.config(), Scope::Combo).await.unwrap();
        export(&reloaded, &path).await.unwrap();
        let second = std::fs::read(&path).unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_export_unwritable_path() {
        let env = TestEnv::new().await;
        let dataset = Dataset::load(env.config(), Scope::Combo).await.unwrap();
        let blocker = env.root().join("blocker");
        std::fs::write(&blocker, "not a directory").unwrap();
        assert!(export(&dataset, &blocker.join("combo.html")).await.is_err());
    }

    #[tokio::test]
    async fn test_export_needs_states() {
        let env = TestEnv::new().await;
        let dataset = Dataset::load(env.config(), Scope::National).await.unwrap();
        let path = env.root().join("combo.html");
        assert!(export(&dataset, &path).await.is_err());
        assert!(!path.exists());
    }
}
