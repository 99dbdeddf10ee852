use crate::commands::Out;
use crate::data::{Dataset, Scope};
use crate::error::{ErrorType, IntoResult};
use crate::export::ExportSummary;
use crate::{Config, Result};

/// Loads both tables, renders the combo chart and writes it to `config.export_path()`.
///
/// # Errors
/// - `ErrorType::Load` if either CSV is missing or malformed.
/// - `ErrorType::Export` if the file cannot be written.
pub async fn export(config: Config) -> Result<Out<ExportSummary>> {
    let dataset = Dataset::load(&config, Scope::Combo).await?;
    let summary = crate::export::export(&dataset, config.export_path())
        .await
        .pub_result(ErrorType::Export)?;
    Ok(Out::new(
        format!("Wrote {}", summary.path().display()),
        summary,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::TestEnv;

    #[tokio::test]
    async fn test_export_command() {
        let env = TestEnv::new().await;
        let path = env.root().join("output/combo.html");
        let config = env.config().clone().with_export_path(&path);
        let out = export(config).await.unwrap();
        assert_eq!(out.structure().unwrap().path(), path);
        assert!(out.message().starts_with("Wrote "));
        assert!(path.is_file());
    }

    #[tokio::test]
    async fn test_export_command_missing_states() {
        let env = TestEnv::new().await;
        let config = env
            .config()
            .clone()
            .with_state_csv(env.root().join("missing.csv"))
            .with_export_path(env.root().join("combo.html"));
        let err = export(config).await.unwrap_err();
        assert_eq!(err.error_type(), ErrorType::Load);
    }

    #[tokio::test]
    async fn test_export_command_unwritable() {
        let env = TestEnv::new().await;
        let blocker = env.root().join("blocker");
        std::fs::write(&blocker, "").unwrap();
        let config = env
            .config()
            .clone()
            .with_export_path(blocker.join("combo.html"));
        let err = export(config).await.unwrap_err();
        assert_eq!(err.error_type(), ErrorType::Export);
    }
}
