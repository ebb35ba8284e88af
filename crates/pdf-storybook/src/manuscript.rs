use crate::types::{ComposeError, Manuscript, Result};
use std::path::Path;

/// Read and parse a manuscript JSON file.
pub async fn load_manuscript(path: impl AsRef<Path>) -> Result<Manuscript> {
    let path = path.as_ref().to_owned();

    let contents = tokio::fs::read_to_string(&path).await?;

    let manuscript =
        tokio::task::spawn_blocking(move || parse_manuscript(&contents)).await??;

    log::info!(
        "Loaded manuscript {} ({} pages)",
        path.display(),
        manuscript.pages.len()
    );

    Ok(manuscript)
}

/// Parse a manuscript from JSON text.
///
/// Syntax errors keep their line and column. A manuscript without any pages
/// is rejected since there would be nothing to lay out.
pub fn parse_manuscript(json: &str) -> Result<Manuscript> {
    let manuscript: Manuscript = serde_json::from_str(json)?;
    if manuscript.pages.is_empty() {
        return Err(ComposeError::EmptyManuscript);
    }
    Ok(manuscript)
}
