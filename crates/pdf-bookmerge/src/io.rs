//! Document I/O for merging

use crate::merge::{MergeReport, merge_documents};
use crate::types::*;
use lopdf::Document;
use std::path::Path;

/// Load a single PDF document
pub async fn load_pdf(path: impl AsRef<Path>) -> Result<Document> {
    let path = path.as_ref().to_owned();
    let bytes = tokio::fs::read(&path).await?;
    let doc = tokio::task::spawn_blocking(move || Document::load_mem(&bytes)).await??;
    Ok(doc)
}

/// Save a document
pub async fn save_pdf(mut doc: Document, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref().to_owned();
    let bytes = tokio::task::spawn_blocking(move || {
        let mut writer = Vec::new();
        doc.save_to(&mut writer)?;
        Ok::<_, MergeError>(writer)
    })
    .await??;
    tokio::fs::write(&path, bytes).await?;
    Ok(())
}

/// Merge the front matter at `front_path` ahead of the body at `body_path`
/// and write the normalized result to `dest`.
///
/// Both inputs are checked before anything is read or written.
pub async fn merge_files(
    front_path: impl AsRef<Path>,
    body_path: impl AsRef<Path>,
    dest: impl AsRef<Path>,
    target: &TargetGeometry,
) -> Result<MergeReport> {
    let front_path = front_path.as_ref();
    let body_path = body_path.as_ref();
    for path in [front_path, body_path] {
        if !tokio::fs::try_exists(path).await? {
            return Err(MergeError::MissingResource(path.to_owned()));
        }
    }

    let front = load_pdf(front_path).await?;
    let body = load_pdf(body_path).await?;

    let target = *target;
    let outcome =
        tokio::task::spawn_blocking(move || merge_documents(&front, &body, &target)).await??;
    let report = outcome.report();

    save_pdf(outcome.document, dest.as_ref()).await?;
    log::info!(
        "Merged {} pages into {} ({} rescaled)",
        report.total_pages,
        dest.as_ref().display(),
        report.transformed_pages.len()
    );

    Ok(report)
}
