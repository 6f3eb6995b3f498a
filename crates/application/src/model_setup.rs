//! Installs the stock asset-type 3D models shipped with a deployment.

use anyhow::{Context, Result, anyhow};
use domain::AttachmentKind;
use infrastructure::MediaStorage;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Default, Serialize)]
pub struct ModelSetupReport {
    /// File names found in the source directory
    pub files: Vec<String>,
    /// Files already present in the media directory and left untouched
    pub kept: Vec<String>,
    pub media_target: PathBuf,
    pub static_target: PathBuf,
}

fn is_glb(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("glb"))
}

/// Copy every `.glb` in `source_dir` into the media and static model folders.
///
/// Media copies are never overwritten; static copies always are.
pub async fn setup_model_files(source_dir: &Path, storage: &MediaStorage) -> Result<ModelSetupReport> {
    if !source_dir.is_dir() {
        return Err(anyhow!("Source directory not found: {}", source_dir.display()));
    }

    let directory = AttachmentKind::ModelCategory.directory();
    let mut report = ModelSetupReport {
        media_target: storage.media_root().join(directory),
        static_target: storage.static_root().join("uploads").join(directory),
        ..Default::default()
    };
    for target in [&report.media_target, &report.static_target] {
        tokio::fs::create_dir_all(target)
            .await
            .with_context(|| format!("Failed to create {}", target.display()))?;
    }

    let mut entries = tokio::fs::read_dir(source_dir).await?;
    let mut sources = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.is_file() && is_glb(&path) {
            sources.push(path);
        }
    }
    sources.sort();

    for source in sources {
        let Some(name) = source.file_name().map(|n| n.to_string_lossy().into_owned()) else {
            continue;
        };

        let media_dest = report.media_target.join(&name);
        if media_dest.exists() {
            debug!(file = %name, "Model already in media, kept");
            report.kept.push(name.clone());
        } else {
            tokio::fs::copy(&source, &media_dest)
                .await
                .with_context(|| format!("Failed to copy {}", source.display()))?;
        }

        let static_dest = report.static_target.join(&name);
        if static_dest != source {
            tokio::fs::copy(&source, &static_dest)
                .await
                .with_context(|| format!("Failed to copy {}", source.display()))?;
        }

        info!("📋 Installed model {}", name);
        report.files.push(name);
    }

    if report.files.is_empty() {
        warn!("No .glb files found in {}", source_dir.display());
    }
    Ok(report)
}
