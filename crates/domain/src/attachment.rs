use crate::error::{DomainError, Result};
use serde::{Deserialize, Serialize};

/// Purpose of an uploaded file; decides the media subdirectory and accepted extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttachmentKind {
    /// Individual asset 3D model
    AssetModel,
    /// 3D overview of a whole farm site
    FarmSiteModel,
    /// 2D farm layout diagram
    FarmLayout,
    /// Generic model of an asset type
    ModelCategory,
}

impl AttachmentKind {
    /// Subdirectory under the media root
    pub fn directory(&self) -> &'static str {
        match self {
            Self::AssetModel => "asset_models",
            Self::FarmSiteModel => "farm_site_models",
            Self::FarmLayout => "farm_layouts",
            Self::ModelCategory => "model_categories",
        }
    }

    /// Subdirectory under `static/uploads` checked when nothing was stored
    pub fn fallback_directory(&self) -> Option<&'static str> {
        match self {
            Self::AssetModel => None,
            Self::FarmSiteModel => Some("farm_models"),
            Self::FarmLayout => Some("farm_layouts"),
            Self::ModelCategory => Some("model_categories"),
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::FarmLayout => "pdf",
            _ => "glb",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            Self::FarmLayout => "application/pdf",
            _ => "model/gltf-binary",
        }
    }

    /// Reject uploads whose name does not end with the expected extension.
    pub fn validate_file_name(&self, file_name: &str) -> Result<()> {
        let expected = self.extension();
        let matches = std::path::Path::new(file_name)
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case(expected));

        if matches {
            Ok(())
        } else {
            Err(DomainError::InvalidAttachment(format!(
                "Invalid file type. Only .{expected} files are allowed"
            )))
        }
    }

    /// Media-relative path under which an upload for `owner_id` is stored.
    pub fn storage_path(&self, owner_id: &str) -> String {
        format!("{}/{}.{}", self.directory(), owner_id, self.extension())
    }
}

/// True for a single plain path segment (no separators, no parent references).
pub fn is_safe_segment(segment: &str) -> bool {
    !segment.is_empty()
        && segment != "."
        && segment != ".."
        && !segment.contains(['/', '\\', '\0'])
}
