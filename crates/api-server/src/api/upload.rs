use crate::error::{ApiError, ApiResult};
use axum::extract::Multipart;
use std::collections::HashMap;

pub struct UploadedFile {
    pub file_name: String,
    pub data: Vec<u8>,
}

/// A multipart form: the `file` part plus any plain text fields.
#[derive(Default)]
pub struct UploadForm {
    pub file: Option<UploadedFile>,
    pub fields: HashMap<String, String>,
}

impl UploadForm {
    pub async fn read(mut multipart: Multipart) -> ApiResult<Self> {
        let mut form = Self::default();
        while let Some(field) = multipart.next_field().await.map_err(ApiError::bad_request)? {
            let name = field.name().unwrap_or_default().to_string();
            if name == "file" {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let data = field.bytes().await.map_err(ApiError::bad_request)?;
                form.file = Some(UploadedFile {
                    file_name,
                    data: data.to_vec(),
                });
            } else {
                let value = field.text().await.map_err(ApiError::bad_request)?;
                form.fields.insert(name, value);
            }
        }
        Ok(form)
    }

    pub fn take_file(&mut self) -> ApiResult<UploadedFile> {
        match self.file.take() {
            Some(file) if !file.data.is_empty() || !file.file_name.is_empty() => Ok(file),
            _ => Err(ApiError::bad_request("No file provided")),
        }
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    /// Checkbox-style flag: `true`, `on`, `1` and `yes` count as set.
    pub fn flag(&self, name: &str) -> bool {
        self.text(name).is_some_and(|v| {
            matches!(v.to_ascii_lowercase().as_str(), "true" | "on" | "1" | "yes")
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_and_text() {
        let mut form = UploadForm::default();
        form.fields.insert("is_default".into(), "on".into());
        form.fields.insert("update_existing".into(), "false".into());
        form.fields.insert("name".into(), "  ".into());

        assert!(form.flag("is_default"));
        assert!(!form.flag("update_existing"));
        assert!(!form.flag("clear_existing"));
        assert_eq!(form.text("name"), None);
        assert!(form.take_file().is_err());
    }
}
