//! Multipart form reading
//!
//! Text parts become fields, parts with a file name become uploads. Files
//! are only accepted under the expected field name.

use std::collections::HashMap;

use axum::extract::Multipart;
use platform::media::MediaUpload;

use crate::error::{ClubError, ClubResult};

/// Parsed multipart body
#[derive(Debug, Default)]
pub struct FormData {
    fields: HashMap<String, String>,
    files: Vec<MediaUpload>,
}

impl FormData {
    /// Read every part; files under any name other than `file_field` are rejected
    pub async fn read(mut multipart: Multipart, file_field: &str) -> ClubResult<Self> {
        let mut form = FormData::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| ClubError::validation(format!("Malformed multipart body: {}", e)))?
        {
            let name = field.name().unwrap_or("").to_string();

            match field.file_name().map(|s| s.to_string()) {
                Some(file_name) => {
                    if name != file_field {
                        return Err(ClubError::validation(format!(
                            "Unexpected file field {:?}, expected {:?}",
                            name, file_field
                        )));
                    }
                    let content_type = field.content_type().map(|s| s.to_string());
                    let bytes = field.bytes().await.map_err(|e| {
                        ClubError::validation(format!("Failed to read upload: {}", e))
                    })?;
                    form.files.push(MediaUpload {
                        file_name,
                        content_type,
                        bytes: bytes.to_vec(),
                    });
                }
                None => {
                    let value = field.text().await.map_err(|e| {
                        ClubError::validation(format!("Failed to read field {:?}: {}", name, e))
                    })?;
                    form.fields.insert(name, value);
                }
            }
        }

        Ok(form)
    }

    /// Field value, or empty when absent
    pub fn text(&self, name: &str) -> String {
        self.fields.get(name).cloned().unwrap_or_default()
    }

    /// Field value; blank counts as absent
    pub fn optional(&self, name: &str) -> Option<String> {
        self.fields
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    }

    /// Boolean field (`true`/`false`, `1`/`0`, `yes`/`no`)
    pub fn flag(&self, name: &str) -> ClubResult<Option<bool>> {
        self.optional(name)
            .map(|raw| {
                platform::config::parse_bool(&raw)
                    .ok_or_else(|| ClubError::validation(format!("{} must be true or false", name)))
            })
            .transpose()
    }

    pub fn into_files(self) -> Vec<MediaUpload> {
        self.files
    }

    /// The single file, if any; more than one is rejected
    pub fn into_single_file(self) -> ClubResult<Option<MediaUpload>> {
        let mut files = self.files;
        if files.len() > 1 {
            return Err(ClubError::validation("Only one image is allowed"));
        }
        Ok(files.pop())
    }
}
