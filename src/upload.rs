/// Image file to be reviewed.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageUpload {
    /// File name sent in the multipart `image` part.
    pub file_name: String,
    /// Declared MIME type, e.g. `image/png`.
    pub content_type: String,
    /// Raw file contents.
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for ImageUpload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageUpload")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl ImageUpload {
    /// Builds an upload with an explicit MIME type.
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes: bytes.into(),
        }
    }

    /// Builds an upload whose MIME type is inferred from `file_name`.
    pub fn from_bytes(file_name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        let file_name = file_name.into();
        let content_type = mime_from_file_name(&file_name).to_owned();
        Self::new(file_name, content_type, bytes)
    }

    /// Reads an upload from disk.
    ///
    /// **Not available on `wasm32` targets**; browsers hand over file bytes
    /// directly, use [`ImageUpload::from_bytes`] there.
    #[cfg(not(target_arch = "wasm32"))]
    pub async fn from_path(path: impl AsRef<std::path::Path>) -> crate::Result<Self> {
        let path = path.as_ref();
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| {
                crate::ReviewError::InvalidArgument(format!(
                    "path has no file name: {}",
                    path.display()
                ))
            })?
            .to_owned();
        let bytes = tokio::fs::read(path).await.map_err(|err| {
            crate::ReviewError::InvalidArgument(format!(
                "could not read {}: {err}",
                path.display()
            ))
        })?;
        Ok(Self::from_bytes(file_name, bytes))
    }
}

pub(crate) fn mime_from_file_name(file_name: &str) -> &'static str {
    let extension = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase());
    match extension.as_deref() {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        _ => "application/octet-stream",
    }
}
