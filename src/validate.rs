//! Client-side input checks run before any request is sent.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::ImageUpload;

/// Largest accepted upload, in bytes (5 MiB).
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

/// Longest accepted context, in characters.
pub const MAX_CONTEXT_CHARS: usize = 500;

/// MIME types the service accepts for uploads.
pub const ACCEPTED_IMAGE_TYPES: [&str; 3] = ["image/jpeg", "image/jpg", "image/png"];

static EMAIL_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

/// Rejected local input.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Please select an image file.")]
    MissingFile,
    #[error("File size must be less than 5MB.")]
    FileTooLarge { size: usize },
    #[error("Please upload a JPEG or PNG image.")]
    UnsupportedType(String),
    #[error("Context must be less than 500 characters.")]
    ContextTooLong { chars: usize },
    #[error("Please enter your email address.")]
    MissingEmail,
    #[error("Please enter a valid email address.")]
    InvalidEmail(String),
}

/// Checks size and MIME type of an upload.
pub fn validate_image(upload: &ImageUpload) -> Result<(), ValidationError> {
    if upload.bytes.is_empty() {
        return Err(ValidationError::MissingFile);
    }
    if upload.bytes.len() > MAX_IMAGE_BYTES {
        return Err(ValidationError::FileTooLarge {
            size: upload.bytes.len(),
        });
    }
    let content_type = upload.content_type.trim().to_ascii_lowercase();
    if !ACCEPTED_IMAGE_TYPES.contains(&content_type.as_str()) {
        return Err(ValidationError::UnsupportedType(upload.content_type.clone()));
    }
    Ok(())
}

/// Trims `context` and rejects it when it exceeds [`MAX_CONTEXT_CHARS`].
pub fn validate_context(context: &str) -> Result<String, ValidationError> {
    let trimmed = context.trim();
    let chars = trimmed.chars().count();
    if chars > MAX_CONTEXT_CHARS {
        return Err(ValidationError::ContextTooLong { chars });
    }
    Ok(trimmed.to_owned())
}

/// Clips `context` to [`MAX_CONTEXT_CHARS`]; the flag reports whether it was cut.
pub fn truncate_context(context: &str) -> (String, bool) {
    match context.char_indices().nth(MAX_CONTEXT_CHARS) {
        Some((byte_index, _)) => (context[..byte_index].to_owned(), true),
        None => (context.to_owned(), false),
    }
}

/// Trims `email` and checks it against a `local@domain.tld` shape.
pub fn validate_email(email: &str) -> Result<String, ValidationError> {
    let trimmed = email.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::MissingEmail);
    }
    if !EMAIL_REGEX.is_match(trimmed) {
        return Err(ValidationError::InvalidEmail(trimmed.to_owned()));
    }
    Ok(trimmed.to_owned())
}
