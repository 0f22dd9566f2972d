use reqwest::Method;

use crate::{ImageUpload, ReviewError};

/// Request body, kept in a form that can be re-encoded for every attempt.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum Payload {
    /// No body.
    #[default]
    Empty,
    /// `multipart/form-data` fields, sent in order.
    Form(Vec<FormField>),
}

/// A named multipart field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FormField {
    pub name: String,
    pub value: FormValue,
}

/// Value of a [`FormField`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FormValue {
    Text(String),
    /// Sent as a file part with its own file name and content type.
    File(ImageUpload),
}

impl Payload {
    /// Starts an empty multipart form.
    pub fn form() -> Self {
        Self::Form(Vec::new())
    }

    /// Appends a text field, turning an empty payload into a form.
    pub fn text(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.push(FormField {
            name: name.into(),
            value: FormValue::Text(value.into()),
        })
    }

    /// Appends a file field, turning an empty payload into a form.
    pub fn file(self, name: impl Into<String>, upload: ImageUpload) -> Self {
        self.push(FormField {
            name: name.into(),
            value: FormValue::File(upload),
        })
    }

    fn push(self, field: FormField) -> Self {
        let mut fields = match self {
            Self::Empty => Vec::new(),
            Self::Form(fields) => fields,
        };
        fields.push(field);
        Self::Form(fields)
    }

    pub(crate) fn to_multipart(&self) -> Result<Option<reqwest::multipart::Form>, ReviewError> {
        let fields = match self {
            Self::Empty => return Ok(None),
            Self::Form(fields) => fields,
        };

        let mut form = reqwest::multipart::Form::new();
        for field in fields {
            form = match &field.value {
                FormValue::Text(value) => form.text(field.name.clone(), value.clone()),
                FormValue::File(upload) => {
                    let part = reqwest::multipart::Part::bytes(upload.bytes.clone())
                        .file_name(upload.file_name.clone())
                        .mime_str(&upload.content_type)
                        .map_err(|err| {
                            ReviewError::InvalidArgument(format!(
                                "invalid content type '{}': {err}",
                                upload.content_type
                            ))
                        })?;
                    form.part(field.name.clone(), part)
                }
            };
        }
        Ok(Some(form))
    }
}

/// One logical HTTP call. Immutable once handed to the client.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiRequest {
    pub url: String,
    pub method: Method,
    pub body: Payload,
    /// Send session cookies along with the request. When false, native
    /// targets use a client without a cookie store and wasm sets the fetch
    /// credentials mode to `omit`.
    pub include_credentials: bool,
}

impl ApiRequest {
    /// Creates a `POST` request with credentials included.
    pub fn post(url: impl Into<String>, body: Payload) -> Self {
        Self {
            url: url.into(),
            method: Method::POST,
            body,
            include_credentials: true,
        }
    }

    /// Creates a bodiless `GET` request with credentials included.
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method: Method::GET,
            body: Payload::Empty,
            include_credentials: true,
        }
    }

    /// Drops session cookies for this request.
    pub fn without_credentials(mut self) -> Self {
        self.include_credentials = false;
        self
    }
}
