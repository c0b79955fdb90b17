//! Provider-agnostic request and reply model types.
//!
//! ```rust
//! use mprovider::{ModelRequest, ProviderErrorKind};
//!
//! let ok = ModelRequest::new("gemini-1.5-flash").with_text("Describe this rash");
//! assert!(ok.validate().is_ok());
//!
//! let err = ModelRequest::new("gemini-1.5-flash")
//!     .validate()
//!     .expect_err("empty request should fail");
//! assert_eq!(err.kind, ProviderErrorKind::InvalidRequest);
//! ```

use mcommon::GenerationOptions;

use crate::ProviderError;

/// One piece of an outbound request body, in the order it is sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestPart {
    Text(String),
    InlineImage { mime: String, data: Vec<u8> },
}

impl RequestPart {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    pub fn inline_image(mime: impl Into<String>, data: Vec<u8>) -> Self {
        Self::InlineImage {
            mime: mime.into(),
            data,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModelRequest {
    pub model: String,
    pub parts: Vec<RequestPart>,
    pub options: GenerationOptions,
    pub stream: bool,
}

impl ModelRequest {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            parts: Vec::new(),
            options: GenerationOptions::default(),
            stream: false,
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.parts.push(RequestPart::text(text));
        self
    }

    pub fn with_inline_image(mut self, mime: impl Into<String>, data: Vec<u8>) -> Self {
        self.parts.push(RequestPart::inline_image(mime, data));
        self
    }

    pub fn with_options(mut self, options: GenerationOptions) -> Self {
        self.options = options;
        self
    }

    pub fn enable_streaming(mut self) -> Self {
        self.stream = true;
        self
    }

    pub fn has_images(&self) -> bool {
        self.parts
            .iter()
            .any(|part| matches!(part, RequestPart::InlineImage { .. }))
    }

    pub fn validate(&self) -> Result<(), ProviderError> {
        if self.model.trim().is_empty() {
            return Err(ProviderError::invalid_request("model must not be empty"));
        }

        if self.parts.is_empty() {
            return Err(ProviderError::invalid_request(
                "at least one request part is required",
            ));
        }

        if let Some(temperature) = self.options.temperature {
            if !(0.0..=2.0).contains(&temperature) {
                return Err(ProviderError::invalid_request(
                    "temperature must be in the inclusive range 0.0..=2.0",
                ));
            }
        }

        if let Some(top_p) = self.options.top_p {
            if !(0.0..=1.0).contains(&top_p) {
                return Err(ProviderError::invalid_request(
                    "top_p must be in the inclusive range 0.0..=1.0",
                ));
            }
        }

        Ok(())
    }
}

/// One complete reply from the non-streaming endpoint. `text` is `None`
/// when the service answered successfully but produced no text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelReply {
    pub text: Option<String>,
}

impl ModelReply {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
        }
    }

    pub fn empty() -> Self {
        Self { text: None }
    }
}
