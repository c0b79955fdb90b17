//! Image-layer errors and classification.

use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageErrorKind {
    Fetch,
    Undecodable,
    Encode,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageError {
    pub kind: ImageErrorKind,
    pub message: String,
}

impl ImageError {
    pub fn new(kind: ImageErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn fetch(message: impl Into<String>) -> Self {
        Self::new(ImageErrorKind::Fetch, message)
    }

    pub fn undecodable(message: impl Into<String>) -> Self {
        Self::new(ImageErrorKind::Undecodable, message)
    }

    pub fn encode(message: impl Into<String>) -> Self {
        Self::new(ImageErrorKind::Encode, message)
    }
}

impl Display for ImageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

impl Error for ImageError {}
