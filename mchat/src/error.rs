//! Chat-layer errors and the mapping into published failure reasons.

use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatErrorKind {
    /// Nothing to send: blank text and no usable images.
    Composition,
    Image,
    Provider,
    /// The service answered successfully but produced no text.
    EmptyAnswer,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatError {
    pub kind: ChatErrorKind,
    pub message: String,
}

impl ChatError {
    pub fn new(kind: ChatErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn composition(message: impl Into<String>) -> Self {
        Self::new(ChatErrorKind::Composition, message)
    }

    pub fn image(message: impl Into<String>) -> Self {
        Self::new(ChatErrorKind::Image, message)
    }

    pub fn provider(message: impl Into<String>) -> Self {
        Self::new(ChatErrorKind::Provider, message)
    }

    pub fn empty_answer() -> Self {
        Self::new(ChatErrorKind::EmptyAnswer, "service returned no text")
    }

    /// The user-visible reason published in `ChatResult::Failed`. Empty
    /// answers surface as the fixed string `"Error"`.
    pub fn failure_reason(&self) -> String {
        match self.kind {
            ChatErrorKind::EmptyAnswer => "Error".to_string(),
            _ => self.message.clone(),
        }
    }
}

impl Display for ChatError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

impl Error for ChatError {}

impl From<mprovider::ProviderError> for ChatError {
    fn from(value: mprovider::ProviderError) -> Self {
        ChatError::provider(value.to_string())
    }
}

impl From<mimage::ImageError> for ChatError {
    fn from(value: mimage::ImageError) -> Self {
        ChatError::image(value.to_string())
    }
}
