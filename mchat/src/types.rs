//! Submission, model path, and result types observed by presentation code.

use mimage::ImageHandle;

/// One user action: optional text plus an ordered list of image handles.
/// Immutable once handed to the engine; never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Submission {
    pub text: Option<String>,
    pub images: Vec<ImageHandle>,
}

impl Submission {
    pub fn new(text: Option<String>, images: Vec<ImageHandle>) -> Self {
        Self { text, images }
    }

    pub fn text_only(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            images: Vec::new(),
        }
    }

    pub fn has_blank_text(&self) -> bool {
        self.text
            .as_deref()
            .map(|text| text.trim().is_empty())
            .unwrap_or(true)
    }
}

/// Which remote capability a submission is routed to. Derived solely from
/// whether the submission carries images.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelPath {
    TextOnly,
    VisionCapable,
}

impl ModelPath {
    pub fn for_submission(submission: &Submission) -> Self {
        if submission.images.is_empty() {
            Self::TextOnly
        } else {
            Self::VisionCapable
        }
    }
}

/// The outcome of one submission. At most one non-`Pending` value is ever
/// published per submission, and the channel replaces values atomically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatResult {
    Pending,
    Completed {
        message: String,
        attached_image: Option<Vec<u8>>,
    },
    Failed {
        reason: String,
    },
}

impl ChatResult {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}
