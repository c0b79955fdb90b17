//! Image handle resolution contracts and a basic in-memory implementation.

use std::collections::HashMap;
use std::fmt::{Display, Formatter};
use std::sync::Mutex;

use mcommon::BoxFuture;

use crate::ImageError;

/// Opaque locator for an image owned by the presentation layer. The engine
/// never owns the underlying resource; it only reads bytes through an
/// [`ImageFetcher`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImageHandle(String);

impl ImageHandle {
    pub fn new(locator: impl Into<String>) -> Self {
        Self(locator.into())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for ImageHandle {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ImageHandle {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for ImageHandle {
    fn from(value: String) -> Self {
        Self(value)
    }
}

pub trait ImageFetcher: Send + Sync {
    fn fetch<'a>(&'a self, handle: &'a ImageHandle)
    -> BoxFuture<'a, Result<Vec<u8>, ImageError>>;
}

/// Fetcher over a fixed handle-to-bytes map. Intended for tests and
/// embedders whose images are already in memory.
#[derive(Debug, Default)]
pub struct InMemoryImageFetcher {
    images: Mutex<HashMap<ImageHandle, Vec<u8>>>,
}

impl InMemoryImageFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, handle: ImageHandle, bytes: Vec<u8>) {
        if let Ok(mut images) = self.images.lock() {
            images.insert(handle, bytes);
        }
    }
}

impl ImageFetcher for InMemoryImageFetcher {
    fn fetch<'a>(
        &'a self,
        handle: &'a ImageHandle,
    ) -> BoxFuture<'a, Result<Vec<u8>, ImageError>> {
        Box::pin(async move {
            let images = self
                .images
                .lock()
                .map_err(|_| ImageError::fetch("image fetcher lock poisoned"))?;

            images
                .get(handle)
                .cloned()
                .ok_or_else(|| ImageError::fetch(format!("unknown image handle: {handle}")))
        })
    }
}
