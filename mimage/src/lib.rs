//! Image fetch seam and normalization pipeline for outbound chat requests.

mod error;
mod fetch;
mod normalize;

pub use error::{ImageError, ImageErrorKind};
pub use fetch::{ImageFetcher, ImageHandle, InMemoryImageFetcher};
pub use normalize::{JPEG_QUALITY, MAX_EDGE, NormalizedImage, normalize_bytes};
