//! Fragment streaming contracts and in-memory stream utilities.
//!
//! ```rust
//! use mprovider::{BoxedFragmentStream, VecFragmentStream};
//!
//! let stream = VecFragmentStream::new(vec![Ok("hello".to_string())]);
//! let _boxed: BoxedFragmentStream<'static> = Box::pin(stream);
//! ```

use std::collections::VecDeque;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures_core::Stream;

use crate::ProviderError;

/// Incremental text fragments from the streaming endpoint.
///
/// Invariants for consumers:
/// - Fragments are emitted in source order.
/// - A fragment may be empty; consumers concatenate whatever arrives.
/// - Once the stream yields `None`, it must not yield additional items.
pub trait FragmentStream: Stream<Item = Result<String, ProviderError>> + Send {}

impl<T> FragmentStream for T where T: Stream<Item = Result<String, ProviderError>> + Send {}

pub type BoxedFragmentStream<'a> = Pin<Box<dyn FragmentStream + 'a>>;

#[derive(Debug)]
pub struct VecFragmentStream {
    fragments: VecDeque<Result<String, ProviderError>>,
}

impl VecFragmentStream {
    pub fn new(fragments: Vec<Result<String, ProviderError>>) -> Self {
        Self {
            fragments: fragments.into(),
        }
    }
}

impl Stream for VecFragmentStream {
    type Item = Result<String, ProviderError>;

    fn poll_next(
        mut self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
    ) -> Poll<Option<Result<String, ProviderError>>> {
        Poll::Ready(self.fragments.pop_front())
    }
}
