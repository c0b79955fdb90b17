//! Object-safe contract for the remote generative-model service.

use std::future::Future;
use std::pin::Pin;

use crate::{BoxedFragmentStream, ModelReply, ModelRequest, ProviderError};

pub type ProviderFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// The two capability endpoints of the remote service: request/response
/// text chat and streaming vision chat. Safety and generation configuration
/// are supplied at client construction, never per call.
pub trait ChatModel: Send + Sync {
    fn generate<'a>(
        &'a self,
        request: ModelRequest,
    ) -> ProviderFuture<'a, Result<ModelReply, ProviderError>>;

    fn generate_stream<'a>(
        &'a self,
        request: ModelRequest,
    ) -> ProviderFuture<'a, Result<BoxedFragmentStream<'a>, ProviderError>>;
}
