//! Common imports for most medris embedders.

pub use crate::chat_engine;
pub use crate::{
    BoxFuture, ChatEngine, ChatEngineBuilder, ChatError, ChatErrorKind, ChatModel, ChatResult,
    GeminiConfig, GenerationOptions, ImageFetcher, ImageHandle, ModelPath, ModelReply,
    ModelRequest, NormalizedImage, ProviderError, ResultChannel, SecretString, Submission,
    SubmissionId,
};

#[cfg(feature = "provider-gemini")]
pub use crate::{GeminiHttpTransport, GeminiModel, gemini_chat_engine};
