//! Unified facade over the medris workspace crates.
//!
//! This crate is designed to be the single dependency for most embedders.
//! It re-exports the core medris crates and provides convenience helpers
//! for assembling a chat engine from a Gemini configuration.

pub mod prelude;
pub mod runtime;

pub use mchat;
pub use mcommon;
pub use mimage;
pub use mprovider;

pub use mchat::{
    ChatEngine, ChatEngineBuilder, ChatError, ChatErrorKind, ChatResult, ComposedPrompt,
    DEFAULT_IMAGE_INSTRUCTION, ModelPath, OFF_TOPIC_MESSAGE, ResultChannel, Submission,
    USER_MESSAGE_SCRIPT, aggregate_reply, aggregate_stream, compose,
};
pub use mcommon::{BoxFuture, GenerationOptions, SubmissionId};
pub use mimage::{
    ImageError, ImageErrorKind, ImageFetcher, ImageHandle, InMemoryImageFetcher, JPEG_QUALITY,
    MAX_EDGE, NormalizedImage, normalize_bytes,
};
pub use mprovider::{
    BlockThreshold, BoxedFragmentStream, ChatModel, FragmentStream, GeminiConfig, HarmCategory,
    ModelReply, ModelRequest, ProviderError, ProviderErrorKind, ProviderFuture, RequestPart,
    SafetySetting, SecretString, VecFragmentStream,
};

#[cfg(feature = "provider-gemini")]
pub use mprovider::{GEMINI_BASE_URL, GeminiHttpTransport, GeminiModel, GeminiTransport};

pub use runtime::chat_engine;

#[cfg(feature = "provider-gemini")]
pub use runtime::gemini_chat_engine;
