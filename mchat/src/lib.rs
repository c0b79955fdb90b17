//! Submission orchestration over a remote generative model.

mod aggregate;
mod channel;
mod compose;
mod engine;
mod error;
mod script;
mod types;

pub mod prelude {
    pub use crate::{
        ChatEngine, ChatEngineBuilder, ChatError, ChatErrorKind, ChatResult, ComposedPrompt,
        ModelPath, ResultChannel, Submission,
    };
    pub use mcommon::{GenerationOptions, SubmissionId};
    pub use mimage::{ImageFetcher, ImageHandle, NormalizedImage};
    pub use mprovider::{ChatModel, ModelReply, ModelRequest, ProviderError};
}

pub use aggregate::{aggregate_reply, aggregate_stream};
pub use channel::ResultChannel;
pub use compose::{ComposedPrompt, compose};
pub use engine::{ChatEngine, ChatEngineBuilder};
pub use error::{ChatError, ChatErrorKind};
pub use mcommon::SubmissionId;
pub use script::{DEFAULT_IMAGE_INSTRUCTION, OFF_TOPIC_MESSAGE, USER_MESSAGE_SCRIPT};
pub use types::{ChatResult, ModelPath, Submission};
