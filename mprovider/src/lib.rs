//! Remote generative-model contracts and the Gemini HTTP adapter.

mod config;
mod error;
mod model;
mod provider;
mod stream;

pub mod adapters;

pub use config::{BlockThreshold, GeminiConfig, HarmCategory, SafetySetting, SecretString};
pub use error::{ProviderError, ProviderErrorKind};
pub use model::{ModelReply, ModelRequest, RequestPart};
pub use provider::{ChatModel, ProviderFuture};
pub use stream::{BoxedFragmentStream, FragmentStream, VecFragmentStream};

#[cfg(feature = "provider-gemini")]
pub use adapters::gemini::{GEMINI_BASE_URL, GeminiHttpTransport, GeminiModel, GeminiTransport};
