//! Runtime wiring helpers for engine assembly.

use std::sync::Arc;

use crate::{ChatEngine, ChatModel, ImageFetcher};

#[cfg(feature = "provider-gemini")]
use crate::{GeminiConfig, GeminiModel, GeminiTransport};

pub fn chat_engine(model: Arc<dyn ChatModel>, fetcher: Arc<dyn ImageFetcher>) -> ChatEngine {
    ChatEngine::builder(model, fetcher).build()
}

/// Builds an engine talking to the Gemini HTTP API with the model name,
/// safety settings, and generation options from `config`.
#[cfg(feature = "provider-gemini")]
pub fn gemini_chat_engine(config: GeminiConfig, fetcher: Arc<dyn ImageFetcher>) -> ChatEngine {
    let model_name = config.model.clone();
    let options = config.generation;

    let transport: Arc<dyn GeminiTransport> =
        Arc::new(GeminiModel::default_http_transport(reqwest::Client::new()));
    let model = Arc::new(GeminiModel::new(config, transport));

    ChatEngine::builder(model, fetcher)
        .model_name(model_name)
        .options(options)
        .build()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::{
        BoxedFragmentStream, ChatModel, ChatResult, InMemoryImageFetcher, ModelReply,
        ModelRequest, ProviderError, ProviderFuture, Submission,
    };

    use super::chat_engine;

    #[derive(Debug)]
    struct FakeModel;

    impl ChatModel for FakeModel {
        fn generate<'a>(
            &'a self,
            request: ModelRequest,
        ) -> ProviderFuture<'a, Result<ModelReply, ProviderError>> {
            Box::pin(async move {
                request.validate()?;
                Ok(ModelReply::new("done"))
            })
        }

        fn generate_stream<'a>(
            &'a self,
            request: ModelRequest,
        ) -> ProviderFuture<'a, Result<BoxedFragmentStream<'a>, ProviderError>> {
            Box::pin(async move {
                request.validate()?;
                let stream = crate::VecFragmentStream::new(vec![Ok("done".to_string())]);
                Ok(Box::pin(stream) as BoxedFragmentStream<'a>)
            })
        }
    }

    #[tokio::test]
    async fn chat_engine_wires_model_and_fetcher() {
        let engine = chat_engine(Arc::new(FakeModel), Arc::new(InMemoryImageFetcher::new()));

        engine.submit(Submission::text_only("hello"));

        let mut receiver = engine.subscribe();
        loop {
            let value = receiver.borrow_and_update().clone();
            if let Some(result) = value {
                if result.is_terminal() {
                    assert_eq!(
                        result,
                        ChatResult::Completed {
                            message: "done".to_string(),
                            attached_image: None,
                        }
                    );
                    break;
                }
            }
            receiver.changed().await.expect("engine should stay alive");
        }
    }
}
