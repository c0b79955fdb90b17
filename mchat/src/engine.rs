//! The orchestrator: one coordinating task per submission.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures_util::future::join_all;
use mcommon::{GenerationOptions, SubmissionId};
use mimage::{ImageFetcher, ImageHandle, NormalizedImage, normalize_bytes};
use mprovider::ChatModel;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use crate::{
    ChatError, ChatResult, ModelPath, ResultChannel, Submission, aggregate_reply,
    aggregate_stream, compose,
};

pub struct ChatEngineBuilder {
    model: Arc<dyn ChatModel>,
    fetcher: Arc<dyn ImageFetcher>,
    model_name: String,
    options: GenerationOptions,
}

impl ChatEngineBuilder {
    pub fn model_name(mut self, model_name: impl Into<String>) -> Self {
        self.model_name = model_name.into();
        self
    }

    pub fn options(mut self, options: GenerationOptions) -> Self {
        self.options = options;
        self
    }

    pub fn build(self) -> ChatEngine {
        ChatEngine {
            inner: Arc::new(EngineInner {
                model: self.model,
                fetcher: self.fetcher,
                model_name: self.model_name,
                options: self.options,
                channel: ResultChannel::new(),
                next_id: AtomicU64::new(0),
                active: Mutex::new(ActiveCycle {
                    id: 0,
                    token: CancellationToken::new(),
                }),
            }),
        }
    }
}

/// Entry point for submissions. Each `submit` publishes `Pending`
/// synchronously, supersedes any in-flight cycle, and runs the pipeline
/// (fan-out normalization, composition, remote call, aggregation) on one
/// spawned task. Exactly one terminal value is published per submission,
/// and only while that submission is still the latest.
#[derive(Clone)]
pub struct ChatEngine {
    inner: Arc<EngineInner>,
}

struct EngineInner {
    model: Arc<dyn ChatModel>,
    fetcher: Arc<dyn ImageFetcher>,
    model_name: String,
    options: GenerationOptions,
    channel: ResultChannel,
    next_id: AtomicU64,
    active: Mutex<ActiveCycle>,
}

struct ActiveCycle {
    id: u64,
    token: CancellationToken,
}

impl EngineInner {
    fn lock_active(&self) -> MutexGuard<'_, ActiveCycle> {
        self.active.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ChatEngine {
    pub fn builder(model: Arc<dyn ChatModel>, fetcher: Arc<dyn ImageFetcher>) -> ChatEngineBuilder {
        ChatEngineBuilder {
            model,
            fetcher,
            model_name: "gemini-1.5-flash".to_string(),
            options: GenerationOptions::default(),
        }
    }

    pub fn current(&self) -> Option<ChatResult> {
        self.inner.channel.current()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<ChatResult>> {
        self.inner.channel.subscribe()
    }

    /// Aborts the in-flight submission, if any. A cancelled cycle publishes
    /// nothing further.
    pub fn cancel(&self) {
        self.inner.lock_active().token.cancel();
    }

    /// Starts one orchestration cycle. Must be called within a tokio
    /// runtime. The previous cycle, if still running, is cancelled and its
    /// result discarded.
    pub fn submit(&self, submission: Submission) -> SubmissionId {
        let inner = Arc::clone(&self.inner);
        let id = SubmissionId::new(inner.next_id.fetch_add(1, Ordering::Relaxed) + 1);
        let token = CancellationToken::new();

        {
            let mut active = inner.lock_active();
            active.id = id.value();
            let superseded = std::mem::replace(&mut active.token, token.clone());
            superseded.cancel();
            inner.channel.publish(ChatResult::Pending);
        }

        tracing::info!(
            phase = "engine",
            event = "submit",
            submission = %id,
            images = submission.images.len(),
            has_text = !submission.has_blank_text()
        );

        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {
                    tracing::info!(phase = "engine", event = "cancelled", submission = %id);
                }
                outcome = run_pipeline(&inner, submission) => {
                    publish_terminal(&inner, id, &token, outcome);
                }
            }
        });

        id
    }
}

fn publish_terminal(
    inner: &EngineInner,
    id: SubmissionId,
    token: &CancellationToken,
    outcome: Result<(String, Option<Vec<u8>>), ChatError>,
) {
    // Checked under the active lock: `cancel()` takes the same lock, so a
    // cancellation observed here can never race a publish.
    let active = inner.lock_active();
    if active.id != id.value() || token.is_cancelled() {
        tracing::info!(phase = "engine", event = "stale_discarded", submission = %id);
        return;
    }

    let result = match outcome {
        Ok((message, attached_image)) => {
            tracing::info!(phase = "engine", event = "completed", submission = %id);
            ChatResult::Completed {
                message,
                attached_image,
            }
        }
        Err(error) => {
            tracing::error!(
                phase = "engine",
                event = "failed",
                submission = %id,
                error_kind = ?error.kind,
                error = %error
            );
            ChatResult::Failed {
                reason: error.failure_reason(),
            }
        }
    };

    inner.channel.publish(result);
}

async fn run_pipeline(
    inner: &EngineInner,
    submission: Submission,
) -> Result<(String, Option<Vec<u8>>), ChatError> {
    let normalized = normalize_images(inner, &submission.images).await;
    let attached = normalized.first().map(|image| image.data.clone());

    let composed = compose(
        &inner.model_name,
        inner.options,
        submission.text.as_deref(),
        normalized,
    )?;

    tracing::info!(phase = "engine", event = "composed", path = ?composed.path);

    match composed.path {
        ModelPath::TextOnly => {
            let reply = inner.model.generate(composed.request).await?;
            Ok((aggregate_reply(reply)?, None))
        }
        ModelPath::VisionCapable => {
            let stream = inner.model.generate_stream(composed.request).await?;
            Ok((aggregate_stream(stream).await?, attached))
        }
    }
}

/// Fan-out/fan-in normalization. Images run concurrently; the surviving
/// set preserves submission order. A failed image is dropped, not fatal.
async fn normalize_images(inner: &EngineInner, handles: &[ImageHandle]) -> Vec<NormalizedImage> {
    let tasks = handles.iter().map(|handle| async move {
        let bytes = inner.fetcher.fetch(handle).await?;
        normalize_bytes(&bytes)
    });

    let mut normalized = Vec::with_capacity(handles.len());
    for (handle, outcome) in handles.iter().zip(join_all(tasks).await) {
        match outcome {
            Ok(image) => normalized.push(image),
            Err(error) => {
                tracing::warn!(
                    phase = "engine",
                    event = "image_dropped",
                    handle = %handle,
                    error = %error
                );
            }
        }
    }

    normalized
}
