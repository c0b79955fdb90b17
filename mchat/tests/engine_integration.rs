use std::sync::{Arc, Mutex};
use std::time::Duration;

use image::{Rgb, RgbImage};
use mchat::DEFAULT_IMAGE_INSTRUCTION;
use mchat::prelude::*;
use mimage::InMemoryImageFetcher;
use mprovider::{BoxedFragmentStream, ProviderFuture, RequestPart, VecFragmentStream};

struct ScriptedModel {
    requests: Mutex<Vec<ModelRequest>>,
    keyed: Vec<(String, Behavior)>,
    fallback: Behavior,
}

#[derive(Clone)]
enum Behavior {
    Reply(String),
    Fragments(Vec<String>),
    Fail(String),
    Hang,
}

impl ScriptedModel {
    fn new(fallback: Behavior) -> Self {
        Self {
            requests: Mutex::new(Vec::new()),
            keyed: Vec::new(),
            fallback,
        }
    }

    fn on(mut self, key: &str, behavior: Behavior) -> Self {
        self.keyed.push((key.to_string(), behavior));
        self
    }

    fn behavior_for(&self, request: &ModelRequest) -> Behavior {
        for (key, behavior) in &self.keyed {
            let matched = request
                .parts
                .iter()
                .any(|part| matches!(part, RequestPart::Text(text) if text.contains(key)));
            if matched {
                return behavior.clone();
            }
        }
        self.fallback.clone()
    }

    fn recorded_requests(&self) -> Vec<ModelRequest> {
        self.requests.lock().expect("requests lock").clone()
    }
}

impl ChatModel for ScriptedModel {
    fn generate<'a>(
        &'a self,
        request: ModelRequest,
    ) -> ProviderFuture<'a, Result<ModelReply, ProviderError>> {
        Box::pin(async move {
            let behavior = self.behavior_for(&request);
            self.requests.lock().expect("requests lock").push(request);
            match behavior {
                Behavior::Reply(text) => Ok(ModelReply::new(text)),
                Behavior::Fragments(_) => Ok(ModelReply::empty()),
                Behavior::Fail(message) => Err(ProviderError::transport(message)),
                Behavior::Hang => {
                    futures_util::future::pending::<()>().await;
                    unreachable!()
                }
            }
        })
    }

    fn generate_stream<'a>(
        &'a self,
        request: ModelRequest,
    ) -> ProviderFuture<'a, Result<BoxedFragmentStream<'a>, ProviderError>> {
        Box::pin(async move {
            let behavior = self.behavior_for(&request);
            self.requests.lock().expect("requests lock").push(request);
            match behavior {
                Behavior::Fragments(fragments) => {
                    let items = fragments.into_iter().map(Ok).collect();
                    Ok(Box::pin(VecFragmentStream::new(items)) as BoxedFragmentStream<'a>)
                }
                Behavior::Reply(text) => {
                    let items = vec![Ok(text)];
                    Ok(Box::pin(VecFragmentStream::new(items)) as BoxedFragmentStream<'a>)
                }
                Behavior::Fail(message) => Err(ProviderError::transport(message)),
                Behavior::Hang => {
                    futures_util::future::pending::<()>().await;
                    unreachable!()
                }
            }
        })
    }
}

fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let mut pixels = RgbImage::new(width, height);
    for (x, y, pixel) in pixels.enumerate_pixels_mut() {
        *pixel = Rgb([(x % 256) as u8, (y % 256) as u8, 64]);
    }

    let mut bytes = Vec::new();
    pixels
        .write_to(
            &mut std::io::Cursor::new(&mut bytes),
            image::ImageFormat::Png,
        )
        .expect("png encode should work");
    bytes
}

fn fetcher_with(images: &[(&str, Vec<u8>)]) -> Arc<InMemoryImageFetcher> {
    let fetcher = Arc::new(InMemoryImageFetcher::new());
    for (locator, bytes) in images {
        fetcher.insert(ImageHandle::from(*locator), bytes.clone());
    }
    fetcher
}

async fn wait_for_terminal(engine: &ChatEngine) -> ChatResult {
    let mut receiver = engine.subscribe();
    loop {
        let value = receiver.borrow_and_update().clone();
        if let Some(result) = value {
            if result.is_terminal() {
                return result;
            }
        }
        receiver.changed().await.expect("engine should stay alive");
    }
}

#[tokio::test]
async fn vision_submission_streams_fragments_into_one_message() {
    let model = Arc::new(ScriptedModel::new(Behavior::Fragments(vec![
        "Hel".to_string(),
        "lo".to_string(),
        " world".to_string(),
    ])));
    let fetcher = fetcher_with(&[("content://photo/1", png_bytes(64, 64))]);
    let engine = ChatEngine::builder(model.clone(), fetcher).build();

    engine.submit(Submission::new(
        Some("what is this?".to_string()),
        vec![ImageHandle::from("content://photo/1")],
    ));
    let result = wait_for_terminal(&engine).await;

    match result {
        ChatResult::Completed {
            message,
            attached_image,
        } => {
            assert_eq!(message, "Hello world");
            assert!(attached_image.is_some());
        }
        other => panic!("unexpected result: {other:?}"),
    }

    let requests = model.recorded_requests();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].stream);
}

#[tokio::test]
async fn attachments_preserve_submission_order() {
    let model = Arc::new(ScriptedModel::new(Behavior::Fragments(vec!["ok".to_string()])));
    let fetcher = fetcher_with(&[
        ("content://photo/a", png_bytes(10, 20)),
        ("content://photo/b", png_bytes(20, 10)),
        ("content://photo/c", png_bytes(30, 30)),
    ]);
    let engine = ChatEngine::builder(model.clone(), fetcher).build();

    engine.submit(Submission::new(
        Some("compare these".to_string()),
        vec![
            ImageHandle::from("content://photo/a"),
            ImageHandle::from("content://photo/b"),
            ImageHandle::from("content://photo/c"),
        ],
    ));
    wait_for_terminal(&engine).await;

    let requests = model.recorded_requests();
    let images: Vec<&RequestPart> = requests[0]
        .parts
        .iter()
        .filter(|part| matches!(part, RequestPart::InlineImage { .. }))
        .collect();
    assert_eq!(images.len(), 3);

    // Dimensions survive the JPEG round trip, so decode to check order.
    let decoded: Vec<(u32, u32)> = images
        .iter()
        .map(|part| match part {
            RequestPart::InlineImage { data, .. } => {
                let img = image::load_from_memory(data).expect("jpeg should decode");
                (img.width(), img.height())
            }
            RequestPart::Text(_) => unreachable!(),
        })
        .collect();
    assert_eq!(decoded, vec![(10, 20), (20, 10), (30, 30)]);
}

#[tokio::test]
async fn unreadable_images_degrade_silently() {
    let model = Arc::new(ScriptedModel::new(Behavior::Fragments(vec!["described".to_string()])));
    let fetcher = fetcher_with(&[
        ("content://photo/good", png_bytes(16, 16)),
        ("content://photo/bad", b"not an image".to_vec()),
    ]);
    let engine = ChatEngine::builder(model.clone(), fetcher).build();

    engine.submit(Submission::new(
        Some("describe".to_string()),
        vec![
            ImageHandle::from("content://photo/good"),
            ImageHandle::from("content://photo/bad"),
        ],
    ));
    let result = wait_for_terminal(&engine).await;

    assert!(matches!(result, ChatResult::Completed { .. }));
    let requests = model.recorded_requests();
    let image_count = requests[0]
        .parts
        .iter()
        .filter(|part| matches!(part, RequestPart::InlineImage { .. }))
        .count();
    assert_eq!(image_count, 1);
}

#[tokio::test]
async fn all_images_failing_with_blank_text_fails_without_a_call() {
    let model = Arc::new(ScriptedModel::new(Behavior::Reply("unused".to_string())));
    let fetcher = fetcher_with(&[("content://photo/bad", b"garbage".to_vec())]);
    let engine = ChatEngine::builder(model.clone(), fetcher).build();

    engine.submit(Submission::new(
        None,
        vec![ImageHandle::from("content://photo/bad")],
    ));
    let result = wait_for_terminal(&engine).await;

    assert!(matches!(result, ChatResult::Failed { .. }));
    assert!(model.recorded_requests().is_empty());
}

#[tokio::test]
async fn blank_text_vision_requests_carry_the_default_instruction() {
    let model = Arc::new(ScriptedModel::new(Behavior::Fragments(vec![
        "a chest x-ray".to_string(),
    ])));
    let fetcher = fetcher_with(&[("content://photo/xray", png_bytes(2000, 1000))]);
    let engine = ChatEngine::builder(model.clone(), fetcher).build();

    engine.submit(Submission::new(
        None,
        vec![ImageHandle::from("content://photo/xray")],
    ));
    wait_for_terminal(&engine).await;

    let requests = model.recorded_requests();
    assert_eq!(
        requests[0].parts.last(),
        Some(&RequestPart::text(DEFAULT_IMAGE_INSTRUCTION))
    );

    // The 2000x1000 source must arrive inside the 1024 envelope.
    let RequestPart::InlineImage { data, .. } = &requests[0].parts[1] else {
        panic!("expected an inline image part");
    };
    let img = image::load_from_memory(data).expect("jpeg should decode");
    assert_eq!((img.width(), img.height()), (1024, 512));
}

#[tokio::test]
async fn provider_failures_publish_exactly_one_failed_result() {
    let model = Arc::new(ScriptedModel::new(Behavior::Fail("connection reset".to_string())));
    let fetcher = Arc::new(InMemoryImageFetcher::new());
    let engine = ChatEngine::builder(model, fetcher).build();

    engine.submit(Submission::text_only("hello"));
    let result = wait_for_terminal(&engine).await;

    match result {
        ChatResult::Failed { reason } => assert!(reason.contains("connection reset")),
        other => panic!("unexpected result: {other:?}"),
    }
}

#[tokio::test]
async fn cancellation_prevents_any_terminal_publish() {
    let model = Arc::new(ScriptedModel::new(Behavior::Hang));
    let fetcher = Arc::new(InMemoryImageFetcher::new());
    let engine = ChatEngine::builder(model, fetcher).build();

    engine.submit(Submission::text_only("hello"));
    engine.cancel();

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(engine.current(), Some(ChatResult::Pending));
}

#[tokio::test]
async fn a_new_submission_supersedes_the_in_flight_one() {
    let model = Arc::new(
        ScriptedModel::new(Behavior::Hang)
            .on("second", Behavior::Reply("second answer".to_string())),
    );
    let fetcher = Arc::new(InMemoryImageFetcher::new());
    let engine = ChatEngine::builder(model, fetcher).build();

    let first = engine.submit(Submission::text_only("first"));
    let second = engine.submit(Submission::text_only("second"));
    assert!(second > first);

    let result = wait_for_terminal(&engine).await;
    assert_eq!(
        result,
        ChatResult::Completed {
            message: "second answer".to_string(),
            attached_image: None,
        }
    );

    // The superseded cycle must never overwrite the terminal value.
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(
        engine.current(),
        Some(ChatResult::Completed {
            message: "second answer".to_string(),
            attached_image: None,
        })
    );
}
