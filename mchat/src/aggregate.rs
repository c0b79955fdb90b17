//! Folds remote replies and fragment streams into one final text value.

use futures_util::StreamExt;
use mprovider::{BoxedFragmentStream, ModelReply};

use crate::ChatError;

/// Maps a single-shot reply to its text. An empty or absent answer is an
/// error, never an empty `Completed`.
pub fn aggregate_reply(reply: ModelReply) -> Result<String, ChatError> {
    match reply.text {
        Some(text) if !text.is_empty() => Ok(text),
        _ => Err(ChatError::empty_answer()),
    }
}

/// Concatenates streamed fragments in arrival order, returning only after
/// the stream completes. Nothing partial is ever observable outside this
/// function. A stream that ends without any text is an empty answer.
pub async fn aggregate_stream(mut fragments: BoxedFragmentStream<'_>) -> Result<String, ChatError> {
    let mut output = String::new();

    while let Some(fragment) = fragments.next().await {
        output.push_str(&fragment?);
    }

    if output.is_empty() {
        return Err(ChatError::empty_answer());
    }

    Ok(output)
}
