//! Outbound request construction and model-path selection.

use mcommon::GenerationOptions;
use mimage::NormalizedImage;
use mprovider::ModelRequest;

use crate::script::{DEFAULT_IMAGE_INSTRUCTION, USER_MESSAGE_SCRIPT};
use crate::{ChatError, ModelPath};

#[derive(Debug, Clone, PartialEq)]
pub struct ComposedPrompt {
    pub path: ModelPath,
    pub request: ModelRequest,
}

/// Builds the outbound request for one submission.
///
/// Text without images goes to the text path verbatim. Any image routes to
/// the vision path: the behavioral script first, then the images in
/// submission order, then the user text (or the default instruction when
/// the text is blank). Blank text with no images is a composition error;
/// no request is built and no remote call happens.
pub fn compose(
    model: &str,
    options: GenerationOptions,
    text: Option<&str>,
    images: Vec<NormalizedImage>,
) -> Result<ComposedPrompt, ChatError> {
    let trimmed = text.map(str::trim).filter(|value| !value.is_empty());

    if images.is_empty() {
        let Some(body) = trimmed else {
            return Err(ChatError::composition("nothing to send"));
        };

        let request = ModelRequest::new(model).with_options(options).with_text(body);
        return Ok(ComposedPrompt {
            path: ModelPath::TextOnly,
            request,
        });
    }

    let mut request = ModelRequest::new(model)
        .with_options(options)
        .with_text(USER_MESSAGE_SCRIPT)
        .enable_streaming();

    for image in &images {
        request = request.with_inline_image(image.mime(), image.data.clone());
    }

    request = request.with_text(trimmed.unwrap_or(DEFAULT_IMAGE_INSTRUCTION));

    Ok(ComposedPrompt {
        path: ModelPath::VisionCapable,
        request,
    })
}
