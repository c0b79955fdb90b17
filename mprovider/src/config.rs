//! Client construction configuration: credentials, safety, and generation.
//!
//! ```rust
//! use mprovider::{GeminiConfig, SecretString};
//!
//! let config = GeminiConfig::new(SecretString::new("key"));
//! assert_eq!(config.model, "gemini-1.5-flash");
//! assert_eq!(format!("{:?}", config.api_key), "[REDACTED]");
//! ```

use mcommon::GenerationOptions;

/// In-memory API credential. Redacted in debug output and zeroed on drop.
#[derive(PartialEq, Eq)]
pub struct SecretString {
    value: String,
}

impl SecretString {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }

    pub fn expose(&self) -> &str {
        self.value.as_str()
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }
}

impl Clone for SecretString {
    fn clone(&self) -> Self {
        Self::new(self.value.clone())
    }
}

impl std::fmt::Debug for SecretString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl Drop for SecretString {
    fn drop(&mut self) {
        unsafe {
            self.value.as_mut_vec().fill(0);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HarmCategory {
    Harassment,
    HateSpeech,
    DangerousContent,
    SexuallyExplicit,
}

impl HarmCategory {
    pub fn wire_name(&self) -> &'static str {
        match self {
            Self::Harassment => "HARM_CATEGORY_HARASSMENT",
            Self::HateSpeech => "HARM_CATEGORY_HATE_SPEECH",
            Self::DangerousContent => "HARM_CATEGORY_DANGEROUS_CONTENT",
            Self::SexuallyExplicit => "HARM_CATEGORY_SEXUALLY_EXPLICIT",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockThreshold {
    None,
    OnlyHigh,
    MediumAndAbove,
    LowAndAbove,
}

impl BlockThreshold {
    pub fn wire_name(&self) -> &'static str {
        match self {
            Self::None => "BLOCK_NONE",
            Self::OnlyHigh => "BLOCK_ONLY_HIGH",
            Self::MediumAndAbove => "BLOCK_MEDIUM_AND_ABOVE",
            Self::LowAndAbove => "BLOCK_LOW_AND_ABOVE",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SafetySetting {
    pub category: HarmCategory,
    pub threshold: BlockThreshold,
}

impl SafetySetting {
    pub fn new(category: HarmCategory, threshold: BlockThreshold) -> Self {
        Self {
            category,
            threshold,
        }
    }
}

/// Everything the client needs at construction time. There is no hidden
/// process-wide state; embedders build one of these and pass it in.
/// Requests carrying images use `vision_safety_settings`; plain text
/// requests use `safety_settings`.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub model: String,
    pub api_key: SecretString,
    pub safety_settings: Vec<SafetySetting>,
    pub vision_safety_settings: Vec<SafetySetting>,
    pub generation: GenerationOptions,
}

impl GeminiConfig {
    pub fn new(api_key: SecretString) -> Self {
        Self {
            model: "gemini-1.5-flash".to_string(),
            api_key,
            safety_settings: Self::default_safety_settings(),
            vision_safety_settings: Self::vision_safety_settings(),
            generation: GenerationOptions::default()
                .with_temperature(0.99)
                .with_top_k(50)
                .with_top_p(0.99),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_safety_settings(mut self, safety_settings: Vec<SafetySetting>) -> Self {
        self.safety_settings = safety_settings;
        self
    }

    pub fn with_vision_safety_settings(mut self, safety_settings: Vec<SafetySetting>) -> Self {
        self.vision_safety_settings = safety_settings;
        self
    }

    pub fn with_generation(mut self, generation: GenerationOptions) -> Self {
        self.generation = generation;
        self
    }

    pub fn default_safety_settings() -> Vec<SafetySetting> {
        vec![
            SafetySetting::new(HarmCategory::Harassment, BlockThreshold::OnlyHigh),
            SafetySetting::new(HarmCategory::HateSpeech, BlockThreshold::MediumAndAbove),
        ]
    }

    pub fn vision_safety_settings() -> Vec<SafetySetting> {
        let mut settings = Self::default_safety_settings();
        settings.push(SafetySetting::new(
            HarmCategory::DangerousContent,
            BlockThreshold::OnlyHigh,
        ));
        settings.push(SafetySetting::new(
            HarmCategory::SexuallyExplicit,
            BlockThreshold::MediumAndAbove,
        ));
        settings
    }
}
