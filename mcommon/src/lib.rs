//! Shared primitives for the medris chat orchestration workspace.
//!
//! ```rust
//! use mcommon::{GenerationOptions, SubmissionId};
//!
//! let options = GenerationOptions::default().with_temperature(0.99).with_top_k(50);
//! let submission = SubmissionId::new(1);
//!
//! assert_eq!(options.temperature, Some(0.99));
//! assert_eq!(submission.value(), 1);
//! ```

pub mod future {
    //! Shared async future aliases.
    //!
    //! ```rust
    //! use mcommon::BoxFuture;
    //!
    //! fn str_len<'a>(value: &'a str) -> BoxFuture<'a, usize> {
    //!     Box::pin(async move { value.len() })
    //! }
    //!
    //! let _future = str_len("hello");
    //! ```

    use std::future::Future;
    use std::pin::Pin;

    pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;
}

pub mod model {
    //! Generation settings forwarded to the remote model.
    //!
    //! ```rust
    //! use mcommon::GenerationOptions;
    //!
    //! let options = GenerationOptions::default()
    //!     .with_temperature(0.99)
    //!     .with_top_k(50)
    //!     .with_top_p(0.99);
    //!
    //! assert_eq!(options.top_k, Some(50));
    //! ```

    #[derive(Debug, Clone, Copy, PartialEq, Default)]
    pub struct GenerationOptions {
        pub temperature: Option<f32>,
        pub top_k: Option<u32>,
        pub top_p: Option<f32>,
    }

    impl GenerationOptions {
        pub fn with_temperature(mut self, temperature: f32) -> Self {
            self.temperature = Some(temperature);
            self
        }

        pub fn with_top_k(mut self, top_k: u32) -> Self {
            self.top_k = Some(top_k);
            self
        }

        pub fn with_top_p(mut self, top_p: f32) -> Self {
            self.top_p = Some(top_p);
            self
        }
    }
}

pub mod id {
    //! Submission identifier newtype.
    //!
    //! ```rust
    //! use mcommon::SubmissionId;
    //!
    //! let first = SubmissionId::new(1);
    //! let second = SubmissionId::new(2);
    //!
    //! assert!(second > first);
    //! assert_eq!(first.to_string(), "submission-1");
    //! ```

    use std::fmt::{Display, Formatter};

    /// Monotonic identifier for one orchestration cycle. Later submissions
    /// compare greater than earlier ones.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub struct SubmissionId(u64);

    impl SubmissionId {
        pub fn new(value: u64) -> Self {
            Self(value)
        }

        pub fn value(&self) -> u64 {
            self.0
        }
    }

    impl Display for SubmissionId {
        fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
            write!(f, "submission-{}", self.0)
        }
    }
}

pub use future::BoxFuture;
pub use id::SubmissionId;
pub use model::GenerationOptions;
