//! quickproto-core: prompt-to-prototype session library.
//!
//! The [`SessionController`] drives two independent remote flows (code generation and
//! quote documents), keeps the live artifact and quote handle, and feeds generated markup
//! to a [`PreviewRenderer`]. Front-ends (see `add-ons/quickproto-studio-ui`) only mount it.

mod artifact;
mod config;
mod error;
mod preview;
mod quote;
mod service;
mod session;
pub mod variants;

pub use artifact::{GeneratedArtifact, SyntaxMode};
pub use config::{
    ClientConfig, DEFAULT_GENERATE_URL, DEFAULT_QUOTE_LOADING_FLOOR_SECS, DEFAULT_QUOTE_URL,
    DEFAULT_STORAGE_PATH,
};
pub use error::{ServiceError, ServiceResult};
pub use preview::{FilePreview, MemoryPreview, PreviewRenderer, PREVIEW_FILE_NAME};
pub use quote::QuoteDocument;
pub use service::{HttpPrototypeService, PrototypeService};
pub use session::{
    FlowEvent, LoadingFloor, Notifier, RequestId, SessionController, GENERATION_FAILED_MESSAGE,
    PROMPT_REQUIRED_MESSAGE, QUOTE_FAILED_MESSAGE,
};
pub use variants::{ContentRegion, DisplayStrategy, PrototypeKind, PrototypeShell};

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
