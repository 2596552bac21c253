//! quickproto-studio-ui: desktop shell for QuickProto.
//!
//! Mounts a `quickproto_core::SessionController` as the only interactive surface: prompt,
//! read-only code view, prelude, preview surface, and the quote panel.

pub mod app;
pub mod config;
pub mod shell;

pub use app::{build_session, build_studio_stack, StudioStack};
pub use config::StudioConfig;
