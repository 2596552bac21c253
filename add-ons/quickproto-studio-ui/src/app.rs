//! Runtime and session wiring for the studio (bare-metal, cwd-relative storage).

use quickproto_core::{
    ClientConfig, FilePreview, HttpPrototypeService, Notifier, PrototypeService, SessionController,
};
use std::sync::Arc;

/// Studio stack: the tokio runtime request tasks run on, plus the resolved client config.
pub struct StudioStack {
    pub runtime: tokio::runtime::Runtime,
    pub config: ClientConfig,
}

pub fn build_studio_stack(config: ClientConfig) -> Result<StudioStack, Box<dyn std::error::Error>> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .thread_name("quickproto-net")
        .enable_all()
        .build()?;
    tracing::info!(
        generate_url = %config.generate_url,
        quote_url = %config.quote_url,
        storage_path = %config.storage_path,
        "studio stack ready"
    );
    Ok(StudioStack { runtime, config })
}

/// Session controller over HTTP with the file-backed preview surface.
pub fn build_session(stack: &StudioStack, notifier: Notifier) -> SessionController<FilePreview> {
    let service: Arc<dyn PrototypeService> = Arc::new(HttpPrototypeService::from_config(&stack.config));
    SessionController::from_config(
        &stack.config,
        service,
        FilePreview::new(stack.config.preview_dir()),
        stack.runtime.handle().clone(),
    )
    .with_notifier(notifier)
}
