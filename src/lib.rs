//! 章析 (zhangxi): AI chapter-analysis gateway plus its local process
//! supervisor.
//!
//! The gateway turns one chapter of text into a structured Markdown
//! analysis by brokering a single chat-completion call to the configured
//! AI provider. The launcher binary starts the gateway together with a
//! static front-end server, opens a browser, and tears both down on
//! Ctrl-C.

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod supervisor;

/// Resolves on Ctrl-C or, on unix, SIGTERM — the launcher stops its
/// children with SIGTERM.
pub async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        let mut term = signal(SignalKind::terminate()).expect("install SIGTERM handler");
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {}
            _ = term.recv() => {}
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
