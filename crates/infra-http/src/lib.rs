// Poolrank HTTP Infrastructure - Adapters for the external data services

pub mod dune;
pub mod moralis;

// Re-exports
pub use dune::{DuneClient, DuneConfig};
pub use moralis::{MoralisClient, MoralisConfig};

/// Render a non-success response as "HTTP <status>: <body>"
pub(crate) async fn error_text(response: reqwest::Response) -> String {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    format!("HTTP {status}: {body}")
}
