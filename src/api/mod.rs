//! HTTP surface: the analysis form and its JSON API.
//!
//! Handlers stay thin. Multipart decoding happens here; the analysis itself
//! runs on the blocking pool through `AnalysisService`.

pub mod endpoints;
pub mod error;
pub mod router;
pub mod server;
pub mod types;

pub use router::api_router;
pub use types::ApiContext;
