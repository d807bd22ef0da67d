//! HTTP API.
//!
//! Exposes the risk scorer, the stateless nudge generator and
//! session-scoped patient state as JSON endpoints. The router is
//! composable: `api_router()` returns a `Router` that can be mounted on
//! any axum server instance.

pub mod endpoints;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod router;
pub mod server;
pub mod types;

pub use router::api_router;
pub use server::{start_server, ApiServer, ServerInfo};
pub use types::ApiContext;
