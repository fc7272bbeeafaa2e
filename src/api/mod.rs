//! HTTP API for the intake app.
//!
//! Routes are nested under `/api/`. Account and discovery routes are open;
//! everything else requires a bearer session and runs through
//! Auth → Audit → Handler.

pub mod endpoints;
pub mod error;
pub mod middleware;
pub mod router;
pub mod server;
pub mod types;

pub use error::ApiError;
pub use router::api_router;
pub use server::serve;
pub use types::ApiContext;
