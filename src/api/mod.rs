//! API Module
//!
//! HTTP handlers and routing exposing the cache facade.
//!
//! # Endpoints
//! - `POST /store` - Store a value under a generated key
//! - `GET /get/:key` - Read a value back
//! - `GET /replay` - Call history of the store operation
//! - `GET /page?url=...` - Fetch a page through the expiring cache
//! - `GET /page/count?url=...` - Page access count
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
