//! API Module
//!
//! HTTP handlers and routing for the cache server REST API.
//!
//! # Endpoints
//! - `PUT /set` - Store a value with optional TTL, dependencies and remote channel
//! - `GET /get/:key` - Retrieve a value by key
//! - `PUT /update` - Replace the value of an existing key
//! - `DELETE /del/:key` - Remove a key and its dependents
//! - `POST /invalidate` - Remove by plain key or pattern
//! - `POST /clear` - Remove everything
//! - `GET /stats` - Get cache diagnostics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
