//! API layer - HTTP handlers and middleware
//!
//! Resources are nested per path prefix: `/auth`, `/users`, `/providers`,
//! `/availability`, `/bookings` and `/notifications`. Writes go through the
//! bearer-token middleware; provider and booking reads are public.

pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod state;

pub use openapi::ApiDoc;
pub use routes::create_router;
pub use state::AppState;
