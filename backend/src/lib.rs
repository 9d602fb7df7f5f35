//! Recipe-sharing backend library.
//!
//! Layered hexagonally: `domain` owns entities, services, and ports;
//! `inbound::http` adapts HTTP; `outbound` adapts PostgreSQL, in-memory
//! state, and the completion provider; `server` wires everything together.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod server;

pub use doc::ApiDoc;
pub use middleware::Trace;
