//! DevMatch: match developers with side projects.
//!
//! The crate is laid out hexagonally. [`domain`] holds entities, rules and
//! services behind port traits; [`inbound`] exposes them as a JSON API and as
//! server-rendered pages; [`outbound`] implements the ports over PostgreSQL,
//! memory, Argon2 and JWT; [`server`] wires everything into an Actix app.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod server;
#[cfg(test)]
pub(crate) mod test_support;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
