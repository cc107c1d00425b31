//! Inbound adapters that translate external requests into domain service
//! calls while keeping framework details at the edge.
//!
//! The JSON API lives under [`http`]; server-rendered pages live under
//! [`pages`] and reuse the same state and authentication extractors.

pub mod http;
pub mod pages;
