//! Restaurant review backend.
//!
//! A REST backend over three document collections — users, restaurants and
//! reviews — with bearer-credential authentication, ownership and role
//! checks, and derived restaurant aggregates (`averageScore`,
//! `averagePrice`) kept consistent across entities without relational
//! foreign keys.
//!
//! Layout follows the hexagonal split: `domain` holds entities, ports and
//! the core services (aggregate maintenance, reference cascades, access
//! checks); `inbound::http` maps requests onto the driving ports;
//! `outbound` implements the driven ports (in-memory document store,
//! bcrypt digests, HS256 credentials).

pub mod bootstrap;
pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;

pub use doc::ApiDoc;
pub use middleware::Trace;
