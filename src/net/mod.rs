//! Networking: the request pipeline and per-resource facades.
//!
//! SYSTEM CONTEXT
//! ==============
//! `transport` defines wire-level request/response values and the network
//! seam, `client` is the single choke point that attaches credentials and
//! classifies failures, `api` maps console operations onto requests, and
//! `types` holds the DTOs the stores reason about.

pub mod api;
pub mod client;
pub mod error;
pub mod notify;
pub mod transport;
pub mod types;
