//! # netconsole
//!
//! Client library for the network-device operations console: inventory CRUD,
//! credential-gated login, command execution, configuration backup/diff and
//! bulk collection against the console's REST backend.
//!
//! The crate is organized around three pieces that cooperate through one
//! shared [`state::session::SessionContext`]:
//!
//! - [`net`]: the request pipeline ([`net::client::ApiClient`]) and the
//!   per-resource facades built on top of it.
//! - [`state`]: token persistence, the session state machine, and the
//!   device-list and collection stores.
//! - [`routing`]: console routes and the pre-navigation guard.

pub mod config;
pub mod net;
pub mod routing;
pub mod state;

#[cfg(test)]
pub mod test_helpers;
