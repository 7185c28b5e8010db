//! Client-side state: the persisted credential, the session state machine and
//! the stores built on top of the request pipeline.

pub mod auth;
pub mod collection;
pub mod devices;
pub mod session;
pub mod token;
