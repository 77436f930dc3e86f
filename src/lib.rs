//! snipbin - snippet lifecycle and access-control engine
//!
//! Snippets are created with a short id and three single-use-display
//! authorization codes, expire lazily on access, and can carry a view
//! limit that deletes the snippet once exhausted. Optional password
//! protection gates reads; optional content sealing encrypts stored
//! bodies at rest.

pub mod api;
pub mod cache;
pub mod config;
pub mod errors;
pub mod services;
pub mod storage;
pub mod utils;
