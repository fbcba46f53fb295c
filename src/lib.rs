//! Malaeb application library
//!
//! In-memory venue booking: the slot template, booking store, slot resolver,
//! revenue aggregation and maintenance ledger, shared through a [`Session`]
//! and exposed as kernel modules.

pub mod error;
pub mod fixtures;
pub mod modules;
pub mod session;
pub mod utils;

pub use error::{DomainError, Result};
pub use session::Session;
