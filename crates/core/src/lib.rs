//! Shared types for the Cozy log analysis pipeline: the log document,
//! handler ordering, inbound message events and the error taxonomy.

pub mod errors;
pub mod models;
