//! # Cozy Log Parser
//!
//! Retrieves Minecraft logs from messages, extracts structured facts from
//! them and runs rule checks that produce diagnostics for the user.
//!
//! The pipeline is three ordered handler chains over one mutable
//! [`Log`](cozy_core::models::Log):
//!
//! - [`retrievers`] turn URLs and attachments into raw log text
//! - [`parsers`] fill in the structured fields of the log
//! - [`processors`] add messages, flag problems or abort
//!
//! [`config::PipelineConfig`] chooses the handlers and
//! [`pipeline::Pipeline`] runs them.

pub mod cache;
pub mod config;
pub mod http;
pub mod parsers;
pub mod pastebins;
pub mod pipeline;
pub mod processors;
pub mod retrievers;
pub mod settings;
pub mod sources;

pub use config::PipelineConfig;
pub use pipeline::{Pipeline, Report};
pub use settings::ParserSettings;
