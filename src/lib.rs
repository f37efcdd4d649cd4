//! Prospect pipeline - Moves fund prospects from KYC invitation to investor
//!
//! This library provides:
//! - Schema definitions for prospects, documents, investors and config
//! - The prospect status machine, document review and conversion rules
//! - Email dispatch decisions and email service collaborators
//! - Prospect stores (in-memory and JSON files) with optimistic writes
//! - The orchestrator tying them together, and the CLI on top of it

pub mod cli;
pub mod clock;
pub mod config;
pub mod domain;
pub mod email;
pub mod errors;
pub mod fs;
pub mod pipeline;
pub mod schemas;
pub mod store;

// Re-export commonly used types
pub use errors::{PipelineError, Result};
pub use pipeline::{EmailDelivery, NewProspect, Pipeline, TransitionOutcome};
pub use schemas::{Investor, PipelineConfig, Prospect, ProspectStatus};
