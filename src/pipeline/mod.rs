//! The orchestrator driving prospects through the pipeline

mod orchestrator;
mod outcome;


pub use orchestrator::Pipeline;
pub use outcome::{ConversionOutcome, EmailDelivery, NewProspect, TransitionOutcome};
