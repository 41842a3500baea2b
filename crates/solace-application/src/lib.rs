//! Application layer for Solace.
//!
//! Wires the safety rules, the session store and a completion provider into
//! the message pipeline the front end talks to.

pub mod context_builder;
pub mod orchestrator;
pub mod post_processor;
pub mod responses;
pub mod session_store;

pub use context_builder::{ContextBuilder, SYSTEM_PREAMBLE};
pub use orchestrator::{
    Notice, PipelineOrchestrator, PipelineState, ReplyRoute, RotateOutcome, SubmitOutcome,
    SubmitRejection,
};
pub use post_processor::{REPEAT_FALLBACK, ResponsePostProcessor, SAFETY_DISCLAIMER};
pub use session_store::{Mutation, PersistenceFailure, SessionStore};
