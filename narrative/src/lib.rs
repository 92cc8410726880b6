//! Clinical narrative synthesis.
//!
//! Turns free-text clinical notes into a structured document by delegating
//! generation to a hosted language model. A synthesize action runs a fixed
//! sequence of stages: [`PromptBuilder`] renders the prompt,
//! [`ModelResolver`] picks a working model, [`SynthesisInvoker`] performs the
//! call, and on success the text replaces the session's [`DraftStore`].

pub mod config;
pub mod draft;
pub mod error;
pub mod invoker;
pub mod params;
pub mod pipeline;
pub mod prompt;
pub mod resolver;
pub mod session;

pub use config::Settings;
pub use draft::{DraftExport, DraftStore};
pub use error::SynthesisError;
pub use invoker::{GenerationRequest, SynthesisInvoker};
pub use params::{DetailLevel, DocumentType, SynthesisParameters};
pub use pipeline::{Pipeline, Synthesis};
pub use prompt::{PromptBuilder, build_prompt};
pub use resolver::{CandidateQueue, ModelResolver, Resolved};
pub use session::Session;
