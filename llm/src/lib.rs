//! Abstractions for interacting with hosted large language model services.
//!
//! The `llm` crate defines a [`LLMClient`] trait along with the concrete
//! [`GeminiClient`] implementation and a [`ScriptedClient`] for tests.
//! Discovery results are described by [`LLMModel`].

pub mod client;
pub mod mock;
pub mod model;
pub mod traits;

pub use client::{DEFAULT_BASE_URL, GeminiClient};
pub use mock::{Outcome, ScriptedClient};
pub use model::LLMModel;
pub use traits::{LLMCapability, LLMClient, LLMError};
