//! Data structures describing models advertised by a backend.
//!
//! An [`LLMModel`] is what discovery yields: an identifier plus the set of
//! [`LLMCapability`] markers the backend reports for it. The resolver in the
//! `narrative` crate only considers models carrying
//! [`LLMCapability::Generate`].

use crate::traits::LLMCapability;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LLMModel {
    pub name: String,
    pub capabilities: Vec<LLMCapability>,
}

impl LLMModel {
    pub fn new(name: impl Into<String>, capabilities: Vec<LLMCapability>) -> Self {
        Self {
            name: name.into(),
            capabilities,
        }
    }

    /// Shorthand for a model that supports text generation only.
    pub fn generative(name: impl Into<String>) -> Self {
        Self::new(name, vec![LLMCapability::Generate])
    }

    pub fn supports(&self, capability: LLMCapability) -> bool {
        self.capabilities.contains(&capability)
    }
}
