use crate::params::DocumentType;

/// The editable output text of one session.
///
/// Every write replaces the whole text; nothing is ever merged.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DraftStore {
    text: String,
}

/// Draft packaged for download.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DraftExport {
    pub file_name: String,
    pub contents: String,
}

impl DraftStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> &str {
        &self.text
    }

    /// Overwrite with a freshly synthesized draft.
    pub fn replace(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    /// Overwrite with the user's edited text.
    pub fn edit(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn clear(&mut self) {
        self.text.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn export(&self, document_type: DocumentType) -> DraftExport {
        DraftExport {
            file_name: document_type.file_name(),
            contents: self.text.clone(),
        }
    }
}
