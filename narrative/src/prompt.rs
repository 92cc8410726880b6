use indoc::indoc;

use crate::error::SynthesisError;
use crate::params::{DetailLevel, DocumentType, SynthesisParameters};

const ROLE_FRAME: &str = indoc! {
    "You are a Senior Medical Registrar writing clinical correspondence in a UK hospital.
    You turn rough ward-round entries and clinical notes into clear, accurate documents for colleagues.
    Every statement you write must be supported by the clinical notes provided below."
};

const REQUIREMENTS: &str = indoc! {
    "- Use standard British medical terminology appropriate for NHS correspondence.
    - Include an explicit \"Medication Changes\" section listing drugs started, stopped, held or changed, with reasons where documented.
    - List follow-up actions for the GP as bullet points.
    - Link complications chronologically to the events that caused them.
    - Do not invent facts that are not in the notes. Write \"Not documented\" where information is missing.
    - Respond with the document text only."
};

const NOTES_START: &str = "<<<CLINICAL NOTES";
const NOTES_END: &str = "CLINICAL NOTES>>>";

/// Builds the generation prompt for one clinical document.
///
/// Rendering is deterministic: the same inputs always produce the same
/// prompt, and the notes are embedded exactly as given.
#[derive(Clone, Debug)]
pub struct PromptBuilder {
    pub document_type: DocumentType,
    pub detail_level: DetailLevel,
    pub raw_notes: String,
}

impl PromptBuilder {
    pub fn new(document_type: DocumentType) -> Self {
        Self {
            document_type,
            detail_level: DetailLevel::default(),
            raw_notes: String::new(),
        }
    }

    pub fn detail_level(mut self, level: DetailLevel) -> Self {
        self.detail_level = level;
        self
    }

    pub fn notes(mut self, text: impl Into<String>) -> Self {
        self.raw_notes = text.into();
        self
    }

    pub fn build(self) -> Result<String, SynthesisError> {
        if self.raw_notes.trim().is_empty() {
            return Err(SynthesisError::InvalidParameters(
                "clinical notes are empty".into(),
            ));
        }

        let mut out = String::from(ROLE_FRAME);

        out.push_str("\n\n## Document Type\n");
        out.push_str(self.document_type.label());
        out.push_str("\n\nStructure the document under these headings, in this order:\n");
        for (i, section) in self.document_type.sections().iter().enumerate() {
            out.push_str(&format!("{}. {section}\n", i + 1));
        }

        out.push_str(&format!("\n## Style ({})\n", self.detail_level.label()));
        out.push_str(self.detail_level.style_directive());

        out.push_str("\n\n## Clinical Notes\n");
        out.push_str(NOTES_START);
        out.push('\n');
        out.push_str(&self.raw_notes);
        out.push('\n');
        out.push_str(NOTES_END);

        out.push_str("\n\n## Requirements\n");
        out.push_str(REQUIREMENTS);
        out.push('\n');

        Ok(out)
    }
}

impl From<&SynthesisParameters> for PromptBuilder {
    fn from(params: &SynthesisParameters) -> Self {
        PromptBuilder::new(params.document_type)
            .detail_level(params.detail_level)
            .notes(params.raw_notes.clone())
    }
}

/// Render the prompt for `params`.
pub fn build_prompt(params: &SynthesisParameters) -> Result<String, SynthesisError> {
    PromptBuilder::from(params).build()
}
