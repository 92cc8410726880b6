//! User-supplied parameters for one synthesis.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Target clinical document genre.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DocumentType {
    DischargeSummary,
    #[serde(rename = "gp-letter")]
    GPLetter,
    Handover,
    ConsultantUpdate,
    Referral,
}

impl DocumentType {
    pub const ALL: [DocumentType; 5] = [
        DocumentType::DischargeSummary,
        DocumentType::GPLetter,
        DocumentType::Handover,
        DocumentType::ConsultantUpdate,
        DocumentType::Referral,
    ];

    pub fn label(self) -> &'static str {
        match self {
            DocumentType::DischargeSummary => "Discharge Summary",
            DocumentType::GPLetter => "GP Letter",
            DocumentType::Handover => "Handover Note",
            DocumentType::ConsultantUpdate => "Consultant Update",
            DocumentType::Referral => "Referral Letter",
        }
    }

    /// Name used on the wire and on the command line.
    pub fn slug(self) -> &'static str {
        match self {
            DocumentType::DischargeSummary => "discharge-summary",
            DocumentType::GPLetter => "gp-letter",
            DocumentType::Handover => "handover",
            DocumentType::ConsultantUpdate => "consultant-update",
            DocumentType::Referral => "referral",
        }
    }

    /// Sections the document is expected to contain, in order.
    pub fn sections(self) -> &'static [&'static str] {
        match self {
            DocumentType::DischargeSummary => &[
                "Presenting Complaint",
                "Diagnosis",
                "Clinical Course",
                "Investigations",
                "Medication Changes",
                "Follow-up Actions for GP",
            ],
            DocumentType::GPLetter => &[
                "Reason for Correspondence",
                "Diagnosis",
                "Summary of Care",
                "Medication Changes",
                "Follow-up Actions for GP",
            ],
            DocumentType::Handover => &[
                "Situation",
                "Background",
                "Assessment",
                "Recommendations",
                "Medication Changes",
                "Outstanding Tasks",
            ],
            DocumentType::ConsultantUpdate => &[
                "Current Status",
                "Progress Since Last Review",
                "Investigations",
                "Medication Changes",
                "Questions for Consultant",
            ],
            DocumentType::Referral => &[
                "Reason for Referral",
                "Relevant History",
                "Investigations",
                "Medication Changes",
                "Specific Question",
            ],
        }
    }

    /// File name offered when the draft is downloaded.
    pub fn file_name(self) -> String {
        format!("{}.txt", self.slug())
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for DocumentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DocumentType::ALL
            .into_iter()
            .find(|d| d.slug().eq_ignore_ascii_case(s) || d.label().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                let known: Vec<_> = DocumentType::ALL.iter().map(|d| d.slug()).collect();
                format!("unknown document type '{s}' (expected one of: {})", known.join(", "))
            })
    }
}

/// Verbosity and structural richness of the generated text.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum DetailLevel {
    Concise,
    #[default]
    Standard,
    Comprehensive,
}

impl DetailLevel {
    pub const ALL: [DetailLevel; 3] = [
        DetailLevel::Concise,
        DetailLevel::Standard,
        DetailLevel::Comprehensive,
    ];

    pub fn label(self) -> &'static str {
        match self {
            DetailLevel::Concise => "Concise",
            DetailLevel::Standard => "Standard",
            DetailLevel::Comprehensive => "Comprehensive",
        }
    }

    /// Style instructions rendered into the prompt for this level.
    pub fn style_directive(self) -> &'static str {
        match self {
            DetailLevel::Concise => {
                "Use bullet points only. Keep the whole document under 150 words. \
                 Omit filler and framing phrases such as \"The patient was admitted with\". \
                 Include only the primary diagnosis, major interventions and critical follow-up."
            }
            DetailLevel::Standard => {
                "Write a balanced clinical narrative, similar in length to a conventional \
                 hospital discharge note."
            }
            DetailLevel::Comprehensive => {
                "Write in full prose. Make the causal links between clinical events explicit. \
                 Reproduce every numeric value and investigation trend present in the notes \
                 (for example creatinine or CRP trajectories)."
            }
        }
    }
}

impl fmt::Display for DetailLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for DetailLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DetailLevel::ALL
            .into_iter()
            .find(|d| d.label().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                format!("unknown detail level '{s}' (expected concise, standard or comprehensive)")
            })
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SynthesisParameters {
    pub document_type: DocumentType,
    #[serde(default)]
    pub detail_level: DetailLevel,
    pub raw_notes: String,
}

impl SynthesisParameters {
    pub fn new(
        document_type: DocumentType,
        detail_level: DetailLevel,
        raw_notes: impl Into<String>,
    ) -> Self {
        Self {
            document_type,
            detail_level,
            raw_notes: raw_notes.into(),
        }
    }

    /// Notes are usable only if they contain something other than whitespace.
    pub fn has_notes(&self) -> bool {
        !self.raw_notes.trim().is_empty()
    }
}
