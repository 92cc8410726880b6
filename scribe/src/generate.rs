//! One-shot synthesis from the terminal.

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::Context;
use narrative::{Pipeline, Session, SynthesisError, SynthesisParameters};
use tracing::{info, warn};

/// Where the finished draft should be written besides stdout.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Destination {
    Stdout,
    File(PathBuf),
    /// File named after the document type, in the current directory.
    Download,
}

/// Read notes from `path`, or from stdin when `path` is `-`.
pub fn read_notes(path: &Path) -> anyhow::Result<String> {
    if path == Path::new("-") {
        let mut notes = String::new();
        std::io::stdin()
            .read_to_string(&mut notes)
            .context("failed to read notes from stdin")?;
        Ok(notes)
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("failed to read notes from {}", path.display()))
    }
}

/// Run one synthesis and return the draft text.
pub async fn generate(
    pipeline: &Pipeline,
    params: SynthesisParameters,
    destination: &Destination,
) -> anyhow::Result<String> {
    let session = Session::new();
    match session.synthesize(pipeline, &params).await {
        Ok(synthesis) => info!(model = %synthesis.model, attempts = synthesis.attempts, "draft ready"),
        Err(err @ SynthesisError::InvalidParameters(_)) => {
            warn!("please provide some clinical notes first");
            return Err(err.into());
        }
        Err(err) => return Err(err.into()),
    }

    let export = session.export(Some(params.document_type)).await;
    match destination {
        Destination::Stdout => {}
        Destination::File(path) => write_draft(path, &export.contents)?,
        Destination::Download => write_draft(Path::new(&export.file_name), &export.contents)?,
    }
    Ok(export.contents)
}

fn write_draft(path: &Path, contents: &str) -> anyhow::Result<()> {
    std::fs::write(path, contents)
        .with_context(|| format!("failed to write draft to {}", path.display()))?;
    info!(path = %path.display(), "draft saved");
    Ok(())
}
