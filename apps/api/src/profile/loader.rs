//! ProfileStore — loads the resume and summary once at startup.
//!
//! Unreadable sources are fatal (`LoadError`). A resume that reads fine but
//! yields no extractable text degrades to [`NO_TEXT_FOUND`] instead.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{info, warn};

use crate::models::profile::Profile;

/// Stand-in text used when a PDF has no extractable text.
pub const NO_TEXT_FOUND: &str = "No text found in PDF.";

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to read resume at {path}: {source}")]
    Resume {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read summary at {path}: {source}")]
    Summary {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Loads the persona profile from a resume (PDF or plain text) and a summary file.
pub fn load_profile(
    display_name: &str,
    resume_path: impl AsRef<Path>,
    summary_path: impl AsRef<Path>,
) -> Result<Profile, LoadError> {
    let resume_path = resume_path.as_ref();
    let summary_path = summary_path.as_ref();

    let resume_bytes = std::fs::read(resume_path).map_err(|source| LoadError::Resume {
        path: resume_path.to_path_buf(),
        source,
    })?;
    let summary = std::fs::read_to_string(summary_path).map_err(|source| LoadError::Summary {
        path: summary_path.to_path_buf(),
        source,
    })?;

    let resume_text = if is_pdf(resume_path) {
        extract_pdf_text(&resume_bytes)
    } else {
        String::from_utf8_lossy(&resume_bytes).into_owned()
    };

    info!(
        "Loaded profile for {display_name}: resume={} chars, summary={} chars",
        resume_text.len(),
        summary.len()
    );

    Ok(Profile::new(display_name, &resume_text, &summary))
}

fn is_pdf(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
}

/// Extracts page text from a PDF. Never fails: errors and empty output yield [`NO_TEXT_FOUND`].
fn extract_pdf_text(bytes: &[u8]) -> String {
    // pdf-extract panics on some malformed inputs; treat that like any other extraction error.
    let extracted = std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem(bytes));

    match extracted {
        Ok(Ok(text)) => {
            let text = join_pages(&text);
            if text.is_empty() {
                warn!("Resume PDF contained no extractable text");
                NO_TEXT_FOUND.to_string()
            } else {
                text
            }
        }
        Ok(Err(e)) => {
            warn!("Resume PDF text extraction failed: {e}");
            NO_TEXT_FOUND.to_string()
        }
        Err(_) => {
            warn!("Resume PDF text extraction panicked");
            NO_TEXT_FOUND.to_string()
        }
    }
}

/// Drops blank pages/lines left by the extractor, keeping one line per text run.
fn join_pages(raw: &str) -> String {
    raw.lines()
        .map(str::trim_end)
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
