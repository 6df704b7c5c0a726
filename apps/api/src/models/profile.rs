use serde::Serialize;

/// The persona's textual profile. Built once at startup and shared read-only.
#[derive(Debug, Clone, Serialize)]
pub struct Profile {
    pub display_name: String,
    /// Resume text joined with the free-form summary.
    pub biography: String,
}

impl Profile {
    pub fn new(display_name: impl Into<String>, resume_text: &str, summary: &str) -> Self {
        Self {
            display_name: display_name.into(),
            biography: format!("{} and {}", resume_text.trim_end(), summary.trim()),
        }
    }
}
