use serde::{Deserialize, Serialize};

/// Body of `POST /`. `prompt` is optional at the wire level so that a missing
/// field is reported as a validation error rather than a parse failure.
#[derive(Debug, Deserialize)]
pub struct AskRequest {
    #[serde(default)]
    pub prompt: Option<String>,
}

impl AskRequest {
    /// The prompt exactly as received, unless it is missing or empty.
    pub fn prompt(&self) -> Option<&str> {
        self.prompt.as_deref().filter(|p| !p.is_empty())
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct AskResponse {
    pub text: String,
}
