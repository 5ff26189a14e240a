//! Message handed to the delivery collaborator.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    /// Plain-text body
    pub text: String,
    /// Formatted body
    pub html: String,
}
