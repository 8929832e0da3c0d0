//! Confirmation before any grant is written.

use crate::host::Prompt;
use crate::{Error, Result};
use grants::PermissionEntry;
use tracing::info;

/// Build the confirmation text: the warning, a blank line, then one line per
/// entry in order.
pub fn summary_message(warning: &str, entries: &[PermissionEntry]) -> String {
    let mut content = String::from(warning);
    content.push('\n');
    for entry in entries {
        content.push('\n');
        content.push_str(&entry.summary_line());
    }
    content
}

/// Asks the user once whether the entries may be applied.
pub struct ConfirmationGate<'a> {
    prompt: &'a dyn Prompt,
}

impl<'a> ConfirmationGate<'a> {
    pub fn new(prompt: &'a dyn Prompt) -> Self {
        Self { prompt }
    }

    /// Show the summary and return the user's answer verbatim.
    ///
    /// Silent runs never reach the gate.
    pub fn confirm(&self, entries: &[PermissionEntry], title: &str, warning: &str) -> Result<bool> {
        let message = summary_message(warning, entries);
        let accepted = self
            .prompt
            .confirm(title, &message)
            .map_err(|e| Error::Prompt(e.to_string()))?;

        info!(accepted, entries = entries.len(), "confirmation answered");
        Ok(accepted)
    }
}
