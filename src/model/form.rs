/// Maximum display-name length, in characters.
pub const NAME_MAX_CHARS: usize = 80;

/// Corrective text shown while export is unavailable.
pub const EXPORT_BLOCKED_MESSAGE: &str = "Add your name and a photo to export.";

/// Rejected display name.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameError {
    /// Empty after trimming whitespace.
    #[error("name is required")]
    Required,
}

/// Apply the form's `maxlength`: keep at most [`NAME_MAX_CHARS`] characters.
pub fn clamp_name_input(raw: &str) -> String {
    raw.chars().take(NAME_MAX_CHARS).collect()
}

/// Trimmed, length-limited display name.
pub fn validate_name(raw: &str) -> Result<String, NameError> {
    let clamped = clamp_name_input(raw.trim());
    let name = clamped.trim_end();
    if name.is_empty() {
        return Err(NameError::Required);
    }
    Ok(name.to_string())
}

/// Whether export may proceed for the current inputs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportGate {
    /// Name and photo are present.
    Ready,
    /// Export disabled; `reason` is shown to the user.
    Blocked {
        /// Human-readable corrective message.
        reason: &'static str,
        /// Name missing or blank.
        missing_name: bool,
        /// No photo selected.
        missing_photo: bool,
    },
}

impl ExportGate {
    /// Gate for a raw name and photo presence.
    pub fn evaluate(name: &str, has_photo: bool) -> Self {
        let missing_name = validate_name(name).is_err();
        let missing_photo = !has_photo;
        if missing_name || missing_photo {
            Self::Blocked {
                reason: EXPORT_BLOCKED_MESSAGE,
                missing_name,
                missing_photo,
            }
        } else {
            Self::Ready
        }
    }

    /// Whether export is enabled.
    pub fn is_ready(self) -> bool {
        matches!(self, Self::Ready)
    }

    /// Message to surface, if blocked.
    pub fn message(self) -> Option<&'static str> {
        match self {
            Self::Ready => None,
            Self::Blocked { reason, .. } => Some(reason),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/model/form.rs"]
mod tests;
