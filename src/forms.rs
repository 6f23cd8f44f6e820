//! Helpers for urlencoded form fields.

/// A field counts as present when it was submitted and is not blank.
/// The value comes back trimmed.
pub fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Verbatim variant for usernames and passwords: only an empty value is
/// absent, whitespace counts as content.
pub fn present_raw(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|v| !v.is_empty())
}
