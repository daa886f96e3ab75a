pub mod account;
pub mod contact;
pub mod events;
pub mod health;

/// Trimmed, non-empty value of an optional body field.
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
  value
    .map(|v| v.trim().to_owned())
    .filter(|v| !v.is_empty())
}
