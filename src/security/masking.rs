//! Masking of secret values for display
//!
//! Used wherever a value must be recognisable without being disclosed
//! (masked exports, diagnostics).

/// Minimum length before a preview is shown at all
const MIN_PREVIEW_LEN: usize = 10;

/// Characters shown at each end of the preview
const PREVIEW_CHARS: usize = 3;

/// Masks a value for safe display
///
/// Shows only the first 3 and last 3 characters. Values shorter than 10
/// characters are fully masked as "****".
///
/// # Examples
///
/// ```
/// use credential_manager::security::mask_value;
///
/// assert_eq!(mask_value("sk_test_4eC39HqLyjWDarjtT1zdp7dc"), "sk_...7dc");
/// assert_eq!(mask_value("short"), "****");
/// ```
pub fn mask_value(value: &str) -> String {
    let chars: Vec<char> = value.chars().collect();
    if chars.len() < MIN_PREVIEW_LEN {
        return "****".to_string();
    }

    let prefix: String = chars[..PREVIEW_CHARS].iter().collect();
    let suffix: String = chars[chars.len() - PREVIEW_CHARS..].iter().collect();
    format!("{}...{}", prefix, suffix)
}
