use std::path::Path;

/// Maximum length of a sanitized filename, to stay clear of filesystem limits.
const MAX_NAME_LEN: usize = 100;

/// Name used when sanitization leaves nothing usable.
const FALLBACK_NAME: &str = "file";

/// Map an arbitrary client-supplied filename to a filesystem-safe one.
///
/// Characters outside `[A-Za-z0-9.-]` become `_`, runs of `_` collapse to a
/// single one, and the result is truncated to 100 characters. Empty or
/// all-invalid input falls back to the constant `"file"` so the storage name
/// is never empty.
pub fn sanitize_file_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len().min(MAX_NAME_LEN));
    let mut last_was_placeholder = false;

    for ch in name.chars() {
        // Output is pure ASCII, so byte length equals character count.
        if out.len() >= MAX_NAME_LEN {
            break;
        }
        if ch.is_ascii_alphanumeric() || ch == '.' || ch == '-' {
            out.push(ch);
            last_was_placeholder = false;
        } else if !last_was_placeholder {
            out.push('_');
            last_was_placeholder = true;
        }
    }

    if out.chars().all(|c| c == '_') {
        return FALLBACK_NAME.to_owned();
    }
    out
}

/// Extract the lower-cased extension (with leading dot) from a filename.
///
/// Returns an empty string when the name has no extension, matching the
/// behavior for dotfiles like `.gitignore`.
pub fn file_extension(name: &str) -> String {
    Path::new(name)
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy().to_lowercase()))
        .unwrap_or_default()
}
