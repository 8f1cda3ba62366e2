//! Identifier quoting.

use crate::error::SqlError;

/// SQL Server's `sysname` limit.
pub const MAX_IDENT_LEN: usize = 128;

/// Bracket-quote a single-part identifier (`Orders` → `[Orders]`).
///
/// A closing bracket inside the name is doubled, so the quoted form always
/// parses back to exactly one identifier.
///
/// # Errors
///
/// Returns [`SqlError::InvalidIdentifier`] when the name is blank, longer than
/// [`MAX_IDENT_LEN`] characters, or contains a NUL or control character.
pub fn quote_ident(name: &str) -> Result<String, SqlError> {
    let invalid = |reason| SqlError::InvalidIdentifier {
        name: name.to_owned(),
        reason,
    };

    if name.trim().is_empty() {
        return Err(invalid("identifier is blank"));
    }
    if name.chars().count() > MAX_IDENT_LEN {
        return Err(invalid("identifier exceeds 128 characters"));
    }
    if name.chars().any(char::is_control) {
        return Err(invalid("identifier contains a control character"));
    }

    let mut quoted = String::with_capacity(name.len() + 2);
    quoted.push('[');
    for ch in name.chars() {
        if ch == ']' {
            quoted.push_str("]]");
        } else {
            quoted.push(ch);
        }
    }
    quoted.push(']');
    Ok(quoted)
}
