//! Request payloads and their validation into domain values.

pub mod attachments;
pub mod customers;
pub mod inventory;
pub mod orders;
pub mod quotes;
pub mod tasks;
pub mod users;

/// Collapse runs of whitespace and drop control characters.
pub(crate) fn sanitize_inline_text(input: &str) -> String {
    let mut sanitized = String::with_capacity(input.len());
    let mut previous_whitespace = false;

    for ch in input.trim().chars() {
        if ch.is_whitespace() {
            if !previous_whitespace {
                sanitized.push(' ');
                previous_whitespace = true;
            }
        } else if ch.is_control() {
            continue;
        } else {
            sanitized.push(ch);
            previous_whitespace = false;
        }
    }

    sanitized
}

/// Trim free text and map the empty result to `None`.
pub(crate) fn optional_text(input: Option<String>) -> Option<String> {
    input
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_inline_text_collapses_whitespace() {
        assert_eq!(sanitize_inline_text("  Acme \t  Corp\n"), "Acme Corp");
        assert_eq!(sanitize_inline_text("a\u{7}b"), "ab");
    }
}
