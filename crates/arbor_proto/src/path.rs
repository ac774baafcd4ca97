//! Node path grammar.
//!
//! A valid path is absolute, slash-separated, has no empty, `.` or `..`
//! components, does not end in `/` (the root `/` excepted) and contains no
//! control or reserved characters.

use crate::error::{ProtoError, ProtoResult};

/// Separator between path components.
pub const SEPARATOR: char = '/';

/// Validates a node path.
pub fn validate_path(path: &str) -> ProtoResult<()> {
    validate(path, false)
}

/// Validates the path of a sequential create.
///
/// The server appends the sequence suffix, so a trailing separator is
/// allowed here (`/queue/` yields `/queue/0000000001`).
pub fn validate_sequential_path(path: &str) -> ProtoResult<()> {
    validate(path, true)
}

fn validate(path: &str, sequential: bool) -> ProtoResult<()> {
    if path.is_empty() {
        return Err(ProtoError::invalid_path(path, "path must not be empty"));
    }
    if !path.starts_with(SEPARATOR) {
        return Err(ProtoError::invalid_path(
            path,
            "path must start with / character",
        ));
    }
    if path.len() == 1 {
        return Ok(());
    }

    let mut components: Vec<&str> = path[1..].split(SEPARATOR).collect();
    if components.last() == Some(&"") {
        if !sequential {
            return Err(ProtoError::invalid_path(
                path,
                "path must not end with / character",
            ));
        }
        // The suffix completes the last component.
        components.pop();
    }

    for component in components {
        if component.is_empty() {
            return Err(ProtoError::invalid_path(path, "empty node name specified"));
        }
        if component == "." || component == ".." {
            return Err(ProtoError::invalid_path(path, "relative paths not allowed"));
        }
        if let Some(c) = component.chars().find(|c| is_invalid_char(*c)) {
            return Err(ProtoError::invalid_path(
                path,
                format!("invalid character {:?}", c),
            ));
        }
    }
    Ok(())
}

fn is_invalid_char(c: char) -> bool {
    matches!(c,
        '\u{0000}'..='\u{001f}'
        | '\u{007f}'..='\u{009f}'
        | '\u{e000}'..='\u{f8ff}'
        | '\u{fff0}'..='\u{ffff}')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_valid_paths() {
        for path in ["/", "/a", "/a/b", "/app/config.json", "/a/..b", "/a/.b", "/ünï"] {
            assert!(validate_path(path).is_ok(), "{path} should be valid");
        }
    }

    #[test]
    fn rejects_invalid_paths() {
        for path in [
            "", "a", "a/b", "/a/", "//", "/a//b", "/a/.", "/a/..", "/./a", "/a\u{0}b", "/a\u{7f}",
            "/\u{e000}",
        ] {
            let err = validate_path(path).unwrap_err();
            assert!(
                matches!(err, ProtoError::InvalidPath { .. }),
                "{path:?} should be rejected"
            );
        }
    }

    #[test]
    fn sequential_paths_may_end_with_separator() {
        assert!(validate_sequential_path("/queue/").is_ok());
        assert!(validate_sequential_path("/queue/item-").is_ok());
        assert!(validate_path("/queue/").is_err());
        assert!(validate_sequential_path("/queue//").is_err());
    }

    #[test]
    fn reason_is_reported() {
        let err = validate_path("/a//b").unwrap_err();
        assert!(err.to_string().contains("empty node name"));
    }
}
