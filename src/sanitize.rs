//! Defines [`sanitize`], which turns display strings (post titles, topic
//! names, gallery titles) into the URL-safe slugs used for both output
//! directory names and the links pointing at them.

/// Characters that are reserved in output paths and dropped from slugs.
const RESERVED_CHARS: &[char] = &['[', ']', '.', ':', '/'];

/// Replaces each run of whitespace with a single `-`, strips the reserved
/// characters `[ ] . : /`, and lowercases the result.
pub fn sanitize(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut in_whitespace = false;
    for c in input.chars() {
        if c.is_whitespace() {
            if !in_whitespace {
                out.push('-');
            }
            in_whitespace = true;
            continue;
        }
        in_whitespace = false;
        if !RESERVED_CHARS.contains(&c) {
            out.push(c);
        }
    }
    out.to_lowercase()
}

#[cfg(test)]
mod test {
    use super::*;

    const SAMPLES: &[&str] = &[
        "Hello World",
        "  leading and trailing  ",
        "tabs\tand\nnewlines\r\nmixed",
        "[Brackets] and: colons/slashes.dots",
        "HFGE Screenshots",
        "Version 1.2.3: Release Notes",
        "ÜBER große Straße",
        "already-a-slug",
        "",
        "...",
        "a . b",
    ];

    #[test]
    fn test_sanitize_title() {
        assert_eq!("hello-world", sanitize("Hello World"));
        assert_eq!("hfge-screenshots", sanitize("HFGE Screenshots"));
        assert_eq!("version-123-release-notes", sanitize("Version 1.2.3: Release Notes"));
    }

    #[test]
    fn test_sanitize_collapses_whitespace_runs() {
        assert_eq!("a-b", sanitize("a \t  b"));
        assert_eq!("-a-", sanitize("  a  "));
    }

    #[test]
    fn test_sanitize_output_is_clean() {
        for sample in SAMPLES {
            let slug = sanitize(sample);
            assert!(!slug.chars().any(char::is_whitespace), "{:?}", slug);
            assert!(!slug.chars().any(|c| RESERVED_CHARS.contains(&c)), "{:?}", slug);
            assert_eq!(slug.to_lowercase(), slug);
        }
    }

    #[test]
    fn test_sanitize_idempotent() {
        for sample in SAMPLES {
            let once = sanitize(sample);
            assert_eq!(once, sanitize(&once), "input {:?}", sample);
        }
    }
}
