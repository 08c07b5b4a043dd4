//! Line-oriented front matter shared by post files and screenshot descriptor
//! files.
//!
//! A header line is recognized by its leading field name (e.g. `title: Hello`
//! or `titleFoo: x` both match `title`); the value is everything after the
//! first `:` with surrounding whitespace trimmed. A matching line without a
//! colon has an empty value. Post files end their header with a line that is
//! exactly [`FENCE`]; everything after it is the markdown body.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone};

/// Separates a post's header from its body.
pub const FENCE: &str = "---";

/// Splits `input` into lines on `\n` or `\r\n`. Unlike [`str::lines`], a
/// trailing newline yields a final empty line so that body text round-trips.
pub fn lines(input: &str) -> impl Iterator<Item = &str> {
    input
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
}

/// Returns the value of field `name` if `line` starts with `name`.
pub fn field<'a>(line: &'a str, name: &str) -> Option<&'a str> {
    if !line.starts_with(name) {
        return None;
    }
    Some(match line.find(':') {
        Some(colon) => line[colon + 1..].trim(),
        None => "",
    })
}

/// The raw header of a post file. Fields that never appear stay `None`;
/// nothing here is validated.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PostHeader {
    pub author: Option<String>,
    pub published: Option<String>,
    pub updated: Option<String>,

    /// The last `topics:` value as written, e.g. `Rust, Graphics`.
    pub topics_comma_sep: Option<String>,

    /// Every topic from every `topics:` line, trimmed, empty entries skipped.
    pub topics: Vec<String>,
    pub title: Option<String>,
    pub snippet: Option<String>,
}

/// Splits a post source into its header and its markdown body. Every line
/// after the fence is appended to the body preceded by a newline. Without a
/// fence the body is empty.
pub fn split_post(input: &str) -> (PostHeader, String) {
    let mut header = PostHeader::default();
    let mut body = String::new();
    let mut in_body = false;

    for line in lines(input) {
        if in_body {
            body.push('\n');
            body.push_str(line);
        } else if let Some(value) = field(line, "author") {
            header.author = Some(value.to_owned());
        } else if let Some(value) = field(line, "published") {
            header.published = Some(value.to_owned());
        } else if let Some(value) = field(line, "updated") {
            header.updated = Some(value.to_owned());
        } else if let Some(value) = field(line, "topics") {
            header.topics_comma_sep = Some(value.to_owned());
            header.topics.extend(
                value
                    .split(',')
                    .map(str::trim)
                    .filter(|topic| !topic.is_empty())
                    .map(str::to_owned),
            );
        } else if let Some(value) = field(line, "title") {
            header.title = Some(value.to_owned());
        } else if let Some(value) = field(line, "snippet") {
            header.snippet = Some(value.to_owned());
        } else if line == FENCE {
            in_body = true;
        }
    }

    (header, body)
}

/// Parses a header date. Accepts RFC 3339, RFC 2822, `YYYY-MM-DD HH:MM[:SS]`,
/// `YYYY-MM-DDTHH:MM:SS` and `YYYY-MM-DD`; values without an offset are taken
/// as UTC. Returns `None` for anything else.
pub fn parse_date(input: &str) -> Option<DateTime<FixedOffset>> {
    const NAIVE_DATE_TIME_FORMATS: &[&str] =
        &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

    let input = input.trim();
    if let Ok(date) = DateTime::parse_from_rfc3339(input) {
        return Some(date);
    }
    if let Ok(date) = DateTime::parse_from_rfc2822(input) {
        return Some(date);
    }

    let naive = NAIVE_DATE_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(input, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(input, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })?;
    Some(FixedOffset::east_opt(0)?.from_utc_datetime(&naive))
}
