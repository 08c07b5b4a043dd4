//! Defines the [`Post`] type. See [`Post::to_value`] and [`Post::summarize`]
//! for details on how posts are converted into template values, and
//! [`crate::parser`] for how they are parsed from disk.

use crate::tag::Topic;
use crate::value::{array, object, optional, string};
use chrono::{DateTime, FixedOffset};
use gtmpl::Value;
use std::path::PathBuf;

/// The date format shown on post and overview pages, e.g. `Sat May 01 2021`.
const DISPLAY_DATE_FORMAT: &str = "%a %b %d %Y";

/// Represents a blog post. Header fields that were absent from the source file
/// are `None`; they are rendered as nil rather than rejected.
#[derive(Clone, Debug)]
pub struct Post {
    /// The source file the post was parsed from.
    pub source: PathBuf,

    /// The output location for the post page, i.e.
    /// `{output}/{blog_base}/{slug}/index.html`.
    pub file_path: PathBuf,

    /// The site-relative URL of the post page, i.e. `/{blog_base}/{slug}/`.
    pub url: String,

    /// The sanitized title. Two posts with the same slug write to the same
    /// location and the last one wins.
    pub slug: String,

    pub author: Option<String>,
    pub published: Option<DateTime<FixedOffset>>,
    pub updated: Option<DateTime<FixedOffset>>,

    /// The topics in header order.
    pub topics: Vec<Topic>,

    /// The raw `topics:` header value.
    pub topics_comma_sep: Option<String>,
    pub title: Option<String>,
    pub snippet: Option<String>,

    /// The post body rendered to HTML.
    pub body: String,
}

impl Post {
    /// Converts the post into a [`Value`] including the rendered body. Used for
    /// post pages and the feed-facing templates.
    pub fn to_value(&self) -> Value {
        let mut value = self.summarize();
        crate::value::extend(&mut value, vec![("body", string(&self.body))]);
        value
    }

    /// Converts the post into a [`Value`] without the body, for overview and
    /// home pages.
    pub fn summarize(&self) -> Value {
        object(vec![
            ("title", optional(self.title.as_deref())),
            ("slug", string(&self.slug)),
            ("url", string(&self.url)),
            ("author", optional(self.author.as_deref())),
            ("snippet", optional(self.snippet.as_deref())),
            ("date", optional(self.display_date().as_deref())),
            (
                "published",
                optional(self.published.map(|d| d.to_rfc3339()).as_deref()),
            ),
            (
                "updated",
                optional(self.updated.map(|d| d.to_rfc3339()).as_deref()),
            ),
            ("topics", array(&self.topics, |t| Value::from(t))),
            (
                "topics_comma_sep",
                optional(self.topics_comma_sep.as_deref()),
            ),
        ])
    }

    /// The publication date formatted for display.
    pub fn display_date(&self) -> Option<String> {
        self.published
            .map(|date| date.format(DISPLAY_DATE_FORMAT).to_string())
    }
}

#[cfg(test)]
pub(crate) mod test {
    use super::*;
    use crate::frontmatter::parse_date;

    /// Builds a post with the given title, date and topics for tests in other
    /// modules.
    pub fn post(title: &str, published: &str, topics: &[&str]) -> Post {
        let slug = crate::sanitize::sanitize(title);
        Post {
            source: PathBuf::from(format!("{}.md", slug)),
            file_path: PathBuf::from(format!("/out/blog/{}/index.html", slug)),
            url: format!("/blog/{}/", slug),
            author: Some("Jane Doe".to_owned()),
            published: parse_date(published),
            updated: parse_date(published),
            topics: topics.iter().map(|t| Topic::new("/blog", t)).collect(),
            topics_comma_sep: Some(topics.join(", ")),
            title: Some(title.to_owned()),
            snippet: Some(format!("About {}", title)),
            body: format!("<p>{}</p>\n", title),
            slug,
        }
    }

    #[test]
    fn test_display_date() {
        assert_eq!(
            Some("Sat May 01 2021".to_owned()),
            post("Hello", "2021-05-01", &[]).display_date()
        );
        assert_eq!(None, post("Hello", "not a date", &[]).display_date());
    }

    /// Reads a string field of an object value.
    pub fn field(value: &Value, key: &str) -> Option<String> {
        match value {
            Value::Object(obj) => match obj.get(key) {
                Some(Value::String(s)) => Some(s.clone()),
                _ => None,
            },
            _ => None,
        }
    }

    #[test]
    fn test_to_value_has_body_and_summary_does_not() {
        let p = post("Hello World", "2021-05-01", &["x"]);
        assert_eq!(Some("<p>Hello World</p>\n".to_owned()), field(&p.to_value(), "body"));
        assert_eq!(None, field(&p.summarize(), "body"));
        assert_eq!(Some("/blog/hello-world/".to_owned()), field(&p.summarize(), "url"));
    }

    #[test]
    fn test_missing_fields_are_nil() {
        let mut p = post("Hello", "2021-05-01", &[]);
        p.title = None;
        p.snippet = None;
        match p.summarize() {
            Value::Object(summary) => {
                assert!(matches!(summary.get("title"), Some(Value::Nil)));
                assert!(matches!(summary.get("snippet"), Some(Value::Nil)));
            }
            _ => panic!("posts must convert to objects"),
        }
    }
}
