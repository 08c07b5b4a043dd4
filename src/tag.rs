//! Defines the [`Topic`] type, which represents a [`crate::post::Post`]
//! topic.

use crate::sanitize::sanitize;
use crate::util::dir_url;
use gtmpl::Value;

/// Represents a [`crate::post::Post`] topic. The `name` is kept as written in
/// the post header; `slug` and `url` are derived from it so that links to a
/// topic and the topic's output directory always agree. Topics are grouped by
/// `name` (see [`crate::index::BlogIndex`]).
#[derive(Clone, Debug)]
pub struct Topic {
    /// The topic as written in the post header, e.g. `Graphics Engines`.
    pub name: String,

    /// The sanitized name, e.g. `graphics-engines`.
    pub slug: String,

    /// The site-relative URL of the topic's first overview page, i.e.
    /// `/{blog_base}/topic/{slug}/`.
    pub url: String,
}

impl Topic {
    /// Creates a topic for `name` under the blog base directory.
    pub fn new(blog_base: &str, name: &str) -> Topic {
        let slug = sanitize(name);
        Topic {
            url: dir_url(&[blog_base, "topic", &slug]),
            name: name.to_owned(),
            slug,
        }
    }
}

impl From<&Topic> for Value {
    /// Converts [`Topic`]s into [`Value`]s for templating.
    fn from(t: &Topic) -> Value {
        use std::collections::HashMap;
        let mut m: HashMap<String, Value> = HashMap::new();
        m.insert("name".to_owned(), Value::String(t.name.clone()));
        m.insert("slug".to_owned(), Value::String(t.slug.clone()));
        m.insert("url".to_owned(), Value::String(t.url.clone()));
        Value::Object(m)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_new_topic() {
        let topic = Topic::new("/blog", "Graphics Engines");
        assert_eq!("Graphics Engines", topic.name);
        assert_eq!("graphics-engines", topic.slug);
        assert_eq!("/blog/topic/graphics-engines/", topic.url);
    }
}
