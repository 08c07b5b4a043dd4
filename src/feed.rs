//! Support for creating the blog's Atom feed from a list of posts.

use crate::config::Author;
use crate::post::Post;
use atom_syndication::{
    Category, Content, Entry, Error as AtomError, Feed, Generator, Link, Person,
};
use chrono::{DateTime, FixedOffset, Utc};
use std::fmt;
use std::io::Write;
use url::Url;

/// The site-relative URL of the blog feed.
pub const FEED_URL: &str = "/feeds/blog.atom";

/// The feed's display name in template `feeds` lists.
pub const FEED_NAME: &str = "Atom feed";

/// Bundled configuration for creating a feed.
pub struct FeedConfig {
    pub title: String,
    pub description: Option<String>,
    pub author: Option<Author>,

    /// The absolute site root, e.g. `https://www.example.net/`. Entry ids and
    /// links are this joined with each post's site-relative URL.
    pub site_root: Url,

    /// The site-relative URL of the blog, e.g. `/blog/`.
    pub blog_url: String,

    /// The site-relative URL of the feed itself, e.g. `/feeds/blog.atom`.
    pub feed_url: String,
}

/// Creates a feed from some configuration ([`FeedConfig`]) and a list of
/// [`Post`]s in chronological order, and writes the result to a
/// [`std::io::Write`].
pub fn write_feed<W: Write>(config: &FeedConfig, posts: &[Post], w: W) -> Result<()> {
    feed(config, posts, now())?.write_to(w)?;
    Ok(())
}

fn now() -> DateTime<FixedOffset> {
    Utc::now().into()
}

/// Builds the feed. Entries are newest first. `build_time` stands in for
/// missing post dates and is the feed's `updated` when there are no posts.
pub fn feed(
    config: &FeedConfig,
    posts: &[Post],
    build_time: DateTime<FixedOffset>,
) -> Result<Feed> {
    let entries = feed_entries(config, posts, build_time)?;
    let updated = entries
        .iter()
        .map(|entry| entry.updated)
        .max()
        .unwrap_or(build_time);
    let feed_url = absolute(&config.site_root, &config.feed_url)?;

    Ok(Feed {
        title: config.title.clone().into(),
        id: feed_url.to_string(),
        updated,
        authors: author_to_people(config.author.clone()),
        subtitle: config.description.clone().map(Into::into),
        generator: Some(Generator {
            value: env!("CARGO_PKG_NAME").to_owned(),
            uri: None,
            version: Some(env!("CARGO_PKG_VERSION").to_owned()),
        }),
        icon: Some(config.site_root.join("favicon.ico")?.to_string()),
        logo: Some(config.site_root.join("static/img/icon.png")?.to_string()),
        links: vec![
            Link {
                href: absolute(&config.site_root, &config.blog_url)?.to_string(),
                rel: "alternate".to_owned(),
                ..Default::default()
            },
            Link {
                href: feed_url.to_string(),
                rel: "self".to_owned(),
                mime_type: Some("application/atom+xml".to_owned()),
                ..Default::default()
            },
        ],
        entries,
        ..Default::default()
    })
}

fn feed_entries(
    config: &FeedConfig,
    posts: &[Post],
    build_time: DateTime<FixedOffset>,
) -> Result<Vec<Entry>> {
    let mut entries: Vec<Entry> = Vec::with_capacity(posts.len());

    for post in posts.iter().rev() {
        let url = absolute(&config.site_root, &post.url)?.to_string();
        let updated = post.updated.or(post.published).unwrap_or(build_time);

        entries.push(Entry {
            id: url.clone(),
            title: post.title.clone().unwrap_or_default().into(),
            updated,
            published: post.published,
            authors: match &post.author {
                Some(name) => vec![Person {
                    name: name.clone(),
                    email: None,
                    uri: None,
                }],
                None => author_to_people(config.author.clone()),
            },
            links: vec![Link {
                href: url,
                rel: "alternate".to_owned(),
                ..Default::default()
            }],
            summary: post.snippet.clone().map(Into::into),
            content: Some(Content {
                value: Some(post.body.clone()),
                content_type: Some("html".to_owned()),
                ..Default::default()
            }),
            categories: post
                .topics
                .iter()
                .map(|topic| Category {
                    term: topic.name.clone(),
                    ..Default::default()
                })
                .collect(),
            ..Default::default()
        })
    }
    Ok(entries)
}

/// Resolves a site-relative URL against the site root, keeping any path the
/// root itself has (`https://host/site/` + `/blog/` is
/// `https://host/site/blog/`).
fn absolute(site_root: &Url, site_relative: &str) -> std::result::Result<Url, url::ParseError> {
    site_root.join(site_relative.trim_start_matches('/'))
}

fn author_to_people(author: Option<Author>) -> Vec<Person> {
    match author {
        Some(author) => vec![Person {
            name: author.name,
            email: author.email,
            uri: None,
        }],
        None => Vec::new(),
    }
}

type Result<T> = std::result::Result<T, Error>;

/// Represents a problem creating a feed. Variants inlude I/O, Atom, and
/// URL issues.
#[derive(Debug)]
pub enum Error {
    /// Returned when there is a generic I/O error.
    Io(std::io::Error),

    /// Returned when there is an Atom-related error.
    Atom(AtomError),

    /// Returned when a post or feed URL can't be joined onto the site root.
    Url(url::ParseError),
}

impl fmt::Display for Error {
    /// Implements [`fmt::Display`] for [`Error`].
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Io(err) => err.fmt(f),
            Error::Atom(err) => err.fmt(f),
            Error::Url(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements [`std::error::Error`] for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            Error::Atom(err) => Some(err),
            Error::Url(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for Error {
    /// Converts [`std::io::Error`]s into [`Error`]. This allows us to use the
    /// `?` operator in fallible feed operations.
    fn from(err: std::io::Error) -> Error {
        Error::Io(err)
    }
}

impl From<AtomError> for Error {
    /// Converts [`AtomError`]s into [`Error`]. This allows us to use the `?`
    /// operator in fallible feed operations.
    fn from(err: AtomError) -> Error {
        Error::Atom(err)
    }
}

impl From<url::ParseError> for Error {
    /// Converts [`url::ParseError`]s into [`Error`]. This allows us to use
    /// the `?` operator when joining URLs.
    fn from(err: url::ParseError) -> Error {
        Error::Url(err)
    }
}
