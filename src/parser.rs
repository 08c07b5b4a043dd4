//! Defines the [`Parser`] and [`Error`] types: the logic for parsing blog
//! posts from the file system into memory. The header format itself lives in
//! [`crate::frontmatter`].

use std::{
    fmt,
    fs::{read_dir, File},
    path::{Path, PathBuf},
};

use crate::{
    frontmatter::{parse_date, split_post},
    markdown,
    post::Post,
    sanitize::sanitize,
    tag::Topic,
    util::dir_url,
};

const MARKDOWN_EXTENSION: &str = "md";

/// Parses [`Post`] objects from source files.
pub struct Parser<'a> {
    /// `blog_base` is the site-relative base of the blog, e.g. `/blog`. Post
    /// URLs are `{blog_base}/{slug}/` and topic URLs
    /// `{blog_base}/topic/{topic_slug}/`.
    blog_base: &'a str,

    /// `posts_directory` is the directory in which post pages will be
    /// rendered (`{output}/{blog_base}`).
    posts_directory: &'a Path,
}

impl<'a> Parser<'a> {
    /// Constructs a new parser. See fields on [`Parser`] for argument
    /// descriptions.
    pub fn new(blog_base: &'a str, posts_directory: &'a Path) -> Parser<'a> {
        Parser {
            blog_base,
            posts_directory,
        }
    }

    /// Reads and parses a single post file.
    pub fn parse_post(&self, path: &Path) -> Result<Post> {
        match self._parse_post(path) {
            Ok(p) => Ok(p),
            Err(e) => Err(Error::Annotated(
                format!("parsing post `{}`", path.display()),
                Box::new(e),
            )),
        }
    }

    fn _parse_post(&self, path: &Path) -> Result<Post> {
        use std::io::Read;
        let mut contents = String::new();
        File::open(path)?.read_to_string(&mut contents)?;
        Ok(self.parse_str(path, &contents))
    }

    /// Builds a [`Post`] from the contents of `source`. Never fails: missing
    /// header fields stay `None` and unparseable dates become `None`. A post
    /// without a title falls back to the sanitized file stem for its slug so
    /// that it doesn't overwrite the blog index.
    pub fn parse_str(&self, source: &Path, input: &str) -> Post {
        let (header, markdown_body) = split_post(input);

        let slug = match &header.title {
            Some(title) => sanitize(title),
            None => {
                let stem = source
                    .file_stem()
                    .map(|stem| stem.to_string_lossy().into_owned())
                    .unwrap_or_default();
                log!("warn"; "post `{}` has no title; using `{}`", source.display(), stem);
                sanitize(&stem)
            }
        };

        let published = header.published.as_deref().and_then(parse_date);
        if published.is_none() {
            log!("warn"; "post `{}` has no valid `published` date", source.display());
        }

        let mut body = String::new();
        markdown::to_html(&mut body, &markdown_body);

        Post {
            source: source.to_owned(),
            file_path: self.posts_directory.join(&slug).join("index.html"),
            url: dir_url(&[self.blog_base, &slug]),
            author: header.author,
            published,
            updated: header.updated.as_deref().and_then(parse_date),
            topics: header
                .topics
                .iter()
                .map(|name| Topic::new(self.blog_base, name))
                .collect(),
            topics_comma_sep: header.topics_comma_sep,
            title: header.title,
            snippet: header.snippet,
            body,
            slug,
        }
    }

    /// Searches `source_directory` for post files (extension `.md`) and
    /// returns the posts in chronological order, oldest first. Files are read
    /// in file-name order and the date sort is stable, so posts sharing a date
    /// (or lacking one) keep their file-name order. Undated posts come first.
    ///
    /// Each post file is structured as follows:
    ///
    /// ```md
    /// author: Jane Doe
    /// published: 2021-05-01
    /// updated: 2021-05-02
    /// topics: Rust, Graphics
    /// title: Hello, world!
    /// snippet: A first post.
    /// ---
    /// # Hello
    ///
    /// World
    /// ```
    pub fn parse_posts(&self, source_directory: &Path) -> Result<Vec<Post>> {
        let mut paths: Vec<PathBuf> = Vec::new();
        for result in read_dir(source_directory)? {
            let entry = result?;
            let path = entry.path();
            if entry.file_type()?.is_file()
                && path.extension().map_or(false, |ext| ext == MARKDOWN_EXTENSION)
            {
                paths.push(path);
            }
        }
        paths.sort();

        let mut posts = paths
            .iter()
            .map(|path| self.parse_post(path))
            .collect::<Result<Vec<Post>>>()?;
        posts.sort_by_key(|post| post.published);
        Ok(posts)
    }
}

/// Represents the result of a [`Post`]-parse operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error parsing a [`Post`] object.
#[derive(Debug)]
pub enum Error {
    /// Returned for I/O errors reading the posts directory or a post file.
    Io(std::io::Error),

    /// An error with an annotation.
    Annotated(String, Box<Error>),
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Io(err) => err.fmt(f),
            Error::Annotated(annotation, err) => {
                write!(f, "{}: {}", &annotation, err)
            }
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            Error::Annotated(_, err) => Some(err),
        }
    }
}

impl From<std::io::Error> for Error {
    /// Converts a [`std::io::Error`] into an [`Error`]. It allows us to
    /// use the `?` operator for fallible I/O functions.
    fn from(err: std::io::Error) -> Error {
        Error::Io(err)
    }
}
