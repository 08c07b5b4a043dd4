//! Turns parsed content into rendered HTML files. Every output file is a
//! [`Document`]: a template, the [`Value`] it is applied to, and one or more
//! target paths. The [`Writer`] adds the site-wide values every template can
//! rely on (`site_root`, `blog_url`, `static_url`, `feeds`) and writes the
//! result to disk.

use crate::config::CorePage;
use crate::feed::{FEED_NAME, FEED_URL};
use crate::index::{BlogIndex, NavEntry};
use crate::paginate::{paginate, Order};
use crate::post::Post;
use crate::sanitize::sanitize;
use crate::screenshot::{Gallery, Screenshot, Screenshots};
use crate::util::{dir_url, output_dir};
use crate::value::{array, extend, number, object, string};
use gtmpl::{Template, Value};
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

/// The templates needed to write the blog.
pub struct BlogTemplates {
    pub post: Template,
    pub overview: Template,
    pub topic_overview: Template,
    pub year_overview: Template,
}

/// Responsible for templating and writing HTML pages to disk.
pub struct Writer<'a> {
    /// The root of the output tree.
    pub output_directory: &'a Path,

    /// The absolute site root, made available to templates for canonical
    /// links.
    pub site_root: &'a str,

    /// The site-relative blog base, e.g. `/blog`.
    pub blog_base: &'a str,
}

impl Writer<'_> {
    /// The values every template receives in addition to its own.
    fn site_values(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("site_root", string(self.site_root)),
            ("blog_url", string(&dir_url(&[self.blog_base]))),
            ("static_url", string("/static/")),
            (
                "feeds",
                Value::Array(vec![object(vec![
                    ("url", string(FEED_URL)),
                    ("name", string(FEED_NAME)),
                ])]),
            ),
        ]
    }

    /// Takes a single [`Document`], templates it, and writes it to each of its
    /// target paths.
    fn write_document(&self, document: Document) -> Result<()> {
        let Document {
            mut value,
            file_paths,
            template,
        } = document;
        extend(&mut value, self.site_values());

        let mut rendered: Vec<u8> = Vec::new();
        template
            .execute(&mut rendered, &gtmpl::Context::from(value)?)
            .map_err(|err| Error::Render {
                path: file_paths.first().cloned().unwrap_or_default(),
                err,
            })?;

        for path in &file_paths {
            if let Some(dir) = path.parent() {
                std::fs::create_dir_all(dir)?;
            }
            std::fs::write(path, &rendered)?;
            log!("write"; "wrote `{}`", path.display());
        }
        Ok(())
    }

    fn write_all<'t>(&self, documents: impl Iterator<Item = Document<'t>>) -> Result<()> {
        documents
            .map(|document| self.write_document(document))
            .collect()
    }

    /// Writes the post pages and the overview pages (all posts, per topic,
    /// per year) for a chronologically ordered slice of posts.
    pub fn write_blog(
        &self,
        posts: &[Post],
        index: &BlogIndex,
        templates: &BlogTemplates,
        page_size: usize,
    ) -> Result<()> {
        let nav = Nav {
            topics: index.topic_nav(self.blog_base),
            years: index.year_nav(self.blog_base),
        };

        self.write_all(post_documents(posts, &templates.post, &nav))?;

        let main = Index {
            url: dir_url(&[self.blog_base]),
            output_directory: output_dir(self.output_directory, self.blog_base),
            posts: posts.iter().collect(),
            fields: Vec::new(),
            order: Order::ChunksReversed,
        };
        self.write_all(main.to_documents(page_size, &templates.overview, &nav).into_iter())?;

        for index in topic_indices(self.blog_base, self.output_directory, posts, index) {
            self.write_all(
                index
                    .to_documents(page_size, &templates.topic_overview, &nav)
                    .into_iter(),
            )?;
        }

        for index in year_indices(self.blog_base, self.output_directory, posts, index) {
            self.write_all(
                index
                    .to_documents(page_size, &templates.year_overview, &nav)
                    .into_iter(),
            )?;
        }
        Ok(())
    }

    /// Writes one overview page per gallery and one page per screenshot.
    pub fn write_galleries(
        &self,
        screenshots: &Screenshots,
        gallery_template: &Template,
        screenshot_template: &Template,
    ) -> Result<()> {
        for gallery in screenshots.galleries() {
            let shots = gallery_value(&gallery);
            let gallery_dir = output_dir(self.output_directory, gallery.path);
            if gallery_dir == self.output_directory {
                log!(
                    "warn";
                    "gallery `{}` has no `screenshotsURL`; skipping its page",
                    gallery.title
                );
            } else {
                self.write_document(Document {
                    value: object(vec![
                        ("title", string(gallery.title)),
                        ("path", string(gallery.path)),
                        ("screenshots", shots.clone()),
                    ]),
                    file_paths: vec![gallery_dir.join("index.html")],
                    template: gallery_template,
                })?;
            }

            for screenshot in &gallery.screenshots {
                let screenshot_dir = output_dir(self.output_directory, &screenshot.url);
                if screenshot_dir == self.output_directory {
                    log!(
                        "warn";
                        "screenshot `{}` has no page path; skipping its page",
                        screenshot.title
                    );
                    continue;
                }
                self.write_document(Document {
                    value: object(vec![
                        ("screenshot", Value::from(*screenshot)),
                        ("screenshots", shots.clone()),
                        ("gallery_title", string(gallery.title)),
                        ("gallery_path", string(&dir_url(&[&screenshot.gallery_path]))),
                    ]),
                    file_paths: vec![screenshot_dir.join("index.html")],
                    template: screenshot_template,
                })?;
            }
        }
        Ok(())
    }

    /// Writes the homepage: the newest `num_posts` posts, newest first, and
    /// the first `num_screenshots` screenshots of `gallery`.
    pub fn write_home(
        &self,
        posts: &[Post],
        gallery: Option<&Gallery>,
        template: &Template,
        num_posts: usize,
        num_screenshots: usize,
    ) -> Result<()> {
        let latest = &posts[posts.len().saturating_sub(num_posts)..];
        let latest: Vec<Value> = latest.iter().rev().map(Post::summarize).collect();

        let (gallery_value, screenshots) = match gallery {
            Some(gallery) => (
                object(vec![
                    ("title", string(gallery.title)),
                    ("url", string(&dir_url(&[gallery.path]))),
                ]),
                Value::Array(
                    gallery
                        .screenshots
                        .iter()
                        .take(num_screenshots)
                        .map(|&s| Value::from(s))
                        .collect(),
                ),
            ),
            None => (Value::Nil, Value::Array(Vec::new())),
        };

        self.write_document(Document {
            value: object(vec![
                ("posts", Value::Array(latest)),
                ("gallery", gallery_value),
                ("screenshots", screenshots),
            ]),
            file_paths: vec![self.output_directory.join("index.html")],
            template,
        })
    }

    /// Writes a standalone page that only sees the site-wide values.
    pub fn write_core_page(&self, page: &CorePage, template: &Template) -> Result<()> {
        self.write_document(Document {
            value: object(Vec::new()),
            file_paths: vec![output_dir(
                self.output_directory,
                &page.output.to_string_lossy(),
            )],
            template,
        })
    }
}

fn gallery_value(gallery: &Gallery) -> Value {
    Value::Array(
        gallery
            .screenshots
            .iter()
            .map(|&s: &&Screenshot| Value::from(s))
            .collect(),
    )
}

/// An output HTML file: a template applied to a value, written to one or more
/// paths (the first overview page lands both at the index root and at
/// `page/1/`).
struct Document<'a> {
    value: Value,
    file_paths: Vec<PathBuf>,
    template: &'a Template,
}

/// The sorted topic and year navigation shared by post and overview pages.
struct Nav {
    topics: Vec<NavEntry>,
    years: Vec<NavEntry>,
}

impl Nav {
    fn fields(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("topics", array(&self.topics, |e| Value::from(e))),
            ("years", array(&self.years, |e| Value::from(e))),
        ]
    }
}

/// Creates the post [`Document`]s. `prev` links to the next older post and
/// `next` to the next newer one.
fn post_documents<'a>(
    posts: &'a [Post],
    template: &'a Template,
    nav: &'a Nav,
) -> impl Iterator<Item = Document<'a>> {
    let link = move |i: Option<usize>| match i.and_then(|i| posts.get(i)) {
        Some(post) => string(&post.url),
        None => Value::Nil,
    };
    posts.iter().enumerate().map(move |(i, post)| {
        let mut value = object(vec![
            ("post", post.to_value()),
            ("prev", link(i.checked_sub(1))),
            ("next", link(Some(i + 1))),
        ]);
        extend(&mut value, nav.fields());
        Document {
            value,
            file_paths: vec![post.file_path.clone()],
            template,
        }
    })
}

/// `Index` represents a paginated listing of [`Post`]s: all posts, or the
/// posts of one topic or year.
struct Index<'a> {
    /// The site-relative URL of the index's first page.
    url: String,

    /// The output directory for the index pages.
    output_directory: PathBuf,

    /// The posts in chronological order.
    posts: Vec<&'a Post>,

    /// Extra values for every page, e.g. the topic name.
    fields: Vec<(&'static str, Value)>,

    /// Which posts land on page 1.
    order: Order,
}

impl<'a> Index<'a> {
    fn page_url(&self, number: usize) -> String {
        dir_url(&[&self.url, "page", &number.to_string()])
    }

    /// The URL of page `number`, or nil outside `1..=total`.
    fn page_link(&self, number: usize, total: usize) -> Value {
        if (1..=total).contains(&number) {
            string(&self.page_url(number))
        } else {
            Value::Nil
        }
    }

    /// Converts the index to a list of overview documents of `page_size`
    /// posts each.
    fn to_documents<'t>(
        &self,
        page_size: usize,
        template: &'t Template,
        nav: &Nav,
    ) -> Vec<Document<'t>> {
        paginate(&self.posts, page_size, self.order)
            .into_iter()
            .map(|page| {
                let page_dir = self
                    .output_directory
                    .join("page")
                    .join(page.number.to_string());
                let mut file_paths = vec![page_dir.join("index.html")];
                if page.number == 1 {
                    file_paths.insert(0, self.output_directory.join("index.html"));
                }

                let mut value = object(vec![
                    (
                        "posts",
                        Value::Array(page.items.iter().map(|p| p.summarize()).collect()),
                    ),
                    ("current_page", number(page.number)),
                    ("total_pages", number(page.total)),
                    ("page_url", string(&self.page_url(page.number))),
                    ("prev", self.page_link(page.number - 1, page.total)),
                    ("next", self.page_link(page.number + 1, page.total)),
                ]);
                extend(&mut value, nav.fields());
                extend(&mut value, self.fields.iter().cloned());

                Document {
                    value,
                    file_paths,
                    template,
                }
            })
            .collect()
    }
}

/// One [`Index`] per topic, in first-seen order.
fn topic_indices<'a>(
    blog_base: &str,
    output_directory: &Path,
    posts: &'a [Post],
    index: &BlogIndex,
) -> Vec<Index<'a>> {
    index
        .topics
        .iter()
        .map(|(topic, positions)| {
            let slug = sanitize(topic);
            let url = dir_url(&[blog_base, "topic", &slug]);
            Index {
                output_directory: output_dir(output_directory, &url),
                url,
                posts: positions.iter().map(|&i| &posts[i]).collect(),
                fields: vec![("topic", string(topic)), ("topic_slug", string(&slug))],
                order: Order::NewestFirst,
            }
        })
        .collect()
}

/// One [`Index`] per publication year, in first-seen order.
fn year_indices<'a>(
    blog_base: &str,
    output_directory: &Path,
    posts: &'a [Post],
    index: &BlogIndex,
) -> Vec<Index<'a>> {
    index
        .years
        .iter()
        .map(|(year, positions)| {
            let url = dir_url(&[blog_base, "year", &year.to_string()]);
            Index {
                output_directory: output_dir(output_directory, &url),
                url,
                posts: positions.iter().map(|&i| &posts[i]).collect(),
                fields: vec![("year", string(&year.to_string()))],
                order: Order::NewestFirst,
            }
        })
        .collect()
}

/// The result of a fallible page-writing operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error in a page-writing operation.
#[derive(Debug)]
pub enum Error {
    /// An error preparing template data.
    Template(String),

    /// An error applying a template for the page at `path`.
    Render { path: PathBuf, err: String },

    /// An error writing the output files.
    Io(io::Error),
}

impl From<io::Error> for Error {
    /// Converts an [`io::Error`] into an [`Error`]. This allows us to use the
    /// `?` operator for fallible I/O operations.
    fn from(err: io::Error) -> Error {
        Error::Io(err)
    }
}

impl From<String> for Error {
    /// Converts a template error message ([`String`]) into an [`Error`]. This
    /// allows us to use the `?` operator for fallible template operations.
    fn from(err: String) -> Error {
        Error::Template(err)
    }
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as presentable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Template(err) => err.fmt(f),
            Error::Render { path, err } => {
                write!(f, "Rendering '{}': {}", path.display(), err)
            }
            Error::Io(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Template(_) => None,
            Error::Render { .. } => None,
            Error::Io(err) => Some(err),
        }
    }
}
