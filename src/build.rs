//! Exports the [`build_site`] function which stitches together the high-level
//! steps of building the output static site: copying static assets, writing
//! the core pages, parsing posts ([`crate::parser`]) and rendering the blog
//! ([`crate::write`]) and its feed ([`crate::feed`]), parsing screenshot
//! descriptors ([`crate::screenshot`]) and rendering the galleries, and
//! finally the homepage.
//!
//! Each of these phases runs on its own: a phase that fails is logged and
//! recorded in the returned [`Report`], and the remaining phases still run.

use crate::config::Config;
use crate::feed::{write_feed, Error as FeedError, FeedConfig, FEED_URL};
use crate::index::BlogIndex;
use crate::parser::{Error as ParseError, Parser as PostParser};
use crate::post::Post;
use crate::screenshot::{parse_screenshots, Error as ScreenshotError, Screenshots};
use crate::util::{dir_url, output_dir};
use crate::write::{BlogTemplates, Error as WriteError, Writer};
use gtmpl::Template;
use std::fmt;
use std::fs::File;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// The outcome of [`build_site`]: which phases failed.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Report {
    pub failed: Vec<&'static str>,
}

impl Report {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    /// Runs `phase`, logging and recording a failure under `name`.
    fn run<T>(&mut self, name: &'static str, phase: impl FnOnce() -> Result<T>) -> Option<T> {
        log!("build"; "{}", name);
        match phase() {
            Ok(value) => Some(value),
            Err(err) => {
                log!("error"; "{} phase failed: {}", name, err);
                self.failed.push(name);
                None
            }
        }
    }
}

/// Deletes the output root if it exists and creates it empty. Call this
/// before [`build_site`].
pub fn prepare_output(root: &Path) -> Result<()> {
    rmdir(root)?;
    std::fs::create_dir_all(root)?;
    Ok(())
}

/// Builds the site from a [`Config`] object into `config.output_directory`,
/// which should have been initialized by [`prepare_output`].
pub fn build_site(config: &Config) -> Report {
    let mut report = Report::default();
    let writer = Writer {
        output_directory: &config.output_directory,
        site_root: config.site_root.as_str(),
        blog_base: &config.blog_base,
    };

    report.run("static", || copy_static(config));
    report.run("core", || write_core_pages(config, &writer));
    let posts = report
        .run("blog", || build_blog(config, &writer))
        .unwrap_or_default();
    let screenshots = report
        .run("screenshots", || build_galleries(config, &writer))
        .unwrap_or_default();
    report.run("home", || build_home(config, &writer, &posts, &screenshots));

    report
}

fn copy_static(config: &Config) -> Result<()> {
    copy_dir(
        &config.static_source_directory,
        &config.output_directory.join("static"),
    )?;
    copy_dir(
        &config.static_root_source_directory,
        &config.output_directory,
    )
}

fn write_core_pages(config: &Config, writer: &Writer) -> Result<()> {
    for page in &config.theme.pages {
        let template = parse_template(page.template.iter())?;
        writer.write_core_page(page, &template)?;
    }
    Ok(())
}

fn build_blog(config: &Config, writer: &Writer) -> Result<Vec<Post>> {
    let posts_directory = output_dir(&config.output_directory, &config.blog_base);
    let post_parser = PostParser::new(&config.blog_base, &posts_directory);
    let posts = post_parser.parse_posts(&config.posts_source_directory)?;
    log!("build"; "parsed {} posts", posts.len());

    let templates = BlogTemplates {
        post: parse_template(config.theme.post.iter())?,
        overview: parse_template(config.theme.overview.iter())?,
        topic_overview: parse_template(config.theme.topic_overview.iter())?,
        year_overview: parse_template(config.theme.year_overview.iter())?,
    };
    writer.write_blog(&posts, &BlogIndex::new(&posts), &templates, config.page_size)?;

    let feed_path = output_dir(&config.output_directory, FEED_URL);
    if let Some(dir) = feed_path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    write_feed(
        &FeedConfig {
            title: config.title.clone(),
            description: config.description.clone(),
            author: config.author.clone(),
            site_root: config.site_root.clone(),
            blog_url: dir_url(&[&config.blog_base]),
            feed_url: FEED_URL.to_owned(),
        },
        &posts,
        File::create(&feed_path)?,
    )?;
    log!("write"; "wrote `{}`", feed_path.display());

    Ok(posts)
}

fn build_galleries(config: &Config, writer: &Writer) -> Result<Screenshots> {
    let screenshots = parse_screenshots(&config.screenshots_source_directory)?;
    log!("build"; "parsed {} screenshots", screenshots.items.len());

    writer.write_galleries(
        &screenshots,
        &parse_template(config.theme.gallery.iter())?,
        &parse_template(config.theme.screenshot.iter())?,
    )?;
    Ok(screenshots)
}

fn build_home(
    config: &Config,
    writer: &Writer,
    posts: &[Post],
    screenshots: &Screenshots,
) -> Result<()> {
    let gallery = screenshots.gallery_by_slug(&config.home_gallery);
    if gallery.is_none() {
        log!("warn"; "no gallery titled `{}` for the homepage", config.home_gallery);
    }
    writer.write_home(
        posts,
        gallery.as_ref(),
        &parse_template(config.theme.home.iter())?,
        config.home_posts,
        config.home_screenshots,
    )?;
    Ok(())
}

/// Recursively copies the contents of `src` into `dst`, creating directories
/// as needed. A missing `src` is skipped.
fn copy_dir(src: &Path, dst: &Path) -> Result<()> {
    if !src.exists() {
        log!("warn"; "`{}` does not exist; nothing to copy", src.display());
        return Ok(());
    }

    for entry in WalkDir::new(src) {
        let entry = entry?;
        let relative = match entry.path().strip_prefix(src) {
            Ok(relative) => relative,
            Err(_) => continue,
        };
        let target = dst.join(relative);
        if entry.file_type().is_dir() {
            std::fs::create_dir_all(&target)?;
        } else {
            std::fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}

// Loads the template files' contents, concatenated in order, and parses the
// result into a single template.
fn parse_template<P: AsRef<Path>>(template_files: impl Iterator<Item = P>) -> Result<Template> {
    let mut contents = String::new();
    for template_file in template_files {
        use std::io::Read;
        let template_file = template_file.as_ref();
        File::open(&template_file)
            .map_err(|e| Error::OpenTemplateFile {
                path: template_file.to_owned(),
                err: e,
            })?
            .read_to_string(&mut contents)?;
        contents.push(' ');
    }

    let mut template = Template::default();
    template.parse(&contents).map_err(Error::ParseTemplate)?;
    Ok(template)
}

type Result<T> = std::result::Result<T, Error>;

/// The error type for building a site. Errors can be during parsing, writing,
/// cleaning the output directory, parsing template files, and other I/O.
#[derive(Debug)]
pub enum Error {
    /// Returned for errors parsing posts.
    Parse(ParseError),

    /// Returned for errors parsing screenshot descriptors.
    Screenshots(ScreenshotError),

    /// Returned for errors writing pages to disk as HTML files.
    Write(WriteError),

    /// Returned for I/O problems while cleaning the output directory.
    Clean { path: PathBuf, err: std::io::Error },

    /// Returned for I/O problems while opening template files.
    OpenTemplateFile { path: PathBuf, err: std::io::Error },

    /// Returned for errors parsing template files.
    ParseTemplate(String),

    /// Returned for errors writing the feed.
    Feed(FeedError),

    /// Returned for errors walking a static source directory.
    WalkDir(walkdir::Error),

    /// Returned for other I/O errors.
    Io(std::io::Error),
}

impl fmt::Display for Error {
    /// Implements [`fmt::Display`] for [`Error`].
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Parse(err) => err.fmt(f),
            Error::Screenshots(err) => err.fmt(f),
            Error::Write(err) => err.fmt(f),
            Error::Clean { path, err } => {
                write!(f, "Cleaning directory '{}': {}", path.display(), err)
            }
            Error::OpenTemplateFile { path, err } => {
                write!(f, "Opening template file '{}': {}", path.display(), err)
            }
            Error::ParseTemplate(err) => err.fmt(f),
            Error::Feed(err) => err.fmt(f),
            Error::WalkDir(err) => err.fmt(f),
            Error::Io(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements [`std::error::Error`] for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Parse(err) => Some(err),
            Error::Screenshots(err) => Some(err),
            Error::Write(err) => Some(err),
            Error::Clean { path: _, err } => Some(err),
            Error::OpenTemplateFile { path: _, err } => Some(err),
            Error::ParseTemplate(_) => None,
            Error::Feed(err) => Some(err),
            Error::WalkDir(err) => Some(err),
            Error::Io(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for Error {
    /// Converts [`std::io::Error`]s into [`Error`]. This allows us to use the
    /// `?` operator.
    fn from(err: std::io::Error) -> Error {
        Error::Io(err)
    }
}

impl From<ParseError> for Error {
    /// Converts [`ParseError`]s into [`Error`]. This allows us to use the `?`
    /// operator.
    fn from(err: ParseError) -> Error {
        Error::Parse(err)
    }
}

impl From<ScreenshotError> for Error {
    /// Converts [`ScreenshotError`]s into [`Error`]. This allows us to use
    /// the `?` operator.
    fn from(err: ScreenshotError) -> Error {
        Error::Screenshots(err)
    }
}

impl From<WriteError> for Error {
    /// Converts [`WriteError`]s into [`Error`]. This allows us to use the `?`
    /// operator.
    fn from(err: WriteError) -> Error {
        Error::Write(err)
    }
}

impl From<FeedError> for Error {
    /// Converts [`FeedError`]s into [`Error`]. This allows us to use the `?`
    /// operator.
    fn from(err: FeedError) -> Error {
        Error::Feed(err)
    }
}

impl From<walkdir::Error> for Error {
    /// Converts [`walkdir::Error`]s into [`Error`]. This allows us to use the
    /// `?` operator.
    fn from(err: walkdir::Error) -> Error {
        Error::WalkDir(err)
    }
}

fn rmdir(dir: &Path) -> Result<()> {
    match std::fs::remove_dir_all(dir) {
        Ok(x) => Ok(x),
        Err(e) => match e.kind() {
            std::io::ErrorKind::NotFound => Ok(()),
            _ => Err(Error::Clean {
                path: dir.to_owned(),
                err: e,
            }),
        },
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const THEME: &str = "post: [post.html]\n\
                         overview: [overview.html]\n\
                         topic_overview: [topic.html]\n\
                         year_overview: [year.html]\n\
                         gallery: [gallery.html]\n\
                         screenshot: [screenshot.html]\n\
                         home: [home.html]\n\
                         pages:\n  - output: contact/index.html\n    template: [contact.html]\n";

    const TEMPLATES: &[(&str, &str)] = &[
        ("post.html", "post:{{.post.title}}"),
        (
            "overview.html",
            "page {{.current_page}}/{{.total_pages}}:{{range .posts}}{{.title}};{{end}}",
        ),
        ("topic.html", "topic {{.topic}}:{{range .posts}}{{.title}};{{end}}"),
        ("year.html", "year {{.year}}:{{range .posts}}{{.title}};{{end}}"),
        ("gallery.html", "gallery {{.title}}:{{range .screenshots}}{{.title}};{{end}}"),
        ("screenshot.html", "shot {{.screenshot.title}} in {{.gallery_path}}"),
        (
            "home.html",
            "home:{{range .posts}}{{.title}};{{end}}|{{range .screenshots}}{{.title}};{{end}}",
        ),
        ("contact.html", "contact {{.static_url}}"),
    ];

    const POSTS: &[(&str, &str)] = &[
        (
            "a.md",
            "title: First\npublished: 2019-03-01\ntopics: Rust\n---\nOne\n",
        ),
        (
            "b.md",
            "title: Second\npublished: 2020-03-01\ntopics: Rust, Graphics\n---\nTwo\n",
        ),
        ("c.md", "title: Third\npublished: 2020-06-01\ntopics: Rust\n---\nThree\n"),
    ];

    const SHOTS: &str = "screenshotsTitle: HFGE Screenshots\n\
                         screenshotsURL: /projects/hfge/screenshots\n\
                         title: Deferred\nimageMin: /a-min.png\nimageBig: /a.png\n\
                         url: /projects/hfge/screenshots/deferred\n";

    fn project(with_posts: bool) -> std::io::Result<TempDir> {
        let dir = TempDir::new()?;
        let root = dir.path();
        fs::write(
            root.join("skald.yaml"),
            "site_root: https://www.example.net/\ntitle: Example\npage_size: 2\n",
        )?;

        fs::create_dir(root.join("templates"))?;
        fs::write(root.join("templates").join("theme.yaml"), THEME)?;
        for (name, contents) in TEMPLATES {
            fs::write(root.join("templates").join(name), contents)?;
        }

        if with_posts {
            fs::create_dir(root.join("blog-posts"))?;
            for (name, contents) in POSTS {
                fs::write(root.join("blog-posts").join(name), contents)?;
            }
        }

        fs::create_dir(root.join("screenshots"))?;
        fs::write(root.join("screenshots").join("hfge.txt"), SHOTS)?;

        fs::create_dir_all(root.join("static").join("css"))?;
        fs::write(root.join("static").join("css").join("site.css"), "body {}")?;
        fs::create_dir(root.join("static_root"))?;
        fs::write(root.join("static_root").join("robots.txt"), "User-agent: *")?;
        Ok(dir)
    }

    // Template files are joined with a space, so rendered pages carry a
    // trailing one.
    fn read(root: &Path, path: &str) -> String {
        fs::read_to_string(root.join(path)).unwrap().trim_end().to_owned()
    }

    fn build(dir: &TempDir) -> (Config, Report) {
        let config = Config::from_directory(dir.path(), None).unwrap();
        prepare_output(&config.output_directory).unwrap();
        let report = build_site(&config);
        (config, report)
    }

    #[test]
    fn test_build_site() {
        let dir = project(true).unwrap();
        let (config, report) = build(&dir);
        let out = config.output_directory.as_path();

        assert_eq!(Report::default(), report);
        assert_eq!("post:Second", read(out, "blog/second/index.html"));

        // Page 1 holds the oldest chunk, newest first, and is written twice.
        assert_eq!("page 1/2:Second;First;", read(out, "blog/index.html"));
        assert_eq!(read(out, "blog/index.html"), read(out, "blog/page/1/index.html"));
        assert_eq!("page 2/2:Third;", read(out, "blog/page/2/index.html"));

        // Topic and year overviews start with the newest posts.
        assert_eq!("topic Rust:Third;Second;", read(out, "blog/topic/rust/index.html"));
        assert_eq!("topic Rust:First;", read(out, "blog/topic/rust/page/2/index.html"));
        assert_eq!("topic Graphics:Second;", read(out, "blog/topic/graphics/page/1/index.html"));
        assert_eq!("year 2020:Third;Second;", read(out, "blog/year/2020/index.html"));

        assert_eq!(
            "gallery HFGE Screenshots:Deferred;",
            read(out, "projects/hfge/screenshots/index.html")
        );
        assert_eq!(
            "shot Deferred in /projects/hfge/screenshots/",
            read(out, "projects/hfge/screenshots/deferred/index.html")
        );

        assert_eq!("home:Third;Second;First;|Deferred;", read(out, "index.html"));
        assert_eq!("contact /static/", read(out, "contact/index.html"));
        assert_eq!("body {}", read(out, "static/css/site.css"));
        assert_eq!("User-agent: *", read(out, "robots.txt"));

        let feed = read(out, "feeds/blog.atom");
        assert!(feed.find("/blog/third/").unwrap() < feed.find("/blog/first/").unwrap());
    }

    #[test]
    fn test_failed_phase_does_not_stop_others() {
        let dir = project(false).unwrap();
        let (config, report) = build(&dir);
        let out = config.output_directory.as_path();

        assert_eq!(vec!["blog"], report.failed);
        assert!(!report.is_success());
        assert_eq!(
            "shot Deferred in /projects/hfge/screenshots/",
            read(out, "projects/hfge/screenshots/deferred/index.html")
        );
        assert_eq!("home:|Deferred;", read(out, "index.html"));
    }

    #[test]
    fn test_prepare_output_clears_previous_build() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("output");
        fs::create_dir_all(out.join("stale")).unwrap();
        fs::write(out.join("stale").join("index.html"), "old").unwrap();

        prepare_output(&out).unwrap();
        assert!(out.is_dir());
        assert_eq!(0, fs::read_dir(&out).unwrap().count());
    }
}
