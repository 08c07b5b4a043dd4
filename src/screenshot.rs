//! Defines the [`Screenshot`] and [`Screenshots`] types and the parsing of
//! screenshot descriptor files.
//!
//! A descriptor file names a gallery and lists its screenshots:
//!
//! ```text
//! screenshotsTitle: HFGE Screenshots
//! screenshotsURL: /projects/hfge/screenshots
//! title: Deferred shading
//! imageMin: /static/img/deferred-min.png
//! imageBig: /static/img/deferred.png
//! url: /projects/hfge/screenshots/deferred-shading
//! title: Shadow maps
//! ...
//! ```
//!
//! There are no record delimiters. A screenshot is committed as soon as its
//! four fields (`title`, `imageMin`, `imageBig`, `url`) are all set, in any
//! order, after which those fields are cleared for the next record. A field
//! that repeats before the record completes overwrites the earlier value.

use crate::frontmatter::{field, lines};
use crate::index::GroupIndex;
use crate::value::{object, string};
use gtmpl::Value;
use std::collections::HashMap;
use std::fmt;
use std::fs::{read_dir, File};
use std::path::{Path, PathBuf};

/// A single screenshot record.
#[derive(Clone, Debug, PartialEq)]
pub struct Screenshot {
    /// The gallery title (`screenshotsTitle`) in effect when the record
    /// completed.
    pub gallery: String,

    /// The gallery base path (`screenshotsURL`) in effect when the record
    /// completed.
    pub gallery_path: String,

    pub title: String,
    pub image_min: String,
    pub image_big: String,

    /// The site-relative path of the screenshot's own page.
    pub url: String,
}

impl From<&Screenshot> for Value {
    fn from(s: &Screenshot) -> Value {
        object(vec![
            ("title", string(&s.title)),
            ("image_min", string(&s.image_min)),
            ("image_big", string(&s.image_big)),
            ("url", string(&s.url)),
            ("gallery", string(&s.gallery)),
            ("gallery_path", string(&s.gallery_path)),
        ])
    }
}

/// All parsed screenshots plus the gallery index over them.
#[derive(Clone, Debug, Default)]
pub struct Screenshots {
    /// Every screenshot in the order it was parsed.
    pub items: Vec<Screenshot>,

    /// Gallery title to positions in `items`, galleries in first-seen order.
    pub galleries: GroupIndex<String>,

    /// Gallery title to base path, taken from the gallery's first record.
    base_paths: HashMap<String, String>,
}

/// A gallery view: title, base path and its screenshots in parse order.
pub struct Gallery<'a> {
    pub title: &'a str,
    pub path: &'a str,
    pub screenshots: Vec<&'a Screenshot>,
}

impl Screenshots {
    /// Appends `screenshot` and indexes it under its gallery.
    pub fn push(&mut self, screenshot: Screenshot) {
        self.base_paths
            .entry(screenshot.gallery.clone())
            .or_insert_with(|| screenshot.gallery_path.clone());
        self.galleries
            .insert(screenshot.gallery.clone(), self.items.len());
        self.items.push(screenshot);
    }

    /// The base path recorded for `gallery`.
    pub fn base_path(&self, gallery: &str) -> Option<&str> {
        self.base_paths.get(gallery).map(String::as_str)
    }

    /// Iterates galleries in first-seen order.
    pub fn galleries(&self) -> impl Iterator<Item = Gallery<'_>> {
        self.galleries.iter().map(move |(title, positions)| Gallery {
            title,
            path: self.base_path(title).unwrap_or_default(),
            screenshots: positions.iter().map(|&i| &self.items[i]).collect(),
        })
    }

    /// Finds the first gallery whose sanitized title is `slug`.
    pub fn gallery_by_slug(&self, slug: &str) -> Option<Gallery<'_>> {
        self.galleries()
            .find(|gallery| crate::sanitize::sanitize(gallery.title) == slug)
    }
}

/// The fields of the record being accumulated.
#[derive(Default)]
struct PendingRecord {
    title: Option<String>,
    image_min: Option<String>,
    image_big: Option<String>,
    url: Option<String>,
}

impl PendingRecord {
    fn is_complete(&self) -> bool {
        [&self.title, &self.image_min, &self.image_big, &self.url]
            .iter()
            .all(|f| f.as_deref().map_or(false, |v| !v.is_empty()))
    }

    fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.image_min.is_none()
            && self.image_big.is_none()
            && self.url.is_none()
    }
}

/// Line-by-line state machine over one or more descriptor files. Gallery
/// title, gallery path and a partial record all carry over from one line (and
/// one file) to the next.
#[derive(Default)]
pub struct DescriptorParser {
    gallery: Option<String>,
    gallery_path: Option<String>,
    pending: PendingRecord,
    screenshots: Screenshots,
}

impl DescriptorParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds every line of `input` through [`DescriptorParser::feed_line`].
    pub fn feed(&mut self, input: &str) {
        for line in lines(input) {
            self.feed_line(line);
        }
    }

    /// Applies one line, committing the pending record if it is now complete.
    pub fn feed_line(&mut self, line: &str) {
        if let Some(value) = field(line, "screenshotsTitle") {
            self.gallery = Some(value.to_owned());
        } else if let Some(value) = field(line, "screenshotsURL") {
            self.gallery_path = Some(value.to_owned());
        } else if let Some(value) = field(line, "title") {
            self.pending.title = Some(value.to_owned());
        } else if let Some(value) = field(line, "imageMin") {
            self.pending.image_min = Some(value.to_owned());
        } else if let Some(value) = field(line, "imageBig") {
            self.pending.image_big = Some(value.to_owned());
        } else if let Some(value) = field(line, "url") {
            self.pending.url = Some(value.to_owned());
        }

        if self.pending.is_complete() {
            let record = std::mem::take(&mut self.pending);
            self.screenshots.push(Screenshot {
                gallery: self.gallery.clone().unwrap_or_default(),
                gallery_path: self.gallery_path.clone().unwrap_or_default(),
                title: record.title.unwrap_or_default(),
                image_min: record.image_min.unwrap_or_default(),
                image_big: record.image_big.unwrap_or_default(),
                url: record.url.unwrap_or_default(),
            });
        }
    }

    /// Returns the committed screenshots. A trailing incomplete record is
    /// dropped and reported.
    pub fn finish(self) -> Screenshots {
        if !self.pending.is_empty() {
            log!(
                "warn";
                "dropping incomplete screenshot record `{}` (needs title, imageMin, imageBig and url)",
                self.pending.title.as_deref().unwrap_or("<untitled>")
            );
        }
        self.screenshots
    }
}

/// Parses every file in `source_directory`, in file-name order, as one
/// continuous descriptor stream.
pub fn parse_screenshots(source_directory: &Path) -> Result<Screenshots> {
    use std::io::Read;

    let mut paths: Vec<PathBuf> = Vec::new();
    for result in read_dir(source_directory)? {
        let entry = result?;
        if entry.file_type()?.is_file() {
            paths.push(entry.path());
        }
    }
    paths.sort();

    let mut parser = DescriptorParser::new();
    for path in &paths {
        let mut contents = String::new();
        File::open(path)
            .and_then(|mut file| file.read_to_string(&mut contents))
            .map_err(|err| Error::Read {
                path: path.to_owned(),
                err,
            })?;
        parser.feed(&contents);
    }
    Ok(parser.finish())
}

/// The result of a fallible screenshot-parse operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error parsing screenshot descriptors.
#[derive(Debug)]
pub enum Error {
    /// Returned when a descriptor file can't be read.
    Read { path: PathBuf, err: std::io::Error },

    /// Returned for other I/O errors, e.g. listing the directory.
    Io(std::io::Error),
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Read { path, err } => {
                write!(f, "Reading screenshot file '{}': {}", path.display(), err)
            }
            Error::Io(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Read { path: _, err } => Some(err),
            Error::Io(err) => Some(err),
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

#[cfg(test)]
mod test {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const DESCRIPTOR: &str = "screenshotsTitle: HFGE Screenshots\n\
                              screenshotsURL: /projects/hfge/screenshots\n\
                              title: One\n\
                              imageMin: /img/1-min.png\n\
                              imageBig: /img/1.png\n\
                              url: /projects/hfge/screenshots/one\n\
                              url: /projects/hfge/screenshots/two\n\
                              imageBig: /img/2.png\n\
                              title: Two\n\
                              imageMin: /img/2-min.png\n\
                              title: Three\n\
                              imageMin: /img/3-min.png\n\
                              imageBig: /img/3.png\n\
                              url: /projects/hfge/screenshots/three\n";

    #[test]
    fn test_three_complete_records() {
        let mut parser = DescriptorParser::new();
        parser.feed(DESCRIPTOR);
        let screenshots = parser.finish();

        assert_eq!(3, screenshots.items.len());
        assert!(screenshots
            .items
            .iter()
            .all(|s| s.gallery_path == "/projects/hfge/screenshots"));
        assert_eq!(
            vec!["One", "Two", "Three"],
            screenshots.items.iter().map(|s| s.title.as_str()).collect::<Vec<_>>()
        );
        assert_eq!("/projects/hfge/screenshots/two", screenshots.items[1].url);
        assert_eq!(
            Some(&[0, 1, 2][..]),
            screenshots.galleries.get(&"HFGE Screenshots".to_owned())
        );
        assert_eq!(
            Some("/projects/hfge/screenshots"),
            screenshots.base_path("HFGE Screenshots")
        );
    }

    #[test]
    fn test_overwrite_and_incomplete_record() {
        let mut parser = DescriptorParser::new();
        parser.feed(
            "screenshotsTitle: G\nscreenshotsURL: /g\n\
             title: First\ntitle: Second\nimageMin: a\nimageBig: b\nurl: /g/second\n\
             title: Dangling\nimageMin: c\n",
        );
        let screenshots = parser.finish();

        assert_eq!(1, screenshots.items.len());
        assert_eq!("Second", screenshots.items[0].title);
    }

    #[test]
    fn test_empty_value_does_not_complete_record() {
        let mut parser = DescriptorParser::new();
        parser.feed("title: T\nimageMin: a\nimageBig: b\nurl\n");
        assert!(parser.finish().items.is_empty());
    }

    #[test]
    fn test_gallery_base_path_from_first_record() {
        let mut parser = DescriptorParser::new();
        parser.feed(
            "screenshotsTitle: G\nscreenshotsURL: /first\n\
             title: A\nimageMin: a\nimageBig: a\nurl: /first/a\n\
             screenshotsURL: /second\n\
             title: B\nimageMin: b\nimageBig: b\nurl: /second/b\n",
        );
        let screenshots = parser.finish();

        assert_eq!(Some("/first"), screenshots.base_path("G"));
        assert_eq!("/second", screenshots.items[1].gallery_path);
        let galleries: Vec<_> = screenshots.galleries().collect();
        assert_eq!(1, galleries.len());
        assert_eq!("/first", galleries[0].path);
        assert_eq!(2, galleries[0].screenshots.len());
    }

    #[test]
    fn test_parse_screenshots_spans_files() -> Result<()> {
        let dir = TempDir::new()?;
        fs::write(
            dir.path().join("01-gallery.txt"),
            "screenshotsTitle: HFGE Screenshots\nscreenshotsURL: /hfge\ntitle: A\nimageMin: a\n",
        )?;
        fs::write(
            dir.path().join("02-more.txt"),
            "imageBig: a\nurl: /hfge/a\nscreenshotsTitle: Other\nscreenshotsURL: /other\n\
             title: B\nimageMin: b\nimageBig: b\nurl: /other/b\n",
        )?;

        let screenshots = parse_screenshots(dir.path())?;
        let titles: Vec<_> = screenshots.galleries().map(|g| g.title.to_owned()).collect();
        assert_eq!(vec!["HFGE Screenshots", "Other"], titles);
        assert_eq!(
            1,
            screenshots.gallery_by_slug("hfge-screenshots").unwrap().screenshots.len()
        );
        assert!(screenshots.gallery_by_slug("missing").is_none());
        Ok(())
    }

    #[test]
    fn test_parse_screenshots_missing_directory() {
        assert!(parse_screenshots(Path::new("/does/not/exist")).is_err());
    }
}
