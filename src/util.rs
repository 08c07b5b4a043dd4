use anyhow::{anyhow, Result};
use std::fs::File;
use std::path::{Path, PathBuf};

pub fn open(path: &Path, kind: &str) -> Result<File> {
    match File::open(path) {
        Err(e) => Err(anyhow!("Opening {} file `{}`: {}", kind, path.display(), e)),
        Ok(file) => Ok(file),
    }
}

/// Joins URL path segments into a site-relative directory URL with a leading
/// and trailing slash. Segments may themselves contain slashes; empty
/// components are dropped, so `dir_url(&["/blog/", "topic", "rust"])` is
/// `/blog/topic/rust/`.
pub fn dir_url(segments: &[&str]) -> String {
    let mut url = String::from("/");
    for component in components(segments) {
        url.push_str(component);
        url.push('/');
    }
    url
}

/// Maps a site-relative directory URL onto the output tree: `/blog/rust/`
/// under `root` becomes `{root}/blog/rust`. `.` and `..` components are
/// dropped so the result never leaves `root`.
pub fn output_dir(root: &Path, url: &str) -> PathBuf {
    components(&[url]).fold(root.to_owned(), |dir, component| dir.join(component))
}

fn components<'a>(segments: &'a [&'a str]) -> impl Iterator<Item = &'a str> {
    segments
        .iter()
        .flat_map(|segment| segment.split('/'))
        .filter(|component| !component.is_empty() && *component != "." && *component != "..")
}
