//! Loads the project (`skald.yaml`) and theme (`templates/theme.yaml`) files
//! into a resolved [`Config`].

use anyhow::{anyhow, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use url::Url;

const PROJECT_FILE: &str = "skald.yaml";

#[derive(Deserialize)]
struct PageSize(usize);
impl Default for PageSize {
    fn default() -> Self {
        PageSize(30)
    }
}

#[derive(Deserialize)]
struct HomePosts(usize);
impl Default for HomePosts {
    fn default() -> Self {
        HomePosts(3)
    }
}

#[derive(Deserialize)]
struct HomeScreenshots(usize);
impl Default for HomeScreenshots {
    fn default() -> Self {
        HomeScreenshots(6)
    }
}

#[derive(Deserialize)]
struct BlogBase(String);
impl Default for BlogBase {
    fn default() -> Self {
        BlogBase(String::from("blog"))
    }
}

#[derive(Deserialize)]
struct HomeGallery(String);
impl Default for HomeGallery {
    fn default() -> Self {
        HomeGallery(String::from("hfge-screenshots"))
    }
}

/// The feed author.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Author {
    pub name: String,

    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Deserialize)]
struct Project {
    pub site_root: Url,
    pub title: String,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub author: Option<Author>,

    #[serde(default)]
    pub blog_base: BlogBase,

    #[serde(default)]
    pub page_size: PageSize,

    #[serde(default)]
    pub home_gallery: HomeGallery,

    #[serde(default)]
    pub home_posts: HomePosts,

    #[serde(default)]
    pub home_screenshots: HomeScreenshots,
}

#[derive(Deserialize)]
struct ThemePage {
    output: PathBuf,
    template: Vec<PathBuf>,
}

#[derive(Deserialize)]
struct ThemeFile {
    post: Vec<PathBuf>,
    overview: Vec<PathBuf>,
    topic_overview: Vec<PathBuf>,
    year_overview: Vec<PathBuf>,
    gallery: Vec<PathBuf>,
    screenshot: Vec<PathBuf>,
    home: Vec<PathBuf>,

    #[serde(default)]
    pages: Vec<ThemePage>,
}

/// A standalone page rendered from a template without content data, such as
/// the contact or 404 page.
#[derive(Clone, Debug, PartialEq)]
pub struct CorePage {
    /// The output file, relative to the output directory.
    pub output: PathBuf,
    pub template: Vec<PathBuf>,
}

/// Template file lists, resolved against the theme directory. Each list is
/// concatenated before parsing, so a shared file of `define`d partials can be
/// listed ahead of each page template.
#[derive(Clone, Debug, PartialEq)]
pub struct Theme {
    pub post: Vec<PathBuf>,
    pub overview: Vec<PathBuf>,
    pub topic_overview: Vec<PathBuf>,
    pub year_overview: Vec<PathBuf>,
    pub gallery: Vec<PathBuf>,
    pub screenshot: Vec<PathBuf>,
    pub home: Vec<PathBuf>,
    pub pages: Vec<CorePage>,
}

impl Theme {
    fn resolve(theme_dir: &Path, file: ThemeFile) -> Theme {
        let resolve = |paths: Vec<PathBuf>| -> Vec<PathBuf> {
            paths.iter().map(|relpath| theme_dir.join(relpath)).collect()
        };
        Theme {
            post: resolve(file.post),
            overview: resolve(file.overview),
            topic_overview: resolve(file.topic_overview),
            year_overview: resolve(file.year_overview),
            gallery: resolve(file.gallery),
            screenshot: resolve(file.screenshot),
            home: resolve(file.home),
            pages: file
                .pages
                .into_iter()
                .map(|page| CorePage {
                    output: page.output,
                    template: resolve(page.template),
                })
                .collect(),
        }
    }
}

pub struct Config {
    pub site_root: Url,
    pub title: String,
    pub description: Option<String>,
    pub author: Option<Author>,

    /// The blog's site-relative base, e.g. `/blog`.
    pub blog_base: String,
    pub page_size: usize,

    /// The sanitized title of the gallery shown on the homepage.
    pub home_gallery: String,
    pub home_posts: usize,
    pub home_screenshots: usize,

    pub posts_source_directory: PathBuf,
    pub screenshots_source_directory: PathBuf,
    pub static_source_directory: PathBuf,
    pub static_root_source_directory: PathBuf,
    pub output_directory: PathBuf,
    pub theme: Theme,
}

impl Config {
    /// Looks for `skald.yaml` in `dir` and then in each parent directory.
    pub fn from_directory(dir: &Path, output_directory: Option<&Path>) -> Result<Config> {
        let path = dir.join(PROJECT_FILE);
        if path.exists() {
            match Config::from_project_file(&path, output_directory) {
                Ok(config) => Ok(config),
                Err(e) => Err(anyhow!("Loading configuration: {:?}", e)),
            }
        } else {
            match dir.parent() {
                Some(dir) => Config::from_directory(dir, output_directory),
                None => Err(anyhow!(
                    "Could not find `{}` in any parent directory",
                    PROJECT_FILE
                )),
            }
        }
    }

    /// Loads the project file at `path`. Source directories and the theme are
    /// resolved against the project file's directory; the output directory
    /// defaults to `{project}/output`.
    pub fn from_project_file(path: &Path, output_directory: Option<&Path>) -> Result<Config> {
        use crate::util::open;
        let project: Project = serde_yaml::from_reader(open(path, "project")?)?;
        match path.parent() {
            None => Err(anyhow!(
                "Can't get parent directory for provided project file path '{:?}'",
                path
            )),
            Some(project_root) => {
                if project.page_size.0 == 0 {
                    return Err(anyhow!("`page_size` must be at least 1"));
                }
                if project.site_root.cannot_be_a_base() {
                    return Err(anyhow!(
                        "`site_root` must be an absolute URL, found `{}`",
                        project.site_root
                    ));
                }

                let theme_dir = project_root.join("templates");
                let theme_file = open(&theme_dir.join("theme.yaml"), "theme")?;
                let theme: ThemeFile = serde_yaml::from_reader(theme_file)?;
                Ok(Config {
                    site_root: project.site_root,
                    title: project.title,
                    description: project.description,
                    author: project.author,
                    blog_base: crate::util::dir_url(&[&project.blog_base.0])
                        .trim_end_matches('/')
                        .to_owned(),
                    page_size: project.page_size.0,
                    home_gallery: project.home_gallery.0,
                    home_posts: project.home_posts.0,
                    home_screenshots: project.home_screenshots.0,
                    posts_source_directory: project_root.join("blog-posts"),
                    screenshots_source_directory: project_root.join("screenshots"),
                    static_source_directory: project_root.join("static"),
                    static_root_source_directory: project_root.join("static_root"),
                    output_directory: match output_directory {
                        Some(dir) => dir.to_owned(),
                        None => project_root.join("output"),
                    },
                    theme: Theme::resolve(&theme_dir, theme),
                })
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const THEME: &str = "post: [base.html, post.html]\n\
                         overview: [base.html, overview.html]\n\
                         topic_overview: [base.html, topic.html]\n\
                         year_overview: [base.html, year.html]\n\
                         gallery: [gallery.html]\n\
                         screenshot: [screenshot.html]\n\
                         home: [home.html]\n\
                         pages:\n  - output: contact/index.html\n    template: [contact.html]\n";

    fn project(yaml: &str) -> Result<TempDir> {
        let dir = TempDir::new()?;
        fs::write(dir.path().join(PROJECT_FILE), yaml)?;
        fs::create_dir(dir.path().join("templates"))?;
        fs::write(dir.path().join("templates").join("theme.yaml"), THEME)?;
        Ok(dir)
    }

    #[test]
    fn test_defaults() -> Result<()> {
        let dir = project("site_root: https://www.example.net/\ntitle: Example\n")?;
        let config = Config::from_directory(dir.path(), None)?;

        assert_eq!("/blog", config.blog_base);
        assert_eq!(30, config.page_size);
        assert_eq!("hfge-screenshots", config.home_gallery);
        assert_eq!(3, config.home_posts);
        assert_eq!(6, config.home_screenshots);
        assert_eq!(None, config.author);
        assert_eq!(dir.path().join("output"), config.output_directory);
        assert_eq!(dir.path().join("blog-posts"), config.posts_source_directory);
        assert_eq!(
            vec![
                dir.path().join("templates").join("base.html"),
                dir.path().join("templates").join("post.html"),
            ],
            config.theme.post
        );
        assert_eq!(PathBuf::from("contact/index.html"), config.theme.pages[0].output);
        Ok(())
    }

    #[test]
    fn test_overrides_and_parent_lookup() -> Result<()> {
        let dir = project(
            "site_root: https://www.example.net/\ntitle: Example\n\
             blog_base: /journal/\npage_size: 5\n\
             author:\n  name: Jane\n",
        )?;
        let nested = dir.path().join("blog-posts");
        fs::create_dir(&nested)?;
        let out = dir.path().join("public");

        let config = Config::from_directory(&nested, Some(&out))?;
        assert_eq!("/journal", config.blog_base);
        assert_eq!(5, config.page_size);
        assert_eq!(Some("Jane"), config.author.as_ref().map(|a| a.name.as_str()));
        assert_eq!(out, config.output_directory);
        Ok(())
    }

    #[test]
    fn test_rejects_zero_page_size() -> Result<()> {
        let dir = project("site_root: https://www.example.net/\ntitle: Example\npage_size: 0\n")?;
        assert!(Config::from_directory(dir.path(), None).is_err());
        Ok(())
    }
}
