//! The library code for the `skald` static site generator. A site is a blog
//! of markdown posts plus screenshot galleries described by plain-text
//! descriptor files. Building it breaks down into:
//!
//! 1. Parsing posts from source files on disk ([`crate::parser`]) and
//!    screenshot descriptors ([`crate::screenshot`])
//! 2. Indexing the posts by topic and year ([`crate::index`])
//! 3. Converting everything into output files on disk ([`crate::write`]) and
//!    an Atom feed ([`crate::feed`])
//!
//! The third step creates, for each index (all posts, each topic, each year),
//! a group of overview pages: the index is paginated into pages of a
//! configurable number of posts, each page listing its posts newest first.
//! Every page is a template applied to a value and written to disk.
//!
//! [`crate::build`] ties the steps together into independent phases.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]

#[macro_use]
pub mod log;

pub mod build;
pub mod config;
pub mod feed;
pub mod frontmatter;
pub mod index;
pub mod markdown;
pub mod paginate;
pub mod parser;
pub mod post;
pub mod sanitize;
pub mod screenshot;
pub mod tag;
pub mod util;
pub mod value;
pub mod write;
