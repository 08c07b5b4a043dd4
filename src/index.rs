//! Secondary indices over parsed content. A [`GroupIndex`] maps a group key
//! (topic name, year, gallery title) to the positions of its items in the
//! owning `Vec`, keeping both key and item order as first encountered.
//! Display order is a separate, derived view: see [`nav_entries`].

use crate::post::Post;
use crate::util::dir_url;
use crate::value::{number, object, string};
use chrono::Datelike;
use gtmpl::Value;
use std::collections::HashMap;
use std::fmt::Display;
use std::hash::Hash;

/// Groups item positions by key in insertion order.
#[derive(Clone, Debug)]
pub struct GroupIndex<K> {
    positions: HashMap<K, usize>,
    groups: Vec<(K, Vec<usize>)>,
}

impl<K> Default for GroupIndex<K> {
    fn default() -> Self {
        GroupIndex {
            positions: HashMap::new(),
            groups: Vec::new(),
        }
    }
}

impl<K: Eq + Hash + Clone> GroupIndex<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `item` to the group for `key`, creating the group if needed.
    /// Inserting the same item twice in a row (a post listing a topic twice)
    /// is a no-op.
    pub fn insert(&mut self, key: K, item: usize) {
        match self.positions.get(&key) {
            Some(&position) => {
                let group = &mut self.groups[position].1;
                if group.last() != Some(&item) {
                    group.push(item);
                }
            }
            None => {
                self.positions.insert(key.clone(), self.groups.len());
                self.groups.push((key, vec![item]));
            }
        }
    }

    /// Returns the item positions grouped under `key`.
    pub fn get(&self, key: &K) -> Option<&[usize]> {
        self.positions
            .get(key)
            .map(|&position| self.groups[position].1.as_slice())
    }

    /// Iterates groups in the order their keys were first inserted.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &[usize])> {
        self.groups.iter().map(|(key, items)| (key, items.as_slice()))
    }
}

/// A navigation link to a group: its display name, overview URL and item
/// count.
#[derive(Clone, Debug, PartialEq)]
pub struct NavEntry {
    pub name: String,
    pub url: String,
    pub count: usize,
}

impl From<&NavEntry> for Value {
    fn from(entry: &NavEntry) -> Value {
        object(vec![
            ("name", string(&entry.name)),
            ("url", string(&entry.url)),
            ("count", number(entry.count)),
        ])
    }
}

/// Builds one [`NavEntry`] per group, sorted by name ignoring case. The sort
/// is stable, so names equal up to case keep insertion order.
pub fn nav_entries<K, F>(index: &GroupIndex<K>, url: F) -> Vec<NavEntry>
where
    K: Eq + Hash + Clone + Display,
    F: Fn(&K) -> String,
{
    let mut entries: Vec<NavEntry> = index
        .iter()
        .map(|(key, items)| NavEntry {
            name: key.to_string(),
            url: url(key),
            count: items.len(),
        })
        .collect();
    entries.sort_by_cached_key(|entry| entry.name.to_uppercase());
    entries
}

/// The topic and year indices over a chronologically ordered slice of posts.
#[derive(Clone, Debug, Default)]
pub struct BlogIndex {
    /// Topic name (as written) to post positions.
    pub topics: GroupIndex<String>,

    /// Publication year to post positions. Posts without a `published` date
    /// are not indexed by year.
    pub years: GroupIndex<i32>,
}

impl BlogIndex {
    /// Indexes `posts`: a post with N topics lands in N topic groups and, if
    /// dated, in exactly one year group.
    pub fn new(posts: &[Post]) -> BlogIndex {
        let mut index = BlogIndex::default();
        for (position, post) in posts.iter().enumerate() {
            for topic in &post.topics {
                index.topics.insert(topic.name.clone(), position);
            }
            match post.published {
                Some(date) => index.years.insert(date.year(), position),
                None => {
                    log!("warn"; "`{}` has no publication year; left out of the year index", post.source.display())
                }
            }
        }
        index
    }

    /// Topic navigation, sorted by name.
    pub fn topic_nav(&self, blog_base: &str) -> Vec<NavEntry> {
        nav_entries(&self.topics, |name| {
            dir_url(&[blog_base, "topic", &crate::sanitize::sanitize(name)])
        })
    }

    /// Year navigation, sorted by name.
    pub fn year_nav(&self, blog_base: &str) -> Vec<NavEntry> {
        nav_entries(&self.years, |year| {
            dir_url(&[blog_base, "year", &year.to_string()])
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::post::test::post;

    #[test]
    fn test_group_index_keeps_insertion_order() {
        let mut index = GroupIndex::new();
        index.insert("b".to_owned(), 0);
        index.insert("a".to_owned(), 1);
        index.insert("b".to_owned(), 2);
        index.insert("b".to_owned(), 2);

        let groups: Vec<_> = index.iter().map(|(k, v)| (k.as_str(), v.to_vec())).collect();
        assert_eq!(vec![("b", vec![0, 2]), ("a", vec![1])], groups);
        assert_eq!(Some(&[1][..]), index.get(&"a".to_owned()));
        assert_eq!(None, index.get(&"c".to_owned()));
        assert_eq!(2, index.iter().count());
    }

    #[test]
    fn test_topic_grouping() {
        let posts = vec![
            post("First", "2020-01-01", &["x", "y"]),
            post("Second", "2020-02-01", &["y", "z"]),
        ];
        let index = BlogIndex::new(&posts);

        assert_eq!(Some(&[0][..]), index.topics.get(&"x".to_owned()));
        assert_eq!(Some(&[0, 1][..]), index.topics.get(&"y".to_owned()));
        assert_eq!(Some(&[1][..]), index.topics.get(&"z".to_owned()));

        let groups_with_first: Vec<_> = index
            .topics
            .iter()
            .filter(|(_, items)| items.contains(&0))
            .map(|(topic, _)| topic.as_str())
            .collect();
        assert_eq!(vec!["x", "y"], groups_with_first);
    }

    #[test]
    fn test_year_grouping() {
        let posts = vec![
            post("Old", "2020-12-31", &[]),
            post("New", "2021-05-01", &[]),
            post("Undated", "someday", &[]),
        ];
        let index = BlogIndex::new(&posts);

        assert_eq!(Some(&[1][..]), index.years.get(&2021));
        assert_eq!(Some(&[0][..]), index.years.get(&2020));
        let years_with_new: Vec<_> = index
            .years
            .iter()
            .filter(|(_, items)| items.contains(&1))
            .map(|(year, _)| *year)
            .collect();
        assert_eq!(vec![2021], years_with_new);
        assert!(index.years.iter().all(|(_, items)| !items.contains(&2)));
    }

    #[test]
    fn test_nav_sorted_case_insensitively() {
        let posts = vec![post("Fruit", "2021-01-01", &["banana", "Apple"])];
        let nav = BlogIndex::new(&posts).topic_nav("/blog");

        assert_eq!(
            vec![
                NavEntry {
                    name: "Apple".to_owned(),
                    url: "/blog/topic/apple/".to_owned(),
                    count: 1,
                },
                NavEntry {
                    name: "banana".to_owned(),
                    url: "/blog/topic/banana/".to_owned(),
                    count: 1,
                },
            ],
            nav
        );
    }

    #[test]
    fn test_year_nav() {
        let posts = vec![
            post("A", "2021-01-01", &[]),
            post("B", "2019-01-01", &[]),
            post("C", "2021-03-01", &[]),
        ];
        let nav = BlogIndex::new(&posts).year_nav("/blog");
        let names: Vec<_> = nav.iter().map(|e| (e.name.as_str(), e.count)).collect();
        assert_eq!(vec![("2019", 1), ("2021", 2)], names);
        assert_eq!("/blog/year/2021/", nav[1].url);
    }
}
