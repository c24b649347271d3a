//! Prefix partitioning of the root listing
//!
//! The root directory is listed once and each immediate child is assigned to
//! every key its uppercased name starts with. Keys are not assumed to be
//! exclusive: with overlapping keys such as `A` and `AB`, a child named
//! `abacus` lands in both buckets and is searched twice.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Default key list: digits, underscore, then the Latin alphabet
pub const DEFAULT_PREFIX_KEYS: &str =
    "1,2,3,4,5,6,7,8,9,0,_,A,B,C,D,E,F,G,H,I,J,K,L,M,N,O,P,Q,R,S,T,U,V,W,X,Y,Z";

/// Uppercased prefix token used for bucketing and output naming
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PrefixKey(String);

impl PrefixKey {
    /// Normalize a raw token; returns `None` for blank input
    pub fn new(raw: &str) -> Option<Self> {
        let token = raw.trim();
        if token.is_empty() {
            None
        } else {
            Some(Self(token.to_uppercase()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether an entry name belongs to this key (case-insensitive prefix)
    pub fn matches(&self, name: &str) -> bool {
        name.to_uppercase().starts_with(&self.0)
    }

    /// Output file name for this key: `<KEY>_<basename>`
    pub fn file_name(&self, basename: &str) -> String {
        format!("{}_{}", self.0, basename)
    }
}

impl fmt::Display for PrefixKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Split a comma-separated key list, normalizing and dropping duplicates
///
/// Order of first occurrence is preserved.
pub fn parse_prefix_keys(raw: &str) -> Vec<PrefixKey> {
    let mut keys: Vec<PrefixKey> = Vec::new();
    for key in raw.split(',').filter_map(PrefixKey::new) {
        if !keys.contains(&key) {
            keys.push(key);
        }
    }
    keys
}

/// One immediate child of the root directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateEntry {
    /// Absolute path of the child
    pub path: PathBuf,

    /// File name of the child (lossy UTF-8)
    pub name: String,
}

impl CandidateEntry {
    pub fn new(path: PathBuf) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self { path, name }
    }
}

/// List the immediate children of `root`
///
/// Any error here is fatal for the run: without the listing no partition
/// can be built.
pub fn list_children(root: &Path) -> io::Result<Vec<CandidateEntry>> {
    let mut children = Vec::new();
    for entry in fs::read_dir(root)? {
        children.push(CandidateEntry::new(entry?.path()));
    }
    Ok(children)
}

/// Candidates assigned to one key
#[derive(Debug, Clone)]
pub struct Bucket {
    pub key: PrefixKey,
    pub entries: Vec<CandidateEntry>,
}

impl Bucket {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Key → candidates mapping, one bucket per key in key order
#[derive(Debug, Clone, Default)]
pub struct PartitionMap {
    buckets: Vec<Bucket>,
}

impl PartitionMap {
    /// Look up the bucket for a key (case-insensitive)
    pub fn get(&self, key: &str) -> Option<&Bucket> {
        let key = PrefixKey::new(key)?;
        self.buckets.iter().find(|b| b.key == key)
    }

    /// All buckets, including empty ones
    pub fn buckets(&self) -> &[Bucket] {
        &self.buckets
    }

    /// Buckets with at least one candidate
    pub fn non_empty(&self) -> impl Iterator<Item = &Bucket> {
        self.buckets.iter().filter(|b| !b.is_empty())
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Consume the map, yielding the non-empty buckets
    pub fn into_non_empty(self) -> impl Iterator<Item = Bucket> {
        self.buckets.into_iter().filter(|b| !b.is_empty())
    }
}

/// Assign each child to every key its uppercased name starts with
///
/// Runs once, single-threaded, before any worker starts.
pub fn partition(children: &[CandidateEntry], keys: &[PrefixKey]) -> PartitionMap {
    let mut buckets: Vec<Bucket> = keys
        .iter()
        .map(|key| Bucket {
            key: key.clone(),
            entries: Vec::new(),
        })
        .collect();

    for child in children {
        let upper = child.name.to_uppercase();
        for bucket in buckets.iter_mut() {
            if upper.starts_with(bucket.key.as_str()) {
                bucket.entries.push(child.clone());
            }
        }
    }

    PartitionMap { buckets }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str) -> CandidateEntry {
        CandidateEntry::new(PathBuf::from("/root").join(name))
    }

    fn keys(raw: &str) -> Vec<PrefixKey> {
        parse_prefix_keys(raw)
    }

    #[test]
    fn test_parse_prefix_keys() {
        let parsed = keys(" a, b ,,A,c1 ");
        let names: Vec<&str> = parsed.iter().map(|k| k.as_str()).collect();
        assert_eq!(names, vec!["A", "B", "C1"]);
    }

    #[test]
    fn test_default_keys() {
        let parsed = keys(DEFAULT_PREFIX_KEYS);
        assert_eq!(parsed.len(), 37);
        assert_eq!(parsed[0].as_str(), "1");
        assert_eq!(parsed[10].as_str(), "_");
        assert_eq!(parsed[36].as_str(), "Z");
    }

    #[test]
    fn test_partition_case_insensitive() {
        let children = vec![entry("Apple.txt"), entry("apricot.PDF"), entry("banana.pdf")];
        let map = partition(&children, &keys("A,B"));

        let a = map.get("a").unwrap();
        assert_eq!(a.entries.len(), 2);
        let b = map.get("B").unwrap();
        assert_eq!(b.entries, vec![entry("banana.pdf")]);
    }

    #[test]
    fn test_unmatched_children_dropped() {
        let children = vec![entry("zeta"), entry(".hidden"), entry("alpha")];
        let map = partition(&children, &keys("A,B"));

        let total: usize = map.buckets().iter().map(|b| b.entries.len()).sum();
        assert_eq!(total, 1);
        assert!(map.get("B").unwrap().is_empty());
    }

    #[test]
    fn test_every_key_has_bucket() {
        let map = partition(&[], &keys("X,Y,Z"));
        assert_eq!(map.len(), 3);
        assert!(map.buckets().iter().all(Bucket::is_empty));
        assert_eq!(map.non_empty().count(), 0);
    }

    #[test]
    fn test_overlapping_keys_multi_assign() {
        let children = vec![entry("abacus"), entry("apple")];
        let map = partition(&children, &keys("A,AB"));

        assert_eq!(map.get("A").unwrap().entries.len(), 2);
        assert_eq!(map.get("AB").unwrap().entries, vec![entry("abacus")]);
    }

    #[test]
    fn test_partition_soundness() {
        let children: Vec<CandidateEntry> = ["a1", "B2", "_x", "9lives", "ünïcode", "c"]
            .iter()
            .map(|n| entry(n))
            .collect();
        let key_set = keys(DEFAULT_PREFIX_KEYS);
        let map = partition(&children, &key_set);

        for bucket in map.buckets() {
            for e in &bucket.entries {
                assert!(bucket.key.matches(&e.name), "{} in {}", e.name, bucket.key);
            }
        }
        for child in &children {
            for key in &key_set {
                let assigned = map.get(key.as_str()).unwrap().entries.contains(child);
                assert_eq!(assigned, key.matches(&child.name));
            }
        }
    }

    #[test]
    fn test_file_name() {
        let key = PrefixKey::new("q").unwrap();
        assert_eq!(key.file_name("output.csv"), "Q_output.csv");
    }
}
