//! Segment trie used by the router.
//!
//! # Responsibilities
//! - Insert classified pattern segments, one tree level per segment
//! - Search request segments depth-first with backtracking
//! - Enumerate every node that terminates a registered pattern
//!
//! # Design Decisions
//! - Each node exclusively owns its children; no parent links
//! - Insertion commits to a single child per level (exact match, then the
//!   first wildcard child); search tries every matching child in order
//! - A `*` node ends the search no matter how many segments remain

use std::fmt;

use crate::routing::pattern::Segment;

/// A node of the per-method routing trie.
#[derive(Debug, Clone)]
pub struct TrieNode {
    segment: Segment,
    pattern: Option<String>,
    children: Vec<TrieNode>,
}

impl TrieNode {
    /// Create an empty root node.
    pub fn root() -> Self {
        Self::new(Segment::Literal(String::new()))
    }

    fn new(segment: Segment) -> Self {
        Self {
            segment,
            pattern: None,
            children: Vec::new(),
        }
    }

    /// The segment this node consumes.
    pub fn segment(&self) -> &Segment {
        &self.segment
    }

    /// The full registered pattern, if a route terminates here.
    pub fn pattern(&self) -> Option<&str> {
        self.pattern.as_deref()
    }

    /// True if this node is a `:param` or `*wildcard` node.
    pub fn is_wild(&self) -> bool {
        self.segment.is_wild()
    }

    /// Child nodes in insertion order.
    pub fn children(&self) -> &[TrieNode] {
        &self.children
    }

    /// Insert `segments[depth..]` below this node, recording `pattern` at the
    /// node where the segments run out.
    pub fn insert(&mut self, pattern: &str, segments: &[Segment], depth: usize) {
        let Some(segment) = segments.get(depth) else {
            match self.pattern.as_deref() {
                Some(existing) if existing != pattern => {
                    tracing::warn!(
                        existing = %existing,
                        pattern = %pattern,
                        "Route pattern overwrites an existing registration"
                    );
                }
                _ => {}
            }
            self.pattern = Some(pattern.to_string());
            return;
        };

        let index = match self.children.iter().position(|c| &c.segment == segment) {
            Some(index) => index,
            None => match self.children.iter().position(TrieNode::is_wild) {
                Some(index) => {
                    tracing::warn!(
                        pattern = %pattern,
                        segment = %segment,
                        merged_into = %self.children[index].segment,
                        "Route segment merged into existing wildcard child"
                    );
                    index
                }
                None => {
                    self.children.push(TrieNode::new(segment.clone()));
                    self.children.len() - 1
                }
            },
        };

        self.children[index].insert(pattern, segments, depth + 1);
    }

    /// Find the first node, depth-first and left-to-right, that terminates a
    /// registered pattern for `segments[depth..]`.
    pub fn search(&self, segments: &[&str], depth: usize) -> Option<&TrieNode> {
        if depth == segments.len() || self.segment.is_catch_all() {
            return self.pattern.as_ref().map(|_| self);
        }

        let target = segments[depth];
        self.children
            .iter()
            .filter(|child| child.is_wild() || child.segment.raw_eq(target))
            .find_map(|child| child.search(segments, depth + 1))
    }

    /// Collect every node holding a pattern, in pre-order.
    pub fn traverse(&self) -> Vec<&TrieNode> {
        let mut nodes = Vec::new();
        self.collect(&mut nodes);
        nodes
    }

    fn collect<'a>(&'a self, nodes: &mut Vec<&'a TrieNode>) {
        if self.pattern.is_some() {
            nodes.push(self);
        }
        for child in &self.children {
            child.collect(nodes);
        }
    }
}

impl Default for TrieNode {
    fn default() -> Self {
        Self::root()
    }
}

impl fmt::Display for TrieNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "node{{pattern={}, part={}, wild={}}}",
            self.pattern.as_deref().unwrap_or(""),
            self.segment.as_raw(),
            self.is_wild()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::pattern::{parse_pattern, split_segments};

    fn trie(patterns: &[&str]) -> TrieNode {
        let mut root = TrieNode::root();
        for pattern in patterns {
            root.insert(pattern, &parse_pattern(pattern), 0);
        }
        root
    }

    fn lookup<'a>(root: &'a TrieNode, path: &str) -> Option<&'a str> {
        root.search(&split_segments(path), 0).and_then(TrieNode::pattern)
    }

    #[test]
    fn test_insert_shares_prefixes() {
        let root = trie(&["/p/go/doc", "/p/go/intro", "/p/rust"]);
        assert_eq!(root.children().len(), 1);
        let p = &root.children()[0];
        assert_eq!(p.children().len(), 2);
        assert_eq!(p.children()[0].children().len(), 2);
    }

    #[test]
    fn test_intermediate_nodes_do_not_match() {
        let root = trie(&["/p/:lang/doc"]);
        assert_eq!(lookup(&root, "/p/go/doc"), Some("/p/:lang/doc"));
        assert_eq!(lookup(&root, "/p/go"), None);
        assert_eq!(lookup(&root, "/p"), None);
    }

    #[test]
    fn test_wildcard_short_circuits() {
        let root = trie(&["/static/*filepath"]);
        assert_eq!(lookup(&root, "/static/a"), Some("/static/*filepath"));
        assert_eq!(lookup(&root, "/static/css/a/b.css"), Some("/static/*filepath"));
        assert_eq!(lookup(&root, "/static"), None);
    }

    #[test]
    fn test_search_backtracks_across_candidates() {
        // The literal branch is tried first and fails deeper down, the param
        // branch then succeeds.
        let root = trie(&["/p/go/doc", "/p/:lang/intro"]);
        assert_eq!(lookup(&root, "/p/go/intro"), Some("/p/:lang/intro"));
        assert_eq!(lookup(&root, "/p/go/doc"), Some("/p/go/doc"));
    }

    #[test]
    fn test_insert_merges_into_first_wildcard_child() {
        let root = trie(&["/user/:id/profile", "/user/:name/posts"]);
        let user = &root.children()[0];
        assert_eq!(user.children().len(), 1);
        assert_eq!(user.children()[0].segment(), &Segment::Param("id".into()));
        assert_eq!(lookup(&root, "/user/42/posts"), Some("/user/:name/posts"));
    }

    #[test]
    fn test_literal_after_wildcard_is_merged() {
        let root = trie(&["/p/:lang/doc", "/p/go/doc"]);
        let p = &root.children()[0];
        assert_eq!(p.children().len(), 1);
        // The later registration took over the shared terminal node.
        assert_eq!(lookup(&root, "/p/rust/doc"), Some("/p/go/doc"));
        assert_eq!(root.traverse().len(), 1);
    }

    #[test]
    fn test_reinsert_is_idempotent() {
        let mut root = trie(&["/a/b"]);
        root.insert("/a/b", &parse_pattern("/a/b"), 0);
        assert_eq!(root.traverse().len(), 1);
        assert_eq!(root.children()[0].children().len(), 1);
    }

    #[test]
    fn test_traverse_is_preorder() {
        let root = trie(&["/b/c", "/", "/b", "/a"]);
        let patterns: Vec<_> = root.traverse().into_iter().filter_map(TrieNode::pattern).collect();
        assert_eq!(patterns, vec!["/", "/b", "/b/c", "/a"]);
    }

    #[test]
    fn test_display() {
        let root = trie(&["/p/:lang"]);
        let lang = &root.children()[0].children()[0];
        assert_eq!(lang.to_string(), "node{pattern=/p/:lang, part=:lang, wild=true}");
    }
}
