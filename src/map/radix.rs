//! Radix tree over path segments.
//!
//! Each node represents a path segment:
//! - Static segments (e.g. `users`) match exactly
//! - Parameter segments (e.g. `<int:id>`) match any segment their converter
//!   accepts; parameter children are keyed by converter, not by name, so
//!   `/users/<id>` and `/users/<user_id>/posts` share a node
//! - Rules are stored at terminal nodes
//!
//! Unlike a first-match router, a search returns every terminal node the path
//! reaches (static branches first). The rule table needs all of them to tell
//! "not found" apart from "method not allowed" and to apply trailing-slash
//! handling.

use serde_json::Value;
use std::sync::Arc;

use crate::rule::{Converter, Rule, Segment};

/// Terminal node reached by a search, with the converted parameter values in
/// path order.
pub(crate) struct Candidate<'a> {
    pub(crate) rules: &'a [Arc<Rule>],
    pub(crate) values: Vec<Value>,
}

#[derive(Clone, Default)]
struct RadixNode {
    /// Static text of this node (empty for parameter nodes and the root)
    segment: String,
    /// Converter if this is a parameter node
    converter: Option<Converter>,
    /// Rules ending at this node, in insertion order
    rules: Vec<Arc<Rule>>,
    children: Vec<RadixNode>,
    param_children: Vec<RadixNode>,
}

impl RadixNode {
    fn new_static(segment: &str) -> Self {
        Self {
            segment: segment.to_string(),
            ..Self::default()
        }
    }

    fn new_param(converter: Converter) -> Self {
        Self {
            converter: Some(converter),
            ..Self::default()
        }
    }

    fn insert(&mut self, segments: &[Segment], rule: Arc<Rule>) {
        let Some((first, remaining)) = segments.split_first() else {
            self.rules.push(rule);
            return;
        };

        match first {
            Segment::Static(text) => {
                if let Some(child) = self.children.iter_mut().find(|c| &c.segment == text) {
                    child.insert(remaining, rule);
                    return;
                }
                let mut child = RadixNode::new_static(text);
                child.insert(remaining, rule);
                self.children.push(child);
            }
            Segment::Param { converter, .. } => {
                if let Some(child) = self
                    .param_children
                    .iter_mut()
                    .find(|c| c.converter == Some(*converter))
                {
                    child.insert(remaining, rule);
                    return;
                }
                let mut child = RadixNode::new_param(*converter);
                child.insert(remaining, rule);
                self.param_children.push(child);
            }
        }
    }

    fn search<'a>(
        &'a self,
        segments: &[&str],
        values: &mut Vec<Value>,
        out: &mut Vec<Candidate<'a>>,
    ) {
        let Some((segment, remaining)) = segments.split_first() else {
            if !self.rules.is_empty() {
                out.push(Candidate {
                    rules: &self.rules,
                    values: values.clone(),
                });
            }
            return;
        };

        for child in &self.children {
            if child.segment == *segment {
                child.search(remaining, values, out);
            }
        }

        for child in &self.param_children {
            let Some(converter) = child.converter else {
                continue;
            };
            if let Some(value) = converter.to_value(segment) {
                values.push(value);
                child.search(remaining, values, out);
                // Backtrack before trying the next converter
                values.pop();
            }
        }
    }
}

/// Segment tree holding every rule of a [`UrlMap`](super::UrlMap).
#[derive(Clone, Default)]
pub(crate) struct RadixTree {
    root: RadixNode,
}

impl RadixTree {
    pub(crate) fn insert(&mut self, rule: Arc<Rule>) {
        let segments = rule.template().segments().to_vec();
        self.root.insert(&segments, rule);
    }

    /// All terminal nodes reachable by `segments`, static branches first.
    pub(crate) fn candidates(&self, segments: &[&str]) -> Vec<Candidate<'_>> {
        let mut out = Vec::new();
        let mut values = Vec::with_capacity(segments.len());
        self.root.search(segments, &mut values, &mut out);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::RuleOptions;

    fn tree(rules: &[(&str, &str)]) -> RadixTree {
        let mut tree = RadixTree::default();
        for (path, endpoint) in rules {
            let rule = Rule::new(path, ["GET"], *endpoint, RuleOptions::default()).unwrap();
            tree.insert(Arc::new(rule));
        }
        tree
    }

    fn endpoints(tree: &RadixTree, path: &str) -> Vec<String> {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        tree.candidates(&segments)
            .iter()
            .flat_map(|c| c.rules.iter().map(|r| r.endpoint().to_string()))
            .collect()
    }

    #[test]
    fn test_radix_static_route() {
        let tree = tree(&[("/health", "health")]);
        assert_eq!(endpoints(&tree, "/health"), vec!["health"]);
        assert!(endpoints(&tree, "/other").is_empty());
    }

    #[test]
    fn test_radix_root_route() {
        let tree = tree(&[("/", "index"), ("/a", "a")]);
        assert_eq!(endpoints(&tree, "/"), vec!["index"]);
    }

    #[test]
    fn test_radix_static_before_param() {
        let tree = tree(&[("/users/<id>", "get_user"), ("/users/me", "me")]);
        assert_eq!(endpoints(&tree, "/users/me"), vec!["me", "get_user"]);
        assert_eq!(endpoints(&tree, "/users/7"), vec!["get_user"]);
    }

    #[test]
    fn test_radix_converter_filters_segments() {
        let tree = tree(&[("/items/<int:id>", "by_id"), ("/items/<slug>", "by_slug")]);
        assert_eq!(endpoints(&tree, "/items/12"), vec!["by_id", "by_slug"]);
        assert_eq!(endpoints(&tree, "/items/abc"), vec!["by_slug"]);
    }

    #[test]
    fn test_radix_collects_values_in_order() {
        let tree = tree(&[("/users/<user_id>/posts/<int:post_id>", "get_post")]);
        let candidates = tree.candidates(&["users", "alice", "posts", "9"]);
        assert_eq!(candidates.len(), 1);
        assert_eq!(
            candidates[0].values,
            vec![Value::from("alice"), Value::from(9u64)]
        );
    }
}
