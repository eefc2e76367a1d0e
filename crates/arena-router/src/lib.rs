//! arena-router: Zero-dependency Radix Trie path router
//!
//! Shared by both arena services. Routes carry an arbitrary value (a
//! handler, an enum tag, an id) instead of a fixed handler type.
//!
//! ## Features
//! - O(k) path lookup where k = number of path segments
//! - Static paths: `/health`, `/api/stats`
//! - Parameters: `/players/:name`
//! - Wildcards: `/static/*path`, `/*`
//! - Method-specific trees plus an "any method" tree
//!
//! ## Priority
//! 1. Method-specific tree before the any-method tree
//! 2. Within a tree: static, then parameter, then wildcard
//!
//! ## Example
//! ```
//! use arena_router::Router;
//!
//! let mut router = Router::new();
//! router.insert("GET", "/api/stats", "stats");
//! router.any("/play", "play");
//! router.any("/static/*path", "assets");
//!
//! let m = router.find("POST", "/play").unwrap();
//! assert_eq!(*m.value, "play");
//!
//! let m = router.find("GET", "/static/js/game.js").unwrap();
//! assert_eq!(m.param("path"), Some("js/game.js"));
//! ```

use std::collections::HashMap;

/// Route match result
#[derive(Debug, Clone, PartialEq)]
pub struct Match<'r, T> {
    /// The routed value
    pub value: &'r T,
    /// Captured path parameters as (name, value) pairs
    pub params: Vec<(String, String)>,
}

impl<'r, T> Match<'r, T> {
    /// Look up a captured parameter by name
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Get params as HashMap for convenient access
    pub fn params_map(&self) -> HashMap<String, String> {
        self.params.iter().cloned().collect()
    }
}

#[derive(Debug)]
struct Node<T> {
    children: HashMap<String, Node<T>>,
    param_child: Option<Box<ParamNode<T>>>,
    wildcard_child: Option<Box<WildcardNode<T>>>,
    value: Option<T>,
}

impl<T> Default for Node<T> {
    fn default() -> Self {
        Self {
            children: HashMap::new(),
            param_child: None,
            wildcard_child: None,
            value: None,
        }
    }
}

#[derive(Debug)]
struct ParamNode<T> {
    name: String,
    node: Node<T>,
}

#[derive(Debug)]
struct WildcardNode<T> {
    name: String,
    value: T,
}

/// Radix trie router keyed by upper-cased method name
#[derive(Debug)]
pub struct Router<T> {
    trees: HashMap<String, Node<T>>,
    any: Node<T>,
}

impl<T> Default for Router<T> {
    fn default() -> Self {
        Self {
            trees: HashMap::new(),
            any: Node::default(),
        }
    }
}

impl<T> Router<T> {
    /// Create a new router
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a route for one method. Re-inserting a path replaces its value.
    pub fn insert(&mut self, method: &str, path: &str, value: T) {
        let tree = self.trees.entry(method.to_uppercase()).or_default();
        Self::insert_node(tree, &segments(path), value);
    }

    /// Insert a route that matches every method
    pub fn any(&mut self, path: &str, value: T) {
        Self::insert_node(&mut self.any, &segments(path), value);
    }

    fn insert_node(node: &mut Node<T>, segments: &[&str], value: T) {
        let Some((&segment, rest)) = segments.split_first() else {
            node.value = Some(value);
            return;
        };

        if let Some(name) = segment.strip_prefix(':') {
            let param = node.param_child.get_or_insert_with(|| {
                Box::new(ParamNode {
                    name: name.to_string(),
                    node: Node::default(),
                })
            });
            Self::insert_node(&mut param.node, rest, value);
        } else if let Some(name) = segment.strip_prefix('*') {
            // Wildcard swallows the remainder; anything after it is ignored
            let wildcard_name = if name.is_empty() { "*" } else { name };
            node.wildcard_child = Some(Box::new(WildcardNode {
                name: wildcard_name.to_string(),
                value,
            }));
        } else {
            let child = node.children.entry(segment.to_string()).or_default();
            Self::insert_node(child, rest, value);
        }
    }

    /// Find a matching route, trying the method's own tree before the any-method tree
    pub fn find(&self, method: &str, path: &str) -> Option<Match<'_, T>> {
        let segments = segments(path);
        let mut params = Vec::new();

        if let Some(tree) = self.trees.get(&method.to_uppercase()) {
            if let Some(m) = Self::find_node(tree, &segments, &mut params) {
                return Some(m);
            }
            params.clear();
        }

        Self::find_node(&self.any, &segments, &mut params)
    }

    fn find_node<'r>(
        node: &'r Node<T>,
        segments: &[&str],
        params: &mut Vec<(String, String)>,
    ) -> Option<Match<'r, T>> {
        let Some((&segment, rest)) = segments.split_first() else {
            if let Some(value) = node.value.as_ref() {
                return Some(Match {
                    value,
                    params: params.clone(),
                });
            }
            // A bare wildcard also matches the empty remainder
            return node.wildcard_child.as_ref().map(|wildcard| {
                let mut params = params.clone();
                params.push((wildcard.name.clone(), String::new()));
                Match {
                    value: &wildcard.value,
                    params,
                }
            });
        };

        if let Some(child) = node.children.get(segment) {
            if let Some(m) = Self::find_node(child, rest, params) {
                return Some(m);
            }
        }

        if let Some(ref param) = node.param_child {
            params.push((param.name.clone(), segment.to_string()));
            if let Some(m) = Self::find_node(&param.node, rest, params) {
                return Some(m);
            }
            params.pop();
        }

        if let Some(ref wildcard) = node.wildcard_child {
            let mut params = params.clone();
            params.push((wildcard.name.clone(), segments.join("/")));
            return Some(Match {
                value: &wildcard.value,
                params,
            });
        }

        None
    }
}

/// Empty segments are dropped: `/play/`, `//play` and `/play` are one path,
/// and a bare mount like `/static` reaches `/static/*path` with an empty
/// remainder. No redirects are issued for either.
fn segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}
