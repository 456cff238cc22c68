//! Place-name normalization and the prefix trie used for autocomplete.
//!
//! Names are stored in their normalized form: ASCII letters and spaces only,
//! lowercased, with every other character dropped. The same [`normalize`]
//! function is applied when names are inserted and when they are looked up, so
//! a query only has to agree with a stored name after normalization.

use std::collections::BTreeMap;

/// Normalize a display name into its index key.
pub fn normalize(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphabetic() || *c == ' ')
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Handle of a node inside the trie arena.
type NodeHandle = usize;

const ROOT: NodeHandle = 0;

#[derive(Debug, Clone, Default)]
struct TrieNode {
    is_key: bool,
    children: BTreeMap<char, NodeHandle>,
}

/// Prefix tree over normalized names.
///
/// Nodes live in a single arena and refer to their children by index. Children
/// are kept ordered so enumeration is deterministic.
#[derive(Debug, Clone)]
pub struct Trie {
    nodes: Vec<TrieNode>,
    keys: usize,
}

impl Default for Trie {
    fn default() -> Self {
        Self::new()
    }
}

impl Trie {
    pub fn new() -> Self {
        Self {
            nodes: vec![TrieNode::default()],
            keys: 0,
        }
    }

    /// Number of distinct keys stored.
    pub fn len(&self) -> usize {
        self.keys
    }

    pub fn is_empty(&self) -> bool {
        self.keys == 0
    }

    /// Insert a key. Returns `true` when the key was not present before.
    pub fn insert(&mut self, key: &str) -> bool {
        let mut current = ROOT;
        for ch in key.chars() {
            current = match self.nodes[current].children.get(&ch) {
                Some(&child) => child,
                None => {
                    let child = self.nodes.len();
                    self.nodes.push(TrieNode::default());
                    self.nodes[current].children.insert(ch, child);
                    child
                }
            };
        }

        let node = &mut self.nodes[current];
        if node.is_key {
            false
        } else {
            node.is_key = true;
            self.keys += 1;
            true
        }
    }

    /// Whether `key` was inserted as a complete key.
    pub fn contains(&self, key: &str) -> bool {
        self.find(key)
            .map(|handle| self.nodes[handle].is_key)
            .unwrap_or(false)
    }

    /// All stored keys starting with `prefix`, in lexicographic order.
    pub fn keys_with_prefix(&self, prefix: &str) -> Vec<String> {
        let Some(start) = self.find(prefix) else {
            return Vec::new();
        };

        let mut keys = Vec::new();
        let mut stack = vec![(start, prefix.to_string())];
        while let Some((handle, key)) = stack.pop() {
            let node = &self.nodes[handle];
            if node.is_key {
                keys.push(key.clone());
            }
            // Reverse so the smallest child is popped first.
            for (&ch, &child) in node.children.iter().rev() {
                let mut next = key.clone();
                next.push(ch);
                stack.push((child, next));
            }
        }
        keys
    }

    fn find(&self, prefix: &str) -> Option<NodeHandle> {
        let mut current = ROOT;
        for ch in prefix.chars() {
            current = *self.nodes[current].children.get(&ch)?;
        }
        Some(current)
    }
}
