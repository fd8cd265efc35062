//! Generic tree keyed by `/`-separated path segments.
//!
//! Each node maps segment names to children and optionally carries one
//! piece of payload; the root never does. The registry instantiates two of
//! these, one per payload kind, so lookups stay fully typed with no
//! downcasting on hot paths.

use std::collections::HashMap;

use reghub_proto::split_path;

use crate::RegistryError;

#[derive(Debug)]
struct TreeNode<T> {
    children: HashMap<String, TreeNode<T>>,
    data: Option<T>,
}

impl<T> TreeNode<T> {
    fn new() -> Self {
        Self {
            children: HashMap::new(),
            data: None,
        }
    }
}

#[derive(Debug)]
pub struct PathTree<T> {
    root: TreeNode<T>,
}

impl<T> Default for PathTree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> PathTree<T> {
    pub fn new() -> Self {
        Self {
            root: TreeNode::new(),
        }
    }

    /// Stores `data` at `key`, creating missing intermediate nodes and
    /// overwriting any existing payload at the target.
    pub fn set(
        &mut self,
        key: &str,
        data: T,
    ) -> Result<(), RegistryError> {
        let segments = split_path(key);
        if segments.is_empty() || segments.iter().any(|s| s.is_empty()) {
            return Err(RegistryError::EmptyPath);
        }

        let mut node = &mut self.root;
        for segment in segments {
            node = node
                .children
                .entry(segment.to_string())
                .or_insert_with(TreeNode::new);
        }

        node.data = Some(data);
        Ok(())
    }

    pub fn get(
        &self,
        key: &str,
    ) -> Option<&T> {
        self.get_node(key).and_then(|node| node.data.as_ref())
    }

    pub fn get_mut(
        &mut self,
        key: &str,
    ) -> Option<&mut T> {
        let segments = split_path(key);
        if segments.is_empty() {
            return None;
        }

        let mut node = &mut self.root;
        for segment in segments {
            node = node.children.get_mut(segment)?;
        }

        node.data.as_mut()
    }

    /// Removes the payload and the target node itself from its parent.
    ///
    /// Silent when the key is invalid or absent. Intermediate nodes stay
    /// behind; removing a non-leaf drops its whole subtree.
    pub fn remove(
        &mut self,
        key: &str,
    ) {
        let segments = split_path(key);
        if segments.is_empty() {
            return;
        }

        let mut node = &mut self.root;
        for segment in &segments[..segments.len() - 1] {
            match node.children.get_mut(*segment) {
                Some(child) => node = child,
                None => return,
            }
        }

        node.children.remove(segments[segments.len() - 1]);
    }

    /// Whether the node addressed by `key` exists (payload or not).
    pub fn contains_node(
        &self,
        key: &str,
    ) -> bool {
        self.get_node(key).is_some()
    }

    /// Snapshot of the segment names under `key`. Order is unspecified.
    pub fn child_keys(
        &self,
        key: &str,
    ) -> Option<Vec<String>> {
        self.get_node(key)
            .map(|node| node.children.keys().cloned().collect())
    }

    /// Snapshot of the payloads directly under `key`, skipping children
    /// that carry none. Order is unspecified.
    pub fn child_data(
        &self,
        key: &str,
    ) -> Option<Vec<&T>> {
        self.get_node(key).map(|node| {
            node.children
                .values()
                .filter_map(|child| child.data.as_ref())
                .collect()
        })
    }

    /// Pre-order traversal over every payload-carrying node, visited with
    /// its full `/`-joined key.
    pub fn walk<F>(
        &self,
        mut visitor: F,
    ) where
        F: FnMut(&str, &T),
    {
        let mut path = String::new();
        Self::visit(&self.root, &mut path, &mut visitor);
    }

    fn visit<'a, F>(
        node: &'a TreeNode<T>,
        path: &mut String,
        visitor: &mut F,
    ) where
        F: FnMut(&str, &'a T),
    {
        if let Some(data) = &node.data {
            visitor(path, data);
        }

        for (segment, child) in &node.children {
            let parent_len = path.len();
            path.push('/');
            path.push_str(segment);
            Self::visit(child, path, visitor);
            path.truncate(parent_len);
        }
    }

    fn get_node(
        &self,
        key: &str,
    ) -> Option<&TreeNode<T>> {
        let segments = split_path(key);
        if segments.is_empty() {
            return None;
        }

        let mut node = &self.root;
        for segment in segments {
            node = node.children.get(segment)?;
        }

        Some(node)
    }
}
