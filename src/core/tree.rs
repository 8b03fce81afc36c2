//! Arena-based tree model for the simulated file system.
//!
//! Nodes live in a flat id-keyed table. Folders own their children by id
//! (insertion order preserved); the parent link is a plain id used only
//! for path derivation and sibling lookups, never for lifetime
//! management. Ids are allocated from a monotonic counter and never
//! reused, so deleting one subtree cannot invalidate handles to
//! unrelated nodes.
//!
//! The table itself enforces no policy: permission gating, name
//! uniqueness, and root protection live in [`crate::core::store::Store`].
//! What the table does guarantee is structural: attaching and detaching
//! through [`Tree::insert_file`] / [`Tree::insert_folder`] /
//! [`Tree::detach`] are the only child-list mutations, and both ends of
//! the edge are updated together.

use crate::core::time;
use chrono::{DateTime, Local};
use rustc_hash::FxHashMap;
use serde::Serialize;
use std::fmt;

/// Stable handle to a node in the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId(u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Closed discriminator over the two item variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    File,
    Folder,
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemKind::File => write!(f, "file"),
            ItemKind::Folder => write!(f, "folder"),
        }
    }
}

/// Kind-specific payload: byte content for files, ordered child ids for
/// folders.
#[derive(Debug, Clone)]
enum Payload {
    File { content: Vec<u8> },
    Folder { children: Vec<NodeId> },
}

/// One item in the store: shared attributes plus kind-specific payload.
#[derive(Debug, Clone)]
pub struct Node {
    name: String,
    parent: Option<NodeId>,
    created_at: DateTime<Local>,
    modified_at: DateTime<Local>,
    payload: Payload,
}

impl Node {
    fn new(name: &str, parent: Option<NodeId>, payload: Payload) -> Self {
        let now = time::now();
        Node {
            name: name.to_string(),
            parent,
            created_at: now,
            modified_at: now,
            payload,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ItemKind {
        match self.payload {
            Payload::File { .. } => ItemKind::File,
            Payload::Folder { .. } => ItemKind::Folder,
        }
    }

    pub fn is_folder(&self) -> bool {
        self.kind() == ItemKind::Folder
    }

    pub fn is_file(&self) -> bool {
        self.kind() == ItemKind::File
    }

    /// Non-owning link to the enclosing folder; `None` only for root.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn created_at(&self) -> DateTime<Local> {
        self.created_at
    }

    pub fn modified_at(&self) -> DateTime<Local> {
        self.modified_at
    }

    /// File content; `None` for folders.
    pub fn content(&self) -> Option<&[u8]> {
        match &self.payload {
            Payload::File { content } => Some(content),
            Payload::Folder { .. } => None,
        }
    }

    /// Child ids in insertion order; empty for files.
    pub fn children(&self) -> &[NodeId] {
        match &self.payload {
            Payload::Folder { children } => children,
            Payload::File { .. } => &[],
        }
    }

    // modified_at is non-decreasing even if the wall clock steps back.
    fn touch(&mut self) {
        let now = time::now();
        if now > self.modified_at {
            self.modified_at = now;
        }
    }
}

/// Flat node table holding the whole tree, rooted at a folder named
/// `root` with no parent.
#[derive(Debug)]
pub struct Tree {
    nodes: FxHashMap<NodeId, Node>,
    root: NodeId,
    next_id: u64,
}

impl Tree {
    pub fn new() -> Self {
        let root = NodeId(0);
        let mut nodes = FxHashMap::default();
        nodes.insert(
            root,
            Node::new("root", None, Payload::Folder { children: Vec::new() }),
        );
        Tree {
            nodes,
            root,
            next_id: 1,
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Number of nodes in the table, root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn alloc(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        self.nodes.insert(id, node);
        id
    }

    fn attach(&mut self, parent: NodeId, child: NodeId) {
        if let Some(node) = self.nodes.get_mut(&parent) {
            if let Payload::Folder { children } = &mut node.payload {
                children.push(child);
            }
            node.touch();
        }
    }

    /// Create a file under `parent` and attach it. The caller has already
    /// validated that `parent` is a folder and that the name is free.
    pub fn insert_file(&mut self, parent: NodeId, name: &str, content: Vec<u8>) -> NodeId {
        let id = self.alloc(Node::new(name, Some(parent), Payload::File { content }));
        self.attach(parent, id);
        id
    }

    /// Create a folder under `parent` and attach it.
    pub fn insert_folder(&mut self, parent: NodeId, name: &str) -> NodeId {
        let id = self.alloc(Node::new(
            name,
            Some(parent),
            Payload::Folder { children: Vec::new() },
        ));
        self.attach(parent, id);
        id
    }

    /// Detach `id` from its parent and drop its whole subtree from the
    /// table. No-op for root or for ids already gone.
    pub fn detach(&mut self, id: NodeId) {
        if id == self.root {
            return;
        }
        let Some(parent_id) = self.nodes.get(&id).and_then(|n| n.parent) else {
            return;
        };
        if let Some(parent) = self.nodes.get_mut(&parent_id) {
            if let Payload::Folder { children } = &mut parent.payload {
                children.retain(|&c| c != id);
            }
            parent.touch();
        }
        for gone in self.collect_subtree(id) {
            self.nodes.remove(&gone);
        }
    }

    fn collect_subtree(&self, id: NodeId) -> Vec<NodeId> {
        let mut ids = vec![id];
        let mut cursor = 0;
        while cursor < ids.len() {
            if let Some(node) = self.nodes.get(&ids[cursor]) {
                ids.extend_from_slice(node.children());
            }
            cursor += 1;
        }
        ids
    }

    /// Look up a direct child of `folder` by name.
    pub fn child_by_name(&self, folder: NodeId, name: &str) -> Option<NodeId> {
        let node = self.nodes.get(&folder)?;
        node.children()
            .iter()
            .copied()
            .find(|&c| self.nodes.get(&c).is_some_and(|n| n.name == name))
    }

    pub fn rename(&mut self, id: NodeId, new_name: &str) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.name = new_name.to_string();
            node.touch();
        }
    }

    /// Replace a file's content. No-op for folders; the store rejects
    /// those before getting here.
    pub fn set_content(&mut self, id: NodeId, content: Vec<u8>) {
        if let Some(node) = self.nodes.get_mut(&id) {
            if let Payload::File {
                content: existing, ..
            } = &mut node.payload
            {
                *existing = content;
                node.touch();
            }
        }
    }

    /// Full path derived from the current parent chain, never cached.
    /// Root is `/root`; children concatenate with a single `/`.
    pub fn path(&self, id: NodeId) -> String {
        let mut names = Vec::new();
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            match self.nodes.get(&current) {
                Some(node) => {
                    names.push(node.name.as_str());
                    cursor = node.parent;
                }
                None => break,
            }
        }
        let mut path = String::new();
        for name in names.iter().rev() {
            path.push('/');
            path.push_str(name);
        }
        path
    }

    /// Byte size: content length for a file, recursive child sum for a
    /// folder. Derived on every call.
    pub fn size(&self, id: NodeId) -> u64 {
        match self.nodes.get(&id) {
            Some(node) => match &node.payload {
                Payload::File { content } => content.len() as u64,
                Payload::Folder { children } => {
                    children.iter().map(|&c| self.size(c)).sum()
                }
            },
            None => 0,
        }
    }

    /// Descendants of `folder` in pre-order (parent before children,
    /// siblings in insertion order). The starting folder itself is
    /// excluded.
    pub fn preorder(&self, folder: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        if let Some(node) = self.nodes.get(&folder) {
            for &child in node.children() {
                self.walk(child, &mut out);
            }
        }
        out
    }

    fn walk(&self, id: NodeId, out: &mut Vec<NodeId>) {
        out.push(id);
        if let Some(node) = self.nodes.get(&id) {
            for &child in node.children() {
                self.walk(child, out);
            }
        }
    }
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}
