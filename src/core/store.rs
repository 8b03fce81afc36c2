//! Mode-gated mutation orchestrator over the tree.
//!
//! The [`Store`] is the choke point every structural mutation funnels
//! through: it checks the read-only gate first, validates structural
//! preconditions, applies the tree mutation, and pairs it with exactly
//! one audit record. Read-only queries bypass the gate and never log.
//!
//! # Concurrency
//!
//! All mutating methods take `&mut self`, so a single caller needs no
//! locking. To share a `Store` across threads, wrap the whole value in
//! one `Mutex`: the gate check, uniqueness check, tree mutation, and log
//! append must be observed as one atomic unit, so there is no finer
//! lock to take.

use crate::core::error::FsError;
use crate::core::log::{FileSink, LogRecord, LogSink, OpKind, OperationLog};
use crate::core::time;
use crate::core::tree::{ItemKind, Node, NodeId, Tree};
use serde::Serialize;
use std::path::Path;

/// Aggregate counts over the whole tree, derived by one traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Statistics {
    pub total_items: usize,
    pub files: usize,
    pub folders: usize,
    pub total_size: u64,
    pub read_only: bool,
}

/// Point-in-time metadata view of one item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemInfo {
    pub name: String,
    pub kind: ItemKind,
    pub size: u64,
    pub path: String,
    pub created: String,
    pub modified: String,
    /// Direct child count; present only for folders.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<usize>,
}

const MODE_READ_ONLY: &str = "READ-ONLY";
const MODE_READ_WRITE: &str = "READ-WRITE";

fn mode_label(read_only: bool) -> &'static str {
    if read_only { MODE_READ_ONLY } else { MODE_READ_WRITE }
}

/// The simulated file system: one root folder, a read-only flag, and an
/// append-only operation log.
pub struct Store {
    tree: Tree,
    current: NodeId,
    read_only: bool,
    log: OperationLog,
}

impl Store {
    /// Build an empty store (root folder only) writing audit records
    /// through `sink`. Starts in read-write mode.
    pub fn new(sink: Box<dyn LogSink>) -> Self {
        let tree = Tree::new();
        let current = tree.root();
        let mut store = Store {
            tree,
            current,
            read_only: false,
            log: OperationLog::new(sink),
        };
        store
            .log
            .record(OpKind::System, "File system initialized in read-write mode");
        store
    }

    /// Convenience constructor backed by a [`FileSink`] at `path`.
    pub fn with_log_file(path: impl Into<std::path::PathBuf>) -> Self {
        Self::new(Box::new(FileSink::create(path)))
    }

    /// Seed the demo structure: `documents/`, `images/`, `config/`,
    /// `documents/readme.txt`, `config/settings.conf`. Bypasses the gate
    /// and per-item logging; records one SYSTEM entry. Intended for a
    /// freshly constructed store.
    pub fn seed_demo(&mut self) {
        let root = self.tree.root();
        let docs = self.tree.insert_folder(root, "documents");
        self.tree.insert_folder(root, "images");
        let config = self.tree.insert_folder(root, "config");
        self.tree.insert_file(
            docs,
            "readme.txt",
            b"Welcome to Read-Only File System Simulator".to_vec(),
        );
        self.tree.insert_file(
            config,
            "settings.conf",
            b"mode=read-write\nversion=1.0".to_vec(),
        );
        self.log.record(OpKind::System, "Demo structure created");
    }

    // ----- gate -----

    /// The permission gate. Called first by every mutating operation;
    /// a blocked attempt records one ERROR line and changes nothing.
    fn check_write(&mut self, operation: &str) -> Result<(), FsError> {
        if self.read_only {
            self.log.record(
                OpKind::Error,
                format!("Attempted '{}' in read-only mode - BLOCKED", operation),
            );
            return Err(FsError::ReadOnly {
                operation: operation.to_string(),
            });
        }
        Ok(())
    }

    fn require(&self, id: NodeId) -> Result<&Node, FsError> {
        self.tree
            .get(id)
            .ok_or_else(|| FsError::NotFound(id.to_string()))
    }

    fn require_folder(&self, id: NodeId) -> Result<&Node, FsError> {
        let node = self.require(id)?;
        if !node.is_folder() {
            return Err(FsError::InvalidOperation(format!(
                "not a folder: {}",
                self.tree.path(id)
            )));
        }
        Ok(node)
    }

    fn check_name(name: &str) -> Result<(), FsError> {
        if name.is_empty() {
            return Err(FsError::InvalidOperation(
                "item name cannot be empty".to_string(),
            ));
        }
        Ok(())
    }

    // ----- mutations -----

    /// Create a file under `parent` (current folder when `None`).
    pub fn create_file(
        &mut self,
        name: &str,
        content: impl Into<Vec<u8>>,
        parent: Option<NodeId>,
    ) -> Result<NodeId, FsError> {
        self.check_write("create_file")?;
        Self::check_name(name)?;
        let target = parent.unwrap_or(self.current);
        self.require_folder(target)?;
        if self.tree.child_by_name(target, name).is_some() {
            return Err(FsError::AlreadyExists(name.to_string()));
        }
        let id = self.tree.insert_file(target, name, content.into());
        self.log.record(
            OpKind::CreateFile,
            format!(
                "Created file: {} ({} bytes)",
                self.tree.path(id),
                self.tree.size(id)
            ),
        );
        Ok(id)
    }

    /// Create a folder under `parent` (current folder when `None`).
    pub fn create_folder(
        &mut self,
        name: &str,
        parent: Option<NodeId>,
    ) -> Result<NodeId, FsError> {
        self.check_write("create_folder")?;
        Self::check_name(name)?;
        let target = parent.unwrap_or(self.current);
        self.require_folder(target)?;
        if self.tree.child_by_name(target, name).is_some() {
            return Err(FsError::AlreadyExists(name.to_string()));
        }
        let id = self.tree.insert_folder(target, name);
        self.log.record(
            OpKind::CreateFolder,
            format!("Created folder: {}", self.tree.path(id)),
        );
        Ok(id)
    }

    /// Detach `id` and destroy its subtree. Root is never deletable.
    pub fn delete_item(&mut self, id: NodeId) -> Result<(), FsError> {
        self.check_write("delete_item")?;
        if id == self.tree.root() {
            return Err(FsError::InvalidOperation(
                "cannot delete root folder".to_string(),
            ));
        }
        let node = self.require(id)?;
        let kind = node.kind();
        // Path as it was before removal.
        let path = self.tree.path(id);
        self.tree.detach(id);
        self.log
            .record(OpKind::Delete, format!("Deleted {}: {}", kind, path));
        Ok(())
    }

    /// Replace a file's content.
    pub fn modify_file(
        &mut self,
        id: NodeId,
        new_content: impl Into<Vec<u8>>,
    ) -> Result<(), FsError> {
        self.check_write("modify_file")?;
        let node = self.require(id)?;
        if !node.is_file() {
            return Err(FsError::InvalidOperation(format!(
                "not a file: {}",
                self.tree.path(id)
            )));
        }
        let old_size = self.tree.size(id);
        self.tree.set_content(id, new_content.into());
        let new_size = self.tree.size(id);
        self.log.record(
            OpKind::ModifyFile,
            format!(
                "Modified file: {} (size: {} -> {} bytes)",
                self.tree.path(id),
                old_size,
                new_size
            ),
        );
        Ok(())
    }

    /// Rename in place. Renaming to the current name is a trivial
    /// successful rename; colliding with a *different* sibling fails.
    pub fn rename_item(&mut self, id: NodeId, new_name: &str) -> Result<(), FsError> {
        self.check_write("rename_item")?;
        Self::check_name(new_name)?;
        let node = self.require(id)?;
        let kind = node.kind();
        if let Some(parent) = node.parent() {
            if let Some(other) = self.tree.child_by_name(parent, new_name) {
                if other != id {
                    return Err(FsError::AlreadyExists(new_name.to_string()));
                }
            }
        }
        let old_path = self.tree.path(id);
        self.tree.rename(id, new_name);
        let new_path = self.tree.path(id);
        self.log.record(
            OpKind::Rename,
            format!("Renamed {}: {} -> {}", kind, old_path, new_path),
        );
        Ok(())
    }

    /// Flip the read-only flag. Unconditional: succeeds even when the
    /// flag already has the requested value, and never revalidates prior
    /// mutations.
    pub fn set_read_only(&mut self, enabled: bool) {
        let old = self.read_only;
        self.read_only = enabled;
        self.log.record(
            OpKind::ModeChange,
            format!(
                "File system changed from {} to {}",
                mode_label(old),
                mode_label(enabled)
            ),
        );
    }

    // ----- queries -----

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    pub fn root(&self) -> NodeId {
        self.tree.root()
    }

    pub fn current_folder(&self) -> NodeId {
        self.current
    }

    pub fn item(&self, id: NodeId) -> Result<&Node, FsError> {
        self.require(id)
    }

    /// Full path of `id`, derived from the current parent chain.
    pub fn path(&self, id: NodeId) -> Result<String, FsError> {
        self.require(id)?;
        Ok(self.tree.path(id))
    }

    /// Descendants of `folder` (root when `None`) in pre-order.
    pub fn list_all(&self, folder: Option<NodeId>) -> Result<Vec<NodeId>, FsError> {
        let target = folder.unwrap_or(self.tree.root());
        self.require_folder(target)?;
        Ok(self.tree.preorder(target))
    }

    /// Resolve an absolute path like `/root/documents/readme.txt`.
    pub fn resolve_path(&self, path: &str) -> Result<NodeId, FsError> {
        let not_found = || FsError::NotFound(path.to_string());
        let mut segments = path.trim_matches('/').split('/');
        if segments.next() != Some("root") {
            return Err(not_found());
        }
        let mut cursor = self.tree.root();
        for segment in segments {
            if segment.is_empty() {
                return Err(not_found());
            }
            cursor = self
                .tree
                .child_by_name(cursor, segment)
                .ok_or_else(not_found)?;
        }
        Ok(cursor)
    }

    /// Metadata view of one item.
    pub fn info(&self, id: NodeId) -> Result<ItemInfo, FsError> {
        let node = self.require(id)?;
        Ok(ItemInfo {
            name: node.name().to_string(),
            kind: node.kind(),
            size: self.tree.size(id),
            path: self.tree.path(id),
            created: time::format_info_ts(&node.created_at()),
            modified: time::format_info_ts(&node.modified_at()),
            items: node.is_folder().then(|| node.children().len()),
        })
    }

    /// Aggregate statistics over the whole tree. Folder sizes are
    /// already sums of their files, so total_size counts files only.
    pub fn statistics(&self) -> Statistics {
        let all = self.tree.preorder(self.tree.root());
        let mut files = 0;
        let mut folders = 0;
        let mut total_size = 0u64;
        for id in &all {
            if let Some(node) = self.tree.get(*id) {
                match node.kind() {
                    ItemKind::File => {
                        files += 1;
                        total_size += self.tree.size(*id);
                    }
                    ItemKind::Folder => folders += 1,
                }
            }
        }
        Statistics {
            total_items: all.len(),
            files,
            folders,
            total_size,
            read_only: self.read_only,
        }
    }

    // ----- log access -----

    pub fn log(&self) -> &OperationLog {
        &self.log
    }

    /// All audit records rendered as canonical lines.
    pub fn log_entries(&self) -> Vec<String> {
        self.log.lines()
    }

    /// Last `count` audit records, in order.
    pub fn recent_log_entries(&self, count: usize) -> &[LogRecord] {
        self.log.recent(count)
    }

    /// Empty the in-memory log (the durable sink keeps its history),
    /// then record that the log was cleared.
    pub fn clear_log(&mut self) {
        self.log.clear();
        self.log.record(OpKind::System, "Log cleared");
    }

    /// Export the in-memory log to `path`.
    pub fn save_log(&self, path: impl AsRef<Path>) -> Result<(), FsError> {
        self.log.save_to_file(path)
    }
}
