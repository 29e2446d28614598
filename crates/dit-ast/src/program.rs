//! Program: the unit a rewrite pass runs over.

use crate::arena::NodeArena;
use crate::base::NodeIndex;
use dit_common::{EmitOptions, FileId};
use rustc_hash::FxHashMap;

/// One arena, an ordered list of source files in it, and the emit options
/// that govern reference synthesis. The arena is the only mutable surface a
/// pass touches.
pub struct Program {
    pub arena: NodeArena,
    pub options: EmitOptions,
    files: Vec<NodeIndex>,
    by_name: FxHashMap<String, FileId>,
}

impl Program {
    pub fn new(options: EmitOptions) -> Program {
        Program {
            arena: NodeArena::new(),
            options,
            files: Vec::new(),
            by_name: FxHashMap::default(),
        }
    }

    /// Register a SOURCE_FILE node built in this program's arena. Files keep
    /// their registration order; that order is the pass's traversal order.
    pub fn add_file(&mut self, file: NodeIndex) -> FileId {
        let id = FileId(self.files.len() as u32);
        let name = self
            .arena
            .get(file)
            .and_then(|node| self.arena.get_source_file(node))
            .map(|data| data.file_name.clone())
            .unwrap_or_default();
        self.files.push(file);
        if !name.is_empty() {
            self.by_name.insert(name, id);
        }
        id
    }

    #[inline]
    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn file(&self, id: FileId) -> Option<NodeIndex> {
        self.files.get(id.index()).copied()
    }

    pub fn file_name(&self, id: FileId) -> &str {
        self.file(id)
            .and_then(|file| self.arena.get(file))
            .and_then(|node| self.arena.get_source_file(node))
            .map(|data| data.file_name.as_str())
            .unwrap_or("")
    }

    pub fn file_by_name(&self, name: &str) -> Option<FileId> {
        self.by_name.get(name).copied()
    }

    /// Iterate files in registration order.
    pub fn files(&self) -> impl Iterator<Item = (FileId, NodeIndex)> + '_ {
        self.files
            .iter()
            .enumerate()
            .map(|(i, &node)| (FileId(i as u32), node))
    }
}

impl Default for Program {
    fn default() -> Self {
        Program::new(EmitOptions::default())
    }
}
