//! Layers own the paths of one glyph

use super::node::NodeData;
use super::path::{Path, PathId};

/// The owning collection of paths for one glyph layer
#[derive(Clone, Debug, Default)]
pub struct Layer {
    paths: Vec<Path>,
    next_path_id: u32,
}

impl Layer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a path built from node data and return its id
    pub fn add_path(&mut self, closed: bool, nodes: impl IntoIterator<Item = NodeData>) -> PathId {
        let id = PathId::new(self.next_path_id);
        self.next_path_id += 1;
        self.paths.push(Path::from_nodes(id, closed, nodes));
        id
    }

    pub fn paths(&self) -> &[Path] {
        &self.paths
    }

    pub fn paths_mut(&mut self) -> impl Iterator<Item = &mut Path> {
        self.paths.iter_mut()
    }

    pub fn path_ids(&self) -> Vec<PathId> {
        self.paths.iter().map(Path::id).collect()
    }

    pub fn path(&self, id: PathId) -> Option<&Path> {
        self.paths.iter().find(|p| p.id() == id)
    }

    pub fn path_mut(&mut self, id: PathId) -> Option<&mut Path> {
        self.paths.iter_mut().find(|p| p.id() == id)
    }

    /// Detach a path from the layer
    pub fn remove_path(&mut self, id: PathId) -> Option<Path> {
        let index = self.paths.iter().position(|p| p.id() == id)?;
        Some(self.paths.remove(index))
    }

    /// Put a detached path back unchanged, keeping its path and node ids.
    ///
    /// Returns `false` when a path with the same id is already present.
    pub fn restore_path(&mut self, path: Path) -> bool {
        if self.path(path.id()).is_some() {
            return false;
        }
        self.paths.push(path);
        true
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Paths that have at least one node
    pub fn non_empty_paths(&self) -> impl Iterator<Item = &Path> {
        self.paths.iter().filter(|p| !p.is_empty())
    }

    /// The most recently added path that has nodes, i.e. the one just drawn
    pub fn last_drawn_path(&self) -> Option<PathId> {
        self.non_empty_paths().last().map(Path::id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_and_remove_paths() {
        let mut layer = Layer::new();
        let a = layer.add_path(true, [NodeData::line(0.0, 0.0), NodeData::line(10.0, 0.0)]);
        let b = layer.add_path(false, [NodeData::line(0.0, 5.0), NodeData::line(10.0, 5.0)]);
        assert_ne!(a, b);
        assert_eq!(layer.len(), 2);

        let removed = layer.remove_path(a).map(|p| p.id());
        assert_eq!(removed, Some(a));
        assert!(layer.path(a).is_none());
        assert!(layer.path(b).is_some());
    }

    #[test]
    fn test_restored_path_keeps_its_ids() {
        let mut layer = Layer::new();
        layer.add_path(true, [NodeData::line(0.0, 0.0), NodeData::line(10.0, 0.0)]);
        let stroke = layer.add_path(false, [NodeData::line(0.0, 5.0), NodeData::line(10.0, 5.0)]);
        let node_ids: Vec<_> = layer.path(stroke).map(|p| p.nodes().iter().map(|n| n.id()).collect()).unwrap_or_default();

        let detached = layer.remove_path(stroke).expect("stroke");
        assert!(layer.restore_path(detached.clone()));
        let restored = layer.path(stroke).expect("Restored under the same id");
        let restored_ids: Vec<_> = restored.nodes().iter().map(|n| n.id()).collect();
        assert_eq!(restored_ids, node_ids, "Node ids survive the round trip");
        assert!(!layer.restore_path(detached), "Duplicate ids are refused");
        assert_eq!(layer.len(), 2);
    }

    #[test]
    fn test_last_drawn_path_skips_empty() {
        let mut layer = Layer::new();
        let a = layer.add_path(false, [NodeData::line(0.0, 0.0)]);
        layer.add_path(false, Vec::<NodeData>::new());
        assert_eq!(layer.last_drawn_path(), Some(a));
    }
}
