//! Include graph - who includes whom.
//!
//! An edge `a -> b` means `a` includes `b` directly. Sources only ever appear
//! as edge tails; headers can be both. Include cycles between headers are
//! legal and every walk here tolerates them.

use std::collections::HashSet;

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::Dfs;
use petgraph::Direction;

use crate::core::inventory::{FileId, Inventory};

/// Directed include graph over one inventory.
#[derive(Debug, Clone)]
pub struct IncludeGraph {
    graph: DiGraph<FileId, ()>,

    /// Node index of each file, indexed by `FileId`
    nodes: Vec<NodeIndex>,
}

impl IncludeGraph {
    /// Build the graph from the resolved dependency lists of `inv`.
    pub fn build(inv: &Inventory) -> Self {
        let mut graph = DiGraph::with_capacity(inv.len(), 0);
        let nodes: Vec<NodeIndex> = inv.ids().map(|id| graph.add_node(id)).collect();

        for (id, file) in inv.iter() {
            for dep in file.dependencies() {
                graph.update_edge(nodes[id.index()], nodes[dep.index()], ());
            }
        }

        IncludeGraph { graph, nodes }
    }

    fn node(&self, id: FileId) -> NodeIndex {
        self.nodes[id.index()]
    }

    /// Files that include `id` directly.
    pub fn includers(&self, id: FileId) -> Vec<FileId> {
        self.graph
            .neighbors_directed(self.node(id), Direction::Incoming)
            .map(|n| self.graph[n])
            .collect()
    }

    /// Every file reachable from `starts` by following includes, the starts
    /// themselves included.
    pub fn reachable_from(&self, starts: impl IntoIterator<Item = FileId>) -> HashSet<FileId> {
        let mut starts = starts.into_iter();
        let Some(first) = starts.next() else {
            return HashSet::new();
        };

        let mut reached = HashSet::new();
        let mut dfs = Dfs::new(&self.graph, self.node(first));
        loop {
            while let Some(node) = dfs.next(&self.graph) {
                reached.insert(self.graph[node]);
            }
            match starts.next() {
                Some(next) => dfs.move_to(self.node(next)),
                None => break,
            }
        }

        reached
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::inventory::{FileKind, SourceFile};
    use std::path::Path;

    /// main.c -> a.h -> b.h -> a.h (cycle), util.c -> c.h
    fn sample() -> Inventory {
        let mut inv = Inventory::from_files(
            "/p",
            vec![
                SourceFile::new("/p/main.c", FileKind::Source, 1),
                SourceFile::new("/p/a.h", FileKind::Header, 1),
                SourceFile::new("/p/b.h", FileKind::Header, 1),
                SourceFile::new("/p/util.c", FileKind::Source, 1),
                SourceFile::new("/p/c.h", FileKind::Header, 1),
            ],
        );
        let id = |inv: &Inventory, p: &str| inv.find(Path::new(p)).unwrap();
        let (main, a, b, util, c) = (
            id(&inv, "/p/main.c"),
            id(&inv, "/p/a.h"),
            id(&inv, "/p/b.h"),
            id(&inv, "/p/util.c"),
            id(&inv, "/p/c.h"),
        );
        inv.get_mut(main).set_dependencies(vec![a]);
        inv.get_mut(a).set_dependencies(vec![b]);
        inv.get_mut(b).set_dependencies(vec![a]);
        inv.get_mut(util).set_dependencies(vec![c]);
        inv
    }

    #[test]
    fn test_edges_follow_dependencies() {
        let inv = sample();
        let graph = IncludeGraph::build(&inv);
        let a = inv.find(Path::new("/p/a.h")).unwrap();

        assert_eq!(graph.edge_count(), 4);
        assert_eq!(graph.reachable_from([a]).len(), 2);

        let mut includers = graph.includers(a);
        includers.sort();
        assert_eq!(
            includers,
            vec![
                inv.find(Path::new("/p/main.c")).unwrap(),
                inv.find(Path::new("/p/b.h")).unwrap()
            ]
        );
    }

    #[test]
    fn test_reachable_from_handles_cycles() {
        let inv = sample();
        let graph = IncludeGraph::build(&inv);
        let main = inv.find(Path::new("/p/main.c")).unwrap();

        let reached = graph.reachable_from([main]);
        assert_eq!(reached.len(), 3);
        assert!(!reached.contains(&inv.find(Path::new("/p/c.h")).unwrap()));
    }

    #[test]
    fn test_reachable_from_multiple_starts() {
        let inv = sample();
        let graph = IncludeGraph::build(&inv);
        let b = inv.find(Path::new("/p/b.h")).unwrap();
        let c = inv.find(Path::new("/p/c.h")).unwrap();

        let reached = graph.reachable_from([b, c]);
        assert_eq!(reached.len(), 3);
        assert!(graph.reachable_from(std::iter::empty()).is_empty());
    }
}
