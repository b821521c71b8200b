//! petgraph-based fragment dependency graph, used to isolate one operation.

use std::collections::{HashMap, HashSet};

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::Bfs;

use super::types::{Definition, Document, OperationDefinition, Selection};

pub struct FragmentGraph {
    pub graph: DiGraph<String, ()>,
    pub node_indices: HashMap<String, NodeIndex>,
}

impl FragmentGraph {
    /// One node per fragment definition, one edge per spread between fragments.
    /// Spreads of unknown fragments are ignored.
    pub fn build(document: &Document) -> Self {
        let mut graph = DiGraph::new();
        let mut node_indices = HashMap::new();

        for fragment in document.fragments() {
            let idx = graph.add_node(fragment.name.clone());
            node_indices.insert(fragment.name.clone(), idx);
        }

        for fragment in document.fragments() {
            let source = node_indices[&fragment.name];
            for spread in spread_names(&fragment.selection_set) {
                if let Some(&target) = node_indices.get(&spread) {
                    graph.update_edge(source, target, ());
                }
            }
        }

        FragmentGraph {
            graph,
            node_indices,
        }
    }

    /// Every fragment reachable from the operation's own spreads.
    pub fn dependencies(&self, operation: &OperationDefinition) -> HashSet<String> {
        let mut reachable = HashSet::new();
        for root in spread_names(&operation.selection_set) {
            let Some(&idx) = self.node_indices.get(&root) else {
                continue;
            };
            let mut bfs = Bfs::new(&self.graph, idx);
            while let Some(nx) = bfs.next(&self.graph) {
                reachable.insert(self.graph[nx].clone());
            }
        }
        reachable
    }
}

/// Names of all fragments spread anywhere in `selections`, in document order.
pub fn spread_names(selections: &[Selection]) -> Vec<String> {
    let mut names = Vec::new();
    collect_spreads(selections, &mut names);
    names
}

fn collect_spreads(selections: &[Selection], names: &mut Vec<String>) {
    for selection in selections {
        match selection {
            Selection::Field(field) => collect_spreads(&field.selection_set, names),
            Selection::InlineFragment(inline) => collect_spreads(&inline.selection_set, names),
            Selection::FragmentSpread(spread) => {
                if !names.contains(&spread.name) {
                    names.push(spread.name.clone());
                }
            }
        }
    }
}

impl Document {
    /// The named operation together with the fragments it transitively uses.
    pub fn separate_operation(&self, name: &str) -> Option<Document> {
        let operation = self.operation(name)?;
        let needed = FragmentGraph::build(self).dependencies(operation);

        let definitions = self
            .definitions
            .iter()
            .filter(|def| match def {
                Definition::Operation(op) => op.name.as_deref() == Some(name),
                Definition::Fragment(frag) => needed.contains(&frag.name),
            })
            .cloned()
            .collect();

        Some(Document { definitions })
    }
}
