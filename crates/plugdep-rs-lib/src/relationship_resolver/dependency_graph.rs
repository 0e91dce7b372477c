//! Module for only DependencyGraph functions not related to the overall resolving process.

use std::collections::{HashMap, VecDeque};

use petgraph::prelude::*;

use crate::version::{PluginVersion, VersionConstraint};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeData {
	/// Node contains an installed plugin which can't be changed.
	///
	/// These are never expanded, their own dependencies are trusted to be present.
	Fixed(String, PluginVersion),
	/// Node contains a plugin that has to be installed. Outgoing edges are its dependencies.
	Candidate(String),
	/// Node only refers to an identifier, no manifest could be found for it.
	Stub(String),
}

impl NodeData {
	pub fn slug(&self) -> &str {
		match self {
			NodeData::Fixed(slug, _)
			| NodeData::Candidate(slug)
			| NodeData::Stub(slug) => slug,
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EdgeData {
	/// A requirement from the source plugin for the target to satisfy the constraint.
	Depends(VersionConstraint),
}

/// The "requires" relation between plugins found while resolving one target.
///
/// An edge `a -> b` means `a` depends on `b`, so `b` has to be installed first.
#[derive(Debug, Default, Clone)]
pub struct DependencyGraph {
	graph: DiGraph<NodeData, EdgeData>,
	node_map: HashMap<String, NodeIndex>,
}

/// Color states for cycle detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Color {
	/// Not visited yet.
	White,
	/// On the current search path.
	Gray,
	/// Finished.
	Black,
}

impl DependencyGraph {
	pub fn new() -> Self {
		Default::default()
	}

	pub fn contains(&self, slug: &str) -> bool {
		self.node_map.contains_key(slug)
	}

	pub fn node(&self, slug: &str) -> Option<&NodeData> {
		self.node_map.get(slug).map(|i| &self.graph[*i])
	}

	pub fn node_count(&self) -> usize {
		self.graph.node_count()
	}

	/// Direct dependencies of `slug` in the order they were declared.
	pub fn dependencies_of(&self, slug: &str) -> Vec<&str> {
		match self.node_map.get(slug) {
			Some(i) => self.ordered_neighbors(*i).into_iter().map(|n| self.graph[n].slug()).collect(),
			None => Vec::new(),
		}
	}

	/// Every edge as `(dependent, dependency)`.
	pub fn edges(&self) -> Vec<(&str, &str)> {
		self.graph.node_indices()
			.flat_map(|i| self.ordered_neighbors(i).into_iter().map(move |n| (i, n)))
			.map(|(a, b)| (self.graph[a].slug(), self.graph[b].slug()))
			.collect()
	}

	pub(super) fn index_of(&self, slug: &str) -> Option<NodeIndex> {
		self.node_map.get(slug).copied()
	}

	/// Adds a node for `data`, or replaces the data of the existing node with the same slug.
	pub(super) fn set_node(&mut self, data: NodeData) -> NodeIndex {
		if let Some(&i) = self.node_map.get(data.slug()) {
			self.graph[i] = data;
			i
		} else {
			let slug = data.slug().to_string();
			let i = self.graph.add_node(data);
			self.node_map.insert(slug, i);
			i
		}
	}

	/// Records that `src` depends on `dst`, repeated edges only keep the latest constraint.
	pub(super) fn add_dependency(&mut self, src: NodeIndex, dst: NodeIndex, constraint: VersionConstraint) {
		self.graph.update_edge(src, dst, EdgeData::Depends(constraint));
	}

	/// Outgoing neighbors in insertion order, petgraph walks them newest first.
	fn ordered_neighbors(&self, src: NodeIndex) -> Vec<NodeIndex> {
		let mut v: Vec<_> = self.graph.neighbors_directed(src, Outgoing).collect();
		v.reverse();
		v
	}

	fn is_fixed(&self, i: NodeIndex) -> bool {
		matches!(self.graph[i], NodeData::Fixed(_, _))
	}

	pub fn has_cycle(&self) -> bool {
		self.find_cycle().is_some()
	}

	/// Depth first search for a cycle among plugins that aren't installed.
	///
	/// Returns the slugs along the cycle with the first repeated at the end, `a -> b -> a` is `[a, b, a]`.
	/// Installed nodes are skipped, they were never expanded so they can't close a cycle.
	pub fn find_cycle(&self) -> Option<Vec<String>> {
		let mut colors = vec![Color::White; self.graph.node_count()];

		for start in self.graph.node_indices() {
			if colors[start.index()] != Color::White || self.is_fixed(start) {
				continue;
			}

			/* Explicit stack so deep dependency chains can't overflow the call stack */
			let mut stack: Vec<(NodeIndex, Vec<NodeIndex>)> = Vec::new();
			colors[start.index()] = Color::Gray;
			stack.push((start, self.expandable_neighbors(start)));

			while let Some((node, pending)) = stack.last_mut() {
				let node = *node;
				match pending.pop() {
					Some(next) => match colors[next.index()] {
						Color::Gray => {
							let from = stack.iter().position(|(n, _)| *n == next).unwrap_or(0);
							let mut cycle: Vec<String> = stack[from..].iter().map(|(n, _)| self.graph[*n].slug().to_string()).collect();
							cycle.push(self.graph[next].slug().to_string());
							return Some(cycle);
						},
						Color::White => {
							colors[next.index()] = Color::Gray;
							stack.push((next, self.expandable_neighbors(next)));
						},
						Color::Black => {},
					},
					None => {
						colors[node.index()] = Color::Black;
						stack.pop();
					},
				}
			}
		}

		None
	}

	/// Neighbors to visit during cycle search, reversed so popping yields declaration order.
	fn expandable_neighbors(&self, src: NodeIndex) -> Vec<NodeIndex> {
		let mut v: Vec<_> = self.ordered_neighbors(src).into_iter().filter(|n| !self.is_fixed(*n)).collect();
		v.reverse();
		v
	}

	/// Every node ordered so dependencies come before their dependents.
	///
	/// Kahn's algorithm yields dependents first, the result is that order reversed.
	/// Installed leaves are included, see [`install_order()`](DependencyGraph::install_order) to drop them.
	///
	/// The graph must be acyclic, nodes on a cycle are missing from the result.
	pub fn topological_order(&self) -> Vec<String> {
		let mut in_degree: Vec<usize> = self.graph.node_indices()
			.map(|i| self.graph.neighbors_directed(i, Incoming).count())
			.collect();

		let mut queue: VecDeque<NodeIndex> = self.graph.node_indices()
			.filter(|i| in_degree[i.index()] == 0)
			.collect();

		let mut sorted = Vec::<NodeIndex>::with_capacity(self.graph.node_count());
		while let Some(i) = queue.pop_front() {
			sorted.push(i);
			for dep in self.ordered_neighbors(i) {
				in_degree[dep.index()] -= 1;
				if in_degree[dep.index()] == 0 {
					queue.push_back(dep);
				}
			}
		}

		sorted.reverse();
		sorted.into_iter().map(|i| self.graph[i].slug().to_string()).collect()
	}

	/// [`topological_order()`](DependencyGraph::topological_order) without plugins that are already installed.
	pub fn install_order(&self) -> Vec<String> {
		self.topological_order()
			.into_iter()
			.filter(|slug| !matches!(self.node(slug), Some(NodeData::Fixed(_, _))))
			.collect()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn graph_from(edges: &[(&str, &str)]) -> DependencyGraph {
		let mut g = DependencyGraph::new();
		for (a, b) in edges {
			let a = g.set_node(NodeData::Candidate(a.to_string()));
			let b = g.set_node(NodeData::Candidate(b.to_string()));
			g.add_dependency(a, b, VersionConstraint::Any);
		}
		g
	}

	fn position(order: &[String], slug: &str) -> usize {
		order.iter().position(|s| s == slug).unwrap()
	}

	#[test]
	fn linear_chain_orders_dependencies_first() {
		let g = graph_from(&[("a", "b"), ("b", "c")]);
		assert_eq!(g.topological_order(), ["c", "b", "a"]);
	}

	#[test]
	fn diamond_puts_shared_dependency_first() {
		let g = graph_from(&[("a", "b"), ("a", "c"), ("b", "d"), ("c", "d")]);
		let order = g.topological_order();
		assert_eq!(order.len(), 4);
		assert_eq!(order[0], "d");
		assert_eq!(order[3], "a");
		for (a, b) in g.edges() {
			assert!(position(&order, b) < position(&order, a));
		}
	}

	#[test]
	fn two_node_cycle_is_found() {
		let g = graph_from(&[("a", "b"), ("b", "a")]);
		assert_eq!(g.find_cycle(), Some(vec!["a".to_string(), "b".to_string(), "a".to_string()]));
	}

	#[test]
	fn self_loop_is_a_cycle() {
		let g = graph_from(&[("a", "a")]);
		assert!(g.has_cycle());
	}

	#[test]
	fn shared_dependency_is_not_a_cycle() {
		let g = graph_from(&[("a", "b"), ("a", "c"), ("b", "d"), ("c", "d")]);
		assert!(!g.has_cycle());
	}

	#[test]
	fn installed_leaves_are_ordered_but_not_installed() {
		let mut g = DependencyGraph::new();
		let a = g.set_node(NodeData::Candidate("a".to_string()));
		let b = g.set_node(NodeData::Fixed("b".to_string(), PluginVersion::new("1.0")));
		g.add_dependency(a, b, VersionConstraint::parse(">=1.0"));

		assert_eq!(g.topological_order(), ["b", "a"]);
		assert_eq!(g.install_order(), ["a"]);
		assert!(!g.has_cycle());
	}

	#[test]
	fn dependencies_keep_declaration_order() {
		let g = graph_from(&[("a", "x"), ("a", "y"), ("a", "z")]);
		assert_eq!(g.dependencies_of("a"), ["x", "y", "z"]);
		assert!(g.dependencies_of("missing").is_empty());
	}
}
