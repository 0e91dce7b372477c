//! Expansion of a target plugin into its [`DependencyGraph`].

use std::collections::HashMap;
use std::rc::Rc;

use petgraph::prelude::NodeIndex;

use super::*;

/// Everything learned while expanding a target.
pub(super) struct BuiltGraph {
	pub graph: DependencyGraph,
	pub errors: Vec<ResolutionError>,
	pub warnings: Vec<ResolutionWarning>,
}

/// A plugin whose dependencies are being walked.
struct Expansion {
	node: NodeIndex,
	manifest: Rc<Manifest>,
	/// Index of the next dependency in `manifest` to visit.
	next: usize,
}

/// Builds the graph for a single resolve, nothing here outlives the call to [`build()`](GraphBuilder::build).
pub(super) struct GraphBuilder<'r, 'a, M: ?Sized, I: ?Sized> {
	manifests: &'r M,
	installed: &'r I,
	available: &'a [Manifest],

	manifest_cache: HashMap<String, Rc<Manifest>>,

	graph: DependencyGraph,
	errors: Vec<ResolutionError>,
	warnings: Vec<ResolutionWarning>,
}

impl<'r, 'a, M, I> GraphBuilder<'r, 'a, M, I>
where
	M: ManifestProvider + ?Sized,
	I: InstalledPlugins + ?Sized,
{
	pub fn new(manifests: &'r M, installed: &'r I, available: &'a [Manifest]) -> Self {
		Self {
			manifests,
			installed,
			available,
			manifest_cache: Default::default(),
			graph: Default::default(),
			errors: Default::default(),
			warnings: Default::default(),
		}
	}

	/// Expands `target` and everything it transitively requires.
	///
	/// Missing manifests, version mismatches and conflicts are collected rather than stopping the walk
	/// so the caller sees every problem at once. Only a failing lookup ends the build early.
	pub fn build(mut self, target: &str) -> crate::Result<BuiltGraph> {
		/* Overview of process
		Depth first, each plugin is expanded once. A plugin is finished, and its conflicts and recommendations
		checked, only after all of its dependencies have been walked.
		The walk uses an explicit stack of expansions instead of recursion so deep trees can't exhaust the call stack.
		 */

		let mut stack = Vec::<Expansion>::new();

		if let Some(installed) = self.installed.get_installed(target)? {
			log::debug!("Plugin {} already installed at {}, nothing to resolve", target, installed.version);
			self.graph.set_node(NodeData::Fixed(target.to_string(), installed.version));
		} else if let (_, Some(expansion)) = self.expand(target)? {
			stack.push(expansion);
		}

		while let Some(current) = stack.last_mut() {
			let Some(dep) = current.manifest.dependencies().get(current.next).cloned() else {
				if let Some(finished) = stack.pop() {
					self.finish(finished)?;
				}
				continue;
			};
			current.next += 1;
			let src = current.node;
			let dependent = current.manifest.slug.clone();

			match self.installed.get_installed(&dep.slug)? {
				Some(installed) => {
					let dst = self.graph.set_node(NodeData::Fixed(dep.slug.clone(), installed.version.clone()));
					self.graph.add_dependency(src, dst, dep.constraint.clone());

					if !crate::version::satisfies(&installed.version, &dep.constraint) {
						log::debug!("{} requires {} {} but {} is installed", dependent, dep.slug, dep.constraint, installed.version);
						self.errors.push(ResolutionError::VersionMismatch {
							dependent,
							dependency: dep.slug,
							constraint: dep.constraint,
							installed: installed.version,
						});
					}
				},
				None => {
					let dst = match self.graph.index_of(&dep.slug) {
						Some(dst) => dst,
						None => {
							let (dst, expansion) = self.expand(&dep.slug)?;
							if let Some(expansion) = expansion {
								stack.push(expansion);
							}
							dst
						},
					};
					self.graph.add_dependency(src, dst, dep.constraint);
				},
			}
		}

		Ok(BuiltGraph {
			graph: self.graph,
			errors: self.errors,
			warnings: self.warnings,
		})
	}

	/// Adds a node for a plugin that isn't installed and looks up its manifest.
	///
	/// Returns `None` for the expansion when there is no manifest, the node is left as a `Stub`.
	fn expand(&mut self, slug: &str) -> crate::Result<(NodeIndex, Option<Expansion>)> {
		let node = self.graph.set_node(NodeData::Candidate(slug.to_string()));

		match self.get_manifest(slug)? {
			Some(manifest) => {
				log::trace!("Expanding {} with {} dependencies", slug, manifest.dependencies().len());
				Ok((node, Some(Expansion { node, manifest, next: 0 })))
			},
			None => {
				log::debug!("No manifest found for {}", slug);
				self.graph.set_node(NodeData::Stub(slug.to_string()));
				self.errors.push(ResolutionError::MissingManifest(slug.to_string()));
				Ok((node, None))
			},
		}
	}

	/// Checks declared conflicts and recommendations once a plugin's dependencies have been walked.
	fn finish(&mut self, expansion: Expansion) -> crate::Result<()> {
		let manifest = expansion.manifest;

		for conflict in &manifest.conflicts_with {
			if self.installed.get_installed(conflict)?.is_some() {
				log::debug!("{} conflicts with installed plugin {}", manifest.slug, conflict);
				self.errors.push(ResolutionError::ConflictDetected { plugin: manifest.slug.clone(), conflict: conflict.clone() });
			}
		}

		for recommended in &manifest.recommends {
			if self.installed.get_installed(recommended)?.is_none() {
				self.warnings.push(ResolutionWarning::RecommendationNotInstalled { plugin: manifest.slug.clone(), recommended: recommended.clone() });
			}
		}

		Ok(())
	}

	/// Gets a manifest through the per-resolve cache.
	fn get_manifest(&mut self, slug: &str) -> crate::Result<Option<Rc<Manifest>>> {
		if let Some(m) = self.manifest_cache.get(slug) {
			return Ok(Some(Rc::clone(m)))
		}

		let manifest = self.manifests.get_manifest(slug, self.available)?.map(Rc::new);
		if let Some(m) = &manifest {
			self.manifest_cache.insert(slug.to_string(), Rc::clone(m));
		}
		Ok(manifest)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::Catalogue;

	fn build(catalogue: &Catalogue, target: &str, available: &[Manifest]) -> BuiltGraph {
		GraphBuilder::new(catalogue, catalogue, available).build(target).unwrap()
	}

	#[test]
	fn installed_dependencies_are_leaves() {
		let mut catalogue = Catalogue::new();
		catalogue.register_manifest(Manifest::new("b").with_version("1.0").with_dependency("never-looked-at", "*")).unwrap();

		let available = [Manifest::new("a").with_dependency("b", "*")];
		let built = build(&catalogue, "a", &available);

		assert!(built.errors.is_empty());
		assert!(matches!(built.graph.node("b"), Some(NodeData::Fixed(_, _))));
		assert!(!built.graph.contains("never-looked-at"));
		assert_eq!(built.graph.dependencies_of("a"), ["b"]);
	}

	#[test]
	fn missing_dependencies_are_all_reported() {
		let available = [
			Manifest::new("a").with_dependency("x", "*").with_dependency("b", "*"),
			Manifest::new("b").with_dependency("y", "*"),
		];
		let built = build(&Catalogue::new(), "a", &available);

		assert_eq!(built.errors, [
			ResolutionError::MissingManifest("x".to_string()),
			ResolutionError::MissingManifest("y".to_string()),
		]);
		assert!(matches!(built.graph.node("x"), Some(NodeData::Stub(_))));
	}

	#[test]
	fn shared_dependency_is_expanded_once() {
		let available = [
			Manifest::new("a").with_dependency("b", "*").with_dependency("c", "*"),
			Manifest::new("b").with_dependency("d", "*"),
			Manifest::new("c").with_dependency("d", "*"),
			Manifest::new("d").with_recommendation("r"),
		];
		let built = build(&Catalogue::new(), "a", &available);

		assert_eq!(built.graph.node_count(), 4);
		/* One warning means d's recommendations were only checked once */
		assert_eq!(built.warnings.len(), 1);
	}

	#[test]
	fn cycles_terminate() {
		let available = [
			Manifest::new("a").with_dependency("b", "*"),
			Manifest::new("b").with_dependency("a", "*"),
		];
		let built = build(&Catalogue::new(), "a", &available);

		assert!(built.errors.is_empty());
		assert_eq!(built.graph.edges(), [("a", "b"), ("b", "a")]);
	}
}
