//! Utilities for deciding whether a plugin can be installed and in what order its dependencies go in.
//!
//! # Usage
//! 1. Implement [`ManifestProvider`] and [`InstalledPlugins`] for whatever records plugins, or use a [`crate::Catalogue`].
//! 1. Create a [`DependencyResolver`] borrowing both.
//! 1. [`DependencyResolver::resolve()`] a target with any candidate manifests not yet recorded.
//! 1. When [`ResolutionResult::success`] is set, install [`ResolutionResult::ordered_install_list`] front to back.
//! Otherwise install nothing and report [`ResolutionResult::errors`].
//!
//! [`DependencyResolver::info()`] answers what a plugin depends on and what depends on it, for display.
//!
//! Each call builds its own graph and caches, a resolver can be shared between threads
//! whenever its lookups can.

use crate::manifest::Manifest;

mod dependency_graph;
pub use dependency_graph::DependencyGraph;
pub use dependency_graph::NodeData;
pub use dependency_graph::EdgeData;

mod oracle;
pub use oracle::ManifestProvider;
pub use oracle::InstalledPlugins;
pub use oracle::InstalledPlugin;
pub use oracle::find_available;

mod report;
pub use report::ResolutionResult;
pub use report::ResolutionError;
pub use report::ResolutionWarning;

mod graph_builder;
use graph_builder::GraphBuilder;

mod dependency_info;
pub use dependency_info::DependencyInfo;

/// Resolves plugin dependencies against injected lookups.
///
/// `resolve()` never fails outright, every problem ends up in the returned [`ResolutionResult`].
pub struct DependencyResolver<'r, M: ?Sized, I: ?Sized> {
	manifests: &'r M,
	installed: &'r I,
}

impl<'r, M, I> DependencyResolver<'r, M, I>
where
	M: ManifestProvider + ?Sized,
	I: InstalledPlugins + ?Sized,
{
	/// # Arguments
	/// - `manifests`: Where manifests are looked up.
	/// - `installed`: Which plugins are installed and at what version.
	pub fn new(manifests: &'r M, installed: &'r I) -> Self {
		Self {
			manifests,
			installed,
		}
	}

	/// Works out everything needed to install `target`.
	///
	/// `available` holds manifests of plugins not recorded by the [`ManifestProvider`], such as an uploaded
	/// plugin and the dependencies shipped with it.
	///
	/// Resolving a plugin that is already installed succeeds with nothing to install.
	pub fn resolve(&self, target: &str, available: &[Manifest]) -> ResolutionResult {
		match self.try_resolve(target, available) {
			Ok(result) => result,
			Err(e) => {
				log::error!("Dependency resolution for {} failed: {}", target, e);
				ResolutionResult::failed(vec![ResolutionError::InternalFailure(e.to_string())], Vec::new())
			},
		}
	}

	fn try_resolve(&self, target: &str, available: &[Manifest]) -> crate::Result<ResolutionResult> {
		let built = GraphBuilder::new(self.manifests, self.installed, available).build(target)?;

		if !built.errors.is_empty() {
			log::debug!("Resolving {} found {} errors", target, built.errors.len());
			return Ok(ResolutionResult::failed(built.errors, built.warnings));
		}

		if let Some(cycle) = built.graph.find_cycle() {
			log::error!("Circular dependency detected resolving {}: {:?}", target, built.graph.edges());
			return Ok(ResolutionResult::failed(vec![ResolutionError::CircularDependency { cycle }], built.warnings));
		}

		let order = built.graph.install_order();
		log::info!("Dependencies resolved for {}: {:?}", target, order);
		Ok(ResolutionResult::complete(order, built.warnings))
	}

	/// Builds just the dependency graph of `target`, ignoring the problems found along the way.
	///
	/// Useful for showing a dependency tree. Errors only when a lookup fails.
	pub fn build_graph(&self, target: &str, available: &[Manifest]) -> crate::Result<DependencyGraph> {
		Ok(GraphBuilder::new(self.manifests, self.installed, available).build(target)?.graph)
	}
}
