//! Declared relationships of a single plugin.

use serde::*;

use crate::version::{PluginVersion, VersionConstraint};

pub(crate) mod import;
pub use import::DependencyDeclaration;
pub use import::compile_schema;

/// Describes a plugin using an identifier and version requirement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyDescriptor {
	pub slug: String,
	pub constraint: VersionConstraint,
}

impl DependencyDescriptor {
	pub fn new(slug: impl Into<String>, constraint: VersionConstraint) -> Self {
		Self {
			slug: slug.into(),
			constraint,
		}
	}
}

/// A plugin's `plugin.json` reduced to what the resolver needs.
///
/// Both dependency shapes found in manifests are normalized into `dependencies` when read,
/// see [`DependencyDeclaration`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
	pub slug: String,
	pub version: Option<PluginVersion>,
	/* Insertion ordered, one entry per slug */
	dependencies: Vec<DependencyDescriptor>,
	pub conflicts_with: Vec<String>,
	pub recommends: Vec<String>,
}

impl Manifest {
	pub fn new(slug: impl Into<String>) -> Self {
		Self {
			slug: slug.into(),
			..Default::default()
		}
	}

	pub fn with_version(mut self, version: &str) -> Self {
		self.version = Some(PluginVersion::new(version));
		self
	}

	pub fn with_dependency(mut self, slug: impl Into<String>, constraint: impl Into<VersionConstraint>) -> Self {
		self.insert_dependency(slug, constraint.into());
		self
	}

	pub fn with_conflict(mut self, slug: impl Into<String>) -> Self {
		self.conflicts_with.push(slug.into());
		self
	}

	pub fn with_recommendation(mut self, slug: impl Into<String>) -> Self {
		self.recommends.push(slug.into());
		self
	}

	/// Adds a dependency, replacing the constraint in place if `slug` is already a dependency.
	pub fn insert_dependency(&mut self, slug: impl Into<String>, constraint: VersionConstraint) {
		let slug = slug.into();
		if let Some(existing) = self.dependencies.iter_mut().find(|d| d.slug == slug) {
			existing.constraint = constraint;
		} else {
			self.dependencies.push(DependencyDescriptor::new(slug, constraint));
		}
	}

	pub fn dependencies(&self) -> &[DependencyDescriptor] {
		&self.dependencies
	}

	pub fn dependency(&self, slug: &str) -> Option<&DependencyDescriptor> {
		self.dependencies.iter().find(|d| d.slug == slug)
	}

	pub fn depends_on(&self, slug: &str) -> bool {
		self.dependency(slug).is_some()
	}

	/// Reads every `*.json` manifest below `path`.
	///
	/// Files that can't be read as a manifest are skipped with a warning.
	pub fn load_dir(path: impl AsRef<std::path::Path>) -> crate::Result<Vec<Manifest>> {
		import::read_manifest_dir(path.as_ref(), None)
	}
}
