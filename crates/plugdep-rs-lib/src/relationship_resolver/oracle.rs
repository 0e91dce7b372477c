//! Lookups the resolver needs from its surroundings.
//!
//! Implementations are free to hit a database, the resolver calls them synchronously and
//! turns any `Err` into a failed resolution.

use crate::manifest::Manifest;
use crate::version::PluginVersion;

/// Finds manifests for plugins.
pub trait ManifestProvider {
	/// Gets the manifest of `slug`.
	///
	/// Implementations should look in their own record of plugins first and then in `available`,
	/// which holds candidates supplied for a fresh install. `Ok(None)` when neither has it.
	fn get_manifest(&self, slug: &str, available: &[Manifest]) -> crate::Result<Option<Manifest>>;

	/// Every manifest the provider knows about, used to find which plugins depend on another.
	fn known_manifests(&self) -> crate::Result<Vec<Manifest>>;
}

/// A plugin that is currently installed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstalledPlugin {
	pub slug: String,
	pub version: PluginVersion,
}

/// Reports which plugins are installed.
pub trait InstalledPlugins {
	/// `Ok(None)` when `slug` isn't installed.
	fn get_installed(&self, slug: &str) -> crate::Result<Option<InstalledPlugin>>;
}

/// Finds `slug` in a list of candidate manifests.
pub fn find_available<'a>(slug: &str, available: &'a [Manifest]) -> Option<&'a Manifest> {
	available.iter().find(|m| m.slug == slug)
}
