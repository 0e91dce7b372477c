//! # Plugin catalogue
//!
//! The record of installed plugins, keyed by slug, each with its version and the manifest it was installed from.
//! This is the reference implementation of both lookups the resolver consumes,
//! [`ManifestProvider`] and [`InstalledPlugins`].
//!
//! A catalogue is built from a directory of manifests with [`Catalogue::generate_from_dir()`]
//! and kept between runs as a binary snapshot with [`Catalogue::save_to_disk()`].

use std::collections::BTreeMap;
use serde::*;

use crate::manifest::Manifest;
use crate::version::PluginVersion;
use crate::relationship_resolver::{InstalledPlugin, InstalledPlugins, ManifestProvider, find_available};

mod generation;

/// A single installed plugin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogueEntry {
	pub version: PluginVersion,
	/// Plugins registered without a manifest are installed but can't be inspected.
	pub manifest: Option<Manifest>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Catalogue {
	plugins: BTreeMap<String, CatalogueEntry>,
}

impl Catalogue {
	pub fn new() -> Self {
		Default::default()
	}

	/// Records `slug` as installed at `version`, replacing any existing record.
	pub fn register(&mut self, slug: impl Into<String>, version: PluginVersion, manifest: Option<Manifest>) {
		let slug = slug.into();
		log::trace!("Registering plugin {} at version {}", slug, version);
		self.plugins.insert(slug, CatalogueEntry { version, manifest });
	}

	/// Registers a manifest under its own slug and version.
	///
	/// # Errors
	/// - [`Validation`](crate::Error::Validation) when the manifest has no version.
	pub fn register_manifest(&mut self, manifest: Manifest) -> crate::Result<()> {
		let version = manifest.version.clone()
			.ok_or_else(|| crate::Error::Validation(format!("installed plugin {} has no version", manifest.slug)))?;
		self.register(manifest.slug.clone(), version, Some(manifest));
		Ok(())
	}

	pub fn unregister(&mut self, slug: &str) -> Option<CatalogueEntry> {
		log::trace!("Unregistering plugin {}", slug);
		self.plugins.remove(slug)
	}

	pub fn get(&self, slug: &str) -> Option<&CatalogueEntry> {
		self.plugins.get(slug)
	}

	/// Entries in slug order.
	pub fn iter(&self) -> impl Iterator<Item = (&String, &CatalogueEntry)> {
		self.plugins.iter()
	}

	pub fn len(&self) -> usize {
		self.plugins.len()
	}

	pub fn is_empty(&self) -> bool {
		self.plugins.is_empty()
	}
}

impl ManifestProvider for Catalogue {
	fn get_manifest(&self, slug: &str, available: &[Manifest]) -> crate::Result<Option<Manifest>> {
		if let Some(manifest) = self.plugins.get(slug).and_then(|e| e.manifest.as_ref()) {
			return Ok(Some(manifest.clone()))
		}
		Ok(find_available(slug, available).cloned())
	}

	fn known_manifests(&self) -> crate::Result<Vec<Manifest>> {
		Ok(self.plugins.values().filter_map(|e| e.manifest.clone()).collect())
	}
}

impl InstalledPlugins for Catalogue {
	fn get_installed(&self, slug: &str) -> crate::Result<Option<InstalledPlugin>> {
		Ok(self.plugins.get(slug).map(|e| InstalledPlugin { slug: slug.to_string(), version: e.version.clone() }))
	}
}
