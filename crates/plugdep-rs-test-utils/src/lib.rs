//! Various helper functions for testing
//!
//! functions in this module should use results and not use any panics to avoid confusion in callers

use plugdep_rs::Manifest;
use plugdep_rs::relationship_resolver::{InstalledPlugin, InstalledPlugins, ManifestProvider};

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("IO error: {0}")]
	IO(#[from] std::io::Error),
	#[error("JSON error: {0}")]
	SerdeJSON(#[from] serde_json::Error),
	#[error("manifest has no slug")]
	MissingSlug,
	#[error("temporary data directory rejected")]
	InvalidDataDir,
}

/// Builds a `plugin.json` document.
/// # Parameters
/// - `version` - Left out of the document when `None`.
/// - `requires` - `(slug, constraint)` pairs written as `requires.plugins`.
pub fn manifest_json(slug: &str, version: Option<&str>, requires: &[(&str, &str)]) -> serde_json::Value {
	let plugins: Vec<_> = requires.iter()
		.map(|(slug, version)| serde_json::json!({ "slug": slug, "version": version }))
		.collect();

	let mut v = serde_json::json!({
		"slug": slug,
		"requires": { "plugins": plugins },
	});
	if let Some(version) = version {
		v["version"] = serde_json::Value::from(version);
	}
	v
}

/// Candidate manifest depending on each of `deps` at any version.
pub fn candidate(slug: &str, deps: &[&str]) -> Manifest {
	deps.iter().fold(Manifest::new(slug), |m, d| m.with_dependency(*d, "*"))
}

/// Catalogue where each `(slug, version)` is installed without a manifest.
pub fn installed(plugins: &[(&str, &str)]) -> plugdep_rs::Catalogue {
	let mut catalogue = plugdep_rs::Catalogue::new();
	for (slug, version) in plugins {
		catalogue.register(*slug, plugdep_rs::PluginVersion::new(version), None);
	}
	catalogue
}

/// Writes each document to `<slug>.json` in a new temporary directory.
///
/// The directory is removed when the returned value is dropped.
pub fn write_manifest_dir(manifests: &[serde_json::Value]) -> Result<tempfile::TempDir, Error> {
	let dir = tempfile::tempdir()?;
	for m in manifests {
		let slug = m.get("slug").and_then(|s| s.as_str()).ok_or(Error::MissingSlug)?;
		std::fs::write(dir.path().join(format!("{}.json", slug)), serde_json::to_vec_pretty(m)?)?;
	}
	Ok(dir)
}

/// Options using a new temporary data directory.
pub fn temp_options() -> Result<(tempfile::TempDir, plugdep_rs::PlugdepOptions), Error> {
	let dir = tempfile::tempdir()?;
	let mut options = plugdep_rs::PlugdepOptions::default();
	if !options.set_data_dir(dir.path().to_path_buf()) {
		return Err(Error::InvalidDataDir);
	}
	Ok((dir, options))
}

/// Lookups that fail every call, like an unreachable database.
pub struct FailingLookup;

impl ManifestProvider for FailingLookup {
	fn get_manifest(&self, slug: &str, _available: &[Manifest]) -> plugdep_rs::Result<Option<Manifest>> {
		Err(plugdep_rs::Error::Lookup(format!("manifest store unavailable while fetching {}", slug)))
	}

	fn known_manifests(&self) -> plugdep_rs::Result<Vec<Manifest>> {
		Err(plugdep_rs::Error::Lookup("manifest store unavailable".to_string()))
	}
}

impl InstalledPlugins for FailingLookup {
	fn get_installed(&self, slug: &str) -> plugdep_rs::Result<Option<InstalledPlugin>> {
		Err(plugdep_rs::Error::Lookup(format!("installed plugin store unavailable while fetching {}", slug)))
	}
}
