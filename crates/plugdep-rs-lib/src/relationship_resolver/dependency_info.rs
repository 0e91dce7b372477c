//! Read only queries about a single plugin's relationships.

use super::*;
use crate::manifest::DependencyDescriptor;

/// Everything known about how a plugin relates to others.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DependencyInfo {
	/// As declared in the manifest.
	pub direct_dependencies: Vec<DependencyDescriptor>,
	/// The install order from [`resolve()`](DependencyResolver::resolve), dependencies first and the plugin itself last.
	/// Empty when it can't be resolved or is already installed.
	pub all_dependencies: Vec<String>,
	pub conflicts: Vec<String>,
	pub recommendations: Vec<String>,
	/// Known plugins which directly depend on it.
	pub dependents: Vec<String>,
}

impl<'r, M, I> DependencyResolver<'r, M, I>
where
	M: ManifestProvider + ?Sized,
	I: InstalledPlugins + ?Sized,
{
	/// Describes `target` for display.
	///
	/// Never fails, anything that can't be looked up is left empty and logged.
	pub fn info(&self, target: &str) -> DependencyInfo {
		let manifest = match self.manifests.get_manifest(target, &[]) {
			Ok(Some(m)) => m,
			Ok(None) => {
				log::debug!("No manifest for {}, reporting empty dependency info", target);
				return DependencyInfo::default();
			},
			Err(e) => {
				log::error!("Failed to get manifest of {}: {}", target, e);
				return DependencyInfo::default();
			},
		};

		let resolution = self.resolve(target, &[]);
		let all_dependencies = if resolution.success {
			resolution.ordered_install_list
		} else {
			log::debug!("{} can't be resolved: {:?}", target, resolution.error_messages());
			Vec::new()
		};

		let dependents = self.dependents(target).unwrap_or_else(|e| {
			log::error!("Failed to find dependents of {}: {}", target, e);
			Vec::new()
		});

		DependencyInfo {
			direct_dependencies: manifest.dependencies().to_vec(),
			all_dependencies,
			conflicts: manifest.conflicts_with.clone(),
			recommendations: manifest.recommends.clone(),
			dependents,
		}
	}

	/// Slugs of every known plugin that directly depends on `target`, including `target` itself if it declares so.
	pub fn dependents(&self, target: &str) -> crate::Result<Vec<String>> {
		Ok(self.manifests.known_manifests()?
			.into_iter()
			.filter(|m| m.depends_on(target))
			.map(|m| m.slug)
			.collect())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::Catalogue;

	fn catalogue() -> Catalogue {
		let mut c = Catalogue::new();
		/* Only registered manifests are known, registering marks them installed too */
		c.register("lib", "1.0".into(), Some(Manifest::new("lib").with_version("1.0")));
		c.register("app", "2.0".into(), Some(Manifest::new("app").with_version("2.0").with_dependency("lib", ">=1.0")));
		c.register("other", "1.0".into(), Some(Manifest::new("other").with_version("1.0").with_dependency("app", "*")));
		c
	}

	#[test]
	fn dependents_are_direct_only() {
		let c = catalogue();
		let resolver = DependencyResolver::new(&c, &c);
		assert_eq!(resolver.dependents("lib").unwrap(), ["app"]);
		assert_eq!(resolver.dependents("app").unwrap(), ["other"]);
		assert!(resolver.dependents("other").unwrap().is_empty());
	}

	#[test]
	fn info_of_installed_plugin_has_nothing_to_install() {
		let c = catalogue();
		let info = DependencyResolver::new(&c, &c).info("app");
		assert_eq!(info.direct_dependencies, [DependencyDescriptor::new("lib", ">=1.0".into())]);
		assert!(info.all_dependencies.is_empty());
		assert_eq!(info.dependents, ["other"]);
	}

	#[test]
	fn self_dependency_is_a_dependent() {
		let mut c = catalogue();
		c.register("loop", "1.0".into(), Some(Manifest::new("loop").with_version("1.0").with_dependency("loop", "*")));
		assert_eq!(DependencyResolver::new(&c, &c).dependents("loop").unwrap(), ["loop"]);
	}

	#[test]
	fn info_of_unknown_plugin_is_empty() {
		let c = catalogue();
		assert_eq!(DependencyResolver::new(&c, &c).info("nope"), DependencyInfo::default());
	}
}
