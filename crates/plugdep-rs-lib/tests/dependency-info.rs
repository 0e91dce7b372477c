use plugdep_rs::{Catalogue, DependencyResolver, Manifest, PluginVersion};
use plugdep_rs::relationship_resolver::DependencyInfo;
use plugdep_rs_test_utils::FailingLookup;

fn init_log() {
	let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn info_of_plugin_installed_without_dependencies() {
	init_log();
	let mut catalogue = Catalogue::new();
	catalogue.register("core", PluginVersion::new("1.0"), None);
	catalogue.register_manifest(
		Manifest::new("app").with_version("1.0")
			.with_dependency("core", ">=1.0")
			.with_dependency("ui", "*")
			.with_conflict("legacy-app")
			.with_recommendation("themes")
	).unwrap();
	catalogue.register_manifest(Manifest::new("plugin-a").with_version("0.1").with_dependency("app", "*")).unwrap();
	catalogue.register_manifest(Manifest::new("plugin-b").with_version("0.1").with_dependency("app", "<2")).unwrap();

	let info = DependencyResolver::new(&catalogue, &catalogue).info("app");

	assert_eq!(info.direct_dependencies.iter().map(|d| d.slug.as_str()).collect::<Vec<_>>(), ["core", "ui"]);
	assert_eq!(info.conflicts, ["legacy-app"]);
	assert_eq!(info.recommendations, ["themes"]);
	assert_eq!(info.dependents, ["plugin-a", "plugin-b"]);
	/* Already installed, nothing left to install */
	assert!(info.all_dependencies.is_empty());
}

#[test]
fn failing_lookup_gives_empty_info() {
	init_log();
	let info = DependencyResolver::new(&FailingLookup, &FailingLookup).info("app");
	assert_eq!(info, DependencyInfo::default());
}

#[test]
fn dependents_propagates_lookup_failure() {
	init_log();
	assert!(matches!(
		DependencyResolver::new(&FailingLookup, &FailingLookup).dependents("app"),
		Err(plugdep_rs::Error::Lookup(_))
	));
}

/// Manifests of plugins that can be installed, none of them installed.
struct Registry(Vec<Manifest>);

impl plugdep_rs::relationship_resolver::ManifestProvider for Registry {
	fn get_manifest(&self, slug: &str, available: &[Manifest]) -> plugdep_rs::Result<Option<Manifest>> {
		use plugdep_rs::relationship_resolver::find_available;
		Ok(find_available(slug, &self.0).or_else(|| find_available(slug, available)).cloned())
	}

	fn known_manifests(&self) -> plugdep_rs::Result<Vec<Manifest>> {
		Ok(self.0.clone())
	}
}

#[test]
fn info_lists_everything_that_would_be_installed() {
	init_log();
	let registry = Registry(vec![
		Manifest::new("app").with_dependency("ui", "*"),
		Manifest::new("ui").with_dependency("core", "*"),
		Manifest::new("core"),
	]);
	let info = DependencyResolver::new(&registry, &Catalogue::new()).info("app");

	assert_eq!(info.all_dependencies, ["core", "ui", "app"]);
	assert_eq!(info.all_dependencies, DependencyResolver::new(&registry, &Catalogue::new()).resolve("app", &[]).ordered_install_list);
	assert!(info.dependents.is_empty());
	assert_eq!(DependencyResolver::new(&registry, &Catalogue::new()).dependents("core").unwrap(), ["ui"]);
}

#[test]
fn unresolvable_plugin_has_no_dependency_list() {
	init_log();
	let registry = Registry(vec![Manifest::new("app").with_dependency("gone", "*")]);
	let info = DependencyResolver::new(&registry, &Catalogue::new()).info("app");

	assert!(info.all_dependencies.is_empty());
	assert_eq!(info.direct_dependencies.len(), 1);
}
