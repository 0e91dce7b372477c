//! Plugin versions and the constraints manifests place on them.

mod plugin_version;
pub use plugin_version::PluginVersion;

mod constraint;
pub use constraint::VersionConstraint;

/// Checks whether an `installed` version is acceptable under `constraint`.
pub fn satisfies(installed: &PluginVersion, constraint: &VersionConstraint) -> bool {
	constraint.is_satisfied_by(installed)
}
