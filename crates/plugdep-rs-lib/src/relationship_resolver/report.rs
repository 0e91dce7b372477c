use crate::version::{PluginVersion, VersionConstraint};

/// Reasons a plugin can't be installed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolutionError {
	/// The target or one of its dependencies has no manifest anywhere.
	#[error("Plugin not found: {0}")]
	MissingManifest(String),
	/// An installed dependency is outside the version range a dependent asks for.
	#[error("Incompatible version: {dependent} requires {dependency} {constraint}, but {installed} is installed")]
	VersionMismatch {
		dependent: String,
		dependency: String,
		constraint: VersionConstraint,
		installed: PluginVersion,
	},
	/// A plugin declares a conflict with one that is installed.
	#[error("Plugin {plugin} conflicts with installed plugin {conflict}")]
	ConflictDetected { plugin: String, conflict: String },
	/// Plugins that aren't installed depend on each other in a loop.
	#[error("Circular dependency detected: {}", .cycle.join(" -> "))]
	CircularDependency { cycle: Vec<String> },
	/// A lookup failed, nothing else is known about the resolve.
	#[error("Failed to resolve dependencies: {0}")]
	InternalFailure(String),
}

/// Advisory notes that never stop an install.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionWarning {
	RecommendationNotInstalled { plugin: String, recommended: String },
}

impl std::fmt::Display for ResolutionWarning {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			ResolutionWarning::RecommendationNotInstalled { recommended, .. } => write!(f, "Recommended plugin not installed: {}", recommended),
		}
	}
}

/// Outcome of [`DependencyResolver::resolve()`](super::DependencyResolver::resolve).
///
/// When `success` is `false` nothing should be installed, `errors` says why.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolutionResult {
	pub success: bool,
	/// Plugins still to be installed, dependencies before dependents. Already installed plugins are left out.
	pub ordered_install_list: Vec<String>,
	pub errors: Vec<ResolutionError>,
	pub warnings: Vec<ResolutionWarning>,
}

impl ResolutionResult {
	pub(super) fn complete(ordered_install_list: Vec<String>, warnings: Vec<ResolutionWarning>) -> Self {
		Self {
			success: true,
			ordered_install_list,
			errors: Vec::new(),
			warnings,
		}
	}

	pub(super) fn failed(errors: Vec<ResolutionError>, warnings: Vec<ResolutionWarning>) -> Self {
		Self {
			success: false,
			ordered_install_list: Vec::new(),
			errors,
			warnings,
		}
	}

	pub fn error_messages(&self) -> Vec<String> {
		self.errors.iter().map(ToString::to_string).collect()
	}

	pub fn warning_messages(&self) -> Vec<String> {
		self.warnings.iter().map(ToString::to_string).collect()
	}
}
