//! Functions and methods for reading manifests from JSON

use super::*;
use crate::Error::Parse;

/// One dependency as it is written in a manifest.
///
/// Manifests declare dependencies in one of two shapes, these are normalized into a
/// [`DependencyDescriptor`] as soon as the manifest is read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DependencyDeclaration {
	/// An entry of `depends_on`, a bare identifier accepting any version.
	Legacy(String),
	/// An entry of `requires.plugins`, `{ "slug": ..., "version": ... }`.
	Structured { slug: String, version: Option<String> },
}

impl DependencyDeclaration {
	pub fn into_descriptor(self) -> DependencyDescriptor {
		match self {
			DependencyDeclaration::Legacy(slug) => DependencyDescriptor::new(slug, VersionConstraint::Any),
			DependencyDeclaration::Structured { slug, version } => DependencyDescriptor::new(
				slug,
				version.as_deref().map(VersionConstraint::parse).unwrap_or_default(),
			),
		}
	}
}

impl Manifest {
	/// Reads a manifest from a parsed `plugin.json` document.
	///
	/// Legacy declarations are applied first so a structured entry for the same slug wins.
	pub fn read_from_json(v: serde_json::Value) -> crate::Result<Self> {
		let obj = v.as_object().ok_or_else(|| Parse("manifest must be an object".to_string()))?;

		let mut manifest = Manifest::new(
			obj.get("slug")
				.and_then(|s| s.as_str())
				.ok_or_else(|| Parse("manifest has no slug".to_string()))?
		);

		if let Some(v) = obj.get("version") {
			manifest.version = Some(PluginVersion::new(&version_string(v)?));
		}

		for declaration in read_declarations(obj)? {
			let descriptor = declaration.into_descriptor();
			manifest.insert_dependency(descriptor.slug, descriptor.constraint);
		}

		manifest.conflicts_with = get_one_or_many_string(obj, "conflicts_with")?;
		manifest.recommends = get_one_or_many_string(obj, "recommends")?;

		Ok(manifest)
	}

	pub fn read_from_str(s: &str) -> crate::Result<Self> {
		Self::read_from_json(serde_json::from_str(s)?)
	}
}

fn read_declarations(obj: &serde_json::Map<String, serde_json::Value>) -> crate::Result<Vec<DependencyDeclaration>> {
	let mut declarations: Vec<_> = get_one_or_many_string(obj, "depends_on")?
		.into_iter()
		.map(DependencyDeclaration::Legacy)
		.collect();

	let plugins = match obj.get("requires") {
		None | Some(serde_json::Value::Null) => None,
		Some(requires) => requires.as_object()
			.ok_or_else(|| Parse("requires must be an object".to_string()))?
			.get("plugins"),
	};

	match plugins {
		None | Some(serde_json::Value::Null) => {},
		Some(serde_json::Value::Array(arr)) => {
			for elem in arr {
				let entry = elem.as_object().ok_or_else(|| Parse("requires.plugins elements must be objects".to_string()))?;
				/* Entries without a slug can't be resolved to anything, they are ignored */
				let Some(slug) = entry.get("slug").and_then(|s| s.as_str()) else { continue };
				let version = match entry.get("version") {
					None | Some(serde_json::Value::Null) => None,
					Some(v) => Some(version_string(v)?),
				};
				declarations.push(DependencyDeclaration::Structured { slug: slug.to_string(), version });
			}
		},
		Some(_) => return Err(Parse("requires.plugins must be an array".to_string())),
	}

	Ok(declarations)
}

/// Versions are usually strings but some manifests write them as bare numbers.
///
/// Only whole numbers are accepted, a JSON `1.10` has already lost its trailing zero and would read as `1.1`.
fn version_string(v: &serde_json::Value) -> crate::Result<String> {
	match v {
		serde_json::Value::String(s) => Ok(s.clone()),
		serde_json::Value::Number(n) if n.is_u64() || n.is_i64() => Ok(n.to_string()),
		serde_json::Value::Number(n) => Err(Parse(format!("version {} must be quoted, fractional numbers lose digits", n))),
		_ => Err(Parse("version must be a string".to_string())),
	}
}

/// Reads a field that may be a single string or an array of strings, a missing field is empty.
fn get_one_or_many_string(obj: &serde_json::Map<String, serde_json::Value>, key: &str) -> crate::Result<Vec<String>> {
	match obj.get(key) {
		None | Some(serde_json::Value::Null) => Ok(Vec::new()),
		Some(serde_json::Value::String(s)) => Ok(vec![s.clone()]),
		Some(serde_json::Value::Array(arr)) => arr.iter()
			.map(|e| e.as_str().map(str::to_string).ok_or_else(|| Parse(format!("{} elements must be strings", key))))
			.collect(),
		Some(_) => Err(Parse(format!("{} must be a string or array of strings", key))),
	}
}

/// Compiles the bundled manifest JSON schema.
pub fn compile_schema() -> crate::Result<jsonschema::JSONSchema> {
	let schema: serde_json::Value = serde_json::from_str(include_str!("plugin-manifest.schema"))?;
	jsonschema::JSONSchema::compile(&schema).map_err(|e| crate::Error::Validation(e.to_string()))
}

/// Reads every `*.json` file below `path` as a manifest, skipping any that fail.
pub(crate) fn read_manifest_dir(path: &std::path::Path, schema: Option<&jsonschema::JSONSchema>) -> crate::Result<Vec<Manifest>> {
	let mut manifests = Vec::<Manifest>::new();

	for entry in walkdir::WalkDir::new(path).sort_by(|a, b| a.file_name().cmp(b.file_name())) {
		let entry = entry?;
		if !entry.file_type().is_file() || entry.path().extension().map_or(true, |e| e != "json") {
			continue;
		}

		let json = {
			let data = std::fs::read(entry.path())?;
			match serde_json::from_slice::<serde_json::Value>(&data) {
				Ok(v) => v,
				Err(e) => {
					log::warn!("Couldn't process manifest {}, failed to deserialize as JSON: {}", entry.path().display(), e);
					continue;
				},
			}
		};

		if let Some(schema) = schema {
			if !schema.is_valid(&json) {
				log::warn!("Couldn't process manifest {}, does not match schema", entry.path().display());
				continue;
			}
		}

		match Manifest::read_from_json(json) {
			Ok(m) => manifests.push(m),
			Err(e) => log::warn!("Couldn't process manifest {}: {}", entry.path().display(), e),
		}
	}

	Ok(manifests)
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	#[test]
	fn legacy_dependencies_accept_any_version() {
		let m = Manifest::read_from_json(json!({ "slug": "a", "depends_on": ["b", "c"] })).unwrap();
		assert_eq!(m.dependencies(), [
			DependencyDescriptor::new("b", VersionConstraint::Any),
			DependencyDescriptor::new("c", VersionConstraint::Any),
		]);
	}

	#[test]
	fn structured_dependencies_read_constraints() {
		let m = Manifest::read_from_json(json!({
			"slug": "a",
			"requires": { "plugins": [ { "slug": "b", "version": ">=2.0.0" }, { "slug": "c" } ] }
		})).unwrap();
		assert_eq!(m.dependency("b").unwrap().constraint, VersionConstraint::parse(">=2.0.0"));
		assert_eq!(m.dependency("c").unwrap().constraint, VersionConstraint::Any);
	}

	#[test]
	fn structured_dependency_overrides_legacy() {
		let m = Manifest::read_from_json(json!({
			"slug": "a",
			"depends_on": ["b"],
			"requires": { "plugins": [ { "slug": "b", "version": "<3" } ] }
		})).unwrap();
		assert_eq!(m.dependencies().len(), 1);
		assert_eq!(m.dependency("b").unwrap().constraint, VersionConstraint::parse("<3"));
	}

	#[test]
	fn structured_entry_without_slug_is_skipped() {
		let m = Manifest::read_from_json(json!({
			"slug": "a",
			"requires": { "plugins": [ { "version": "1.0" } ] }
		})).unwrap();
		assert!(m.dependencies().is_empty());
	}

	#[test]
	fn conflicts_and_recommends_accept_one_or_many() {
		let m = Manifest::read_from_json(json!({
			"slug": "a",
			"version": 2,
			"conflicts_with": "c",
			"recommends": ["d", "e"]
		})).unwrap();
		assert_eq!(m.version, Some(PluginVersion::new("2")));
		assert_eq!(m.conflicts_with, ["c"]);
		assert_eq!(m.recommends, ["d", "e"]);
	}

	#[test]
	fn fractional_number_version_is_an_error() {
		assert!(matches!(Manifest::read_from_json(json!({ "slug": "a", "version": 1.10 })), Err(Parse(_))));
		assert!(matches!(Manifest::read_from_json(json!({
			"slug": "a",
			"requires": { "plugins": [ { "slug": "b", "version": 2.5 } ] }
		})), Err(Parse(_))));
	}

	#[test]
	fn fractional_number_version_fails_schema() {
		let schema = compile_schema().unwrap();
		assert!(!schema.is_valid(&json!({ "slug": "a", "version": 1.10 })));
		assert!(schema.is_valid(&json!({ "slug": "a", "version": 2 })));
	}

	#[test]
	fn missing_slug_is_an_error() {
		assert!(matches!(Manifest::read_from_json(json!({ "depends_on": ["b"] })), Err(Parse(_))));
	}

	#[test]
	fn manifest_json_schema_compiles() {
		compile_schema().expect("schema isn't valid");
	}
}
