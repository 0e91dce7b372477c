use super::*;

impl Catalogue {
	/// Creates a catalogue from the manifests of installed plugins found below `path`.
	/// # Parameters
	/// - `path` - Directory searched recursively for `*.json` manifests.
	/// - `do_validation` - Check each manifest against the bundled JSON schema before reading it.
	///
	/// Manifests that can't be read, don't match the schema, or have no version are skipped with a warning.
	/// # Errors
	/// - [`IO`](crate::Error::IO) or [`WalkDir`](crate::Error::WalkDir) when `path` can't be read.
	pub fn generate_from_dir(path: impl AsRef<std::path::Path>, do_validation: bool) -> crate::Result<Self> {
		let path = path.as_ref();
		log::debug!("Generating catalogue from {}", path.display());

		let compiled_schema = if do_validation {
			Some(crate::manifest::compile_schema()?)
		} else {
			None
		};

		let mut catalogue = Catalogue::new();
		for manifest in crate::manifest::import::read_manifest_dir(path, compiled_schema.as_ref())? {
			let slug = manifest.slug.clone();
			if catalogue.get(&slug).is_some() {
				log::warn!("Plugin {} is described more than once, keeping the last manifest read", slug);
			}
			if let Err(e) = catalogue.register_manifest(manifest) {
				log::warn!("Couldn't add {} to catalogue: {}", slug, e);
			}
		}

		log::info!("Catalogue generated with {} installed plugins", catalogue.len());
		Ok(catalogue)
	}

	/// Writes the catalogue to [`PlugdepOptions::catalogue_path()`](crate::PlugdepOptions::catalogue_path).
	pub fn save_to_disk(&self, options: &crate::PlugdepOptions) -> crate::Result<()> {
		use std::io::Write;

		std::fs::create_dir_all(options.data_dir())?;
		let path = options.catalogue_path();
		log::debug!("Saving catalogue to {}", path.display());

		let data = bincode::serialize(self)?;
		let mut f = std::fs::File::create(path)?;
		f.write_all(&data)?;
		Ok(())
	}

	/// Reads a catalogue previously written by [`save_to_disk()`](Catalogue::save_to_disk).
	/// # Errors
	/// - [`IO`](crate::Error::IO) when no catalogue has been saved.
	/// - [`Bincode`](crate::Error::Bincode) when the file is from an incompatible version.
	pub fn load_from_disk(options: &crate::PlugdepOptions) -> crate::Result<Self> {
		let path = options.catalogue_path();
		log::debug!("Loading catalogue from {}", path.display());

		let data = std::fs::read(path)?;
		Ok(bincode::deserialize::<Catalogue>(&data)?)
	}
}
