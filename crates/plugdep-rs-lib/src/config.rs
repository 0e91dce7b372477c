pub struct PlugdepOptions {
	data_dir: std::path::PathBuf,
	validate_manifests: bool,
}

impl Default for PlugdepOptions {
	fn default() -> Self {
		Self {
			data_dir: {
				#[cfg(target_os = "windows")]
				let path = std::env::var("APPDATA").map(std::path::PathBuf::from).unwrap_or_default();

				#[cfg(not(target_os = "windows"))]
				let path = if let Ok(e) = std::env::var("XDG_DATA_HOME") {
					std::path::PathBuf::from(e)
				} else {
					std::env::var("HOME").map(std::path::PathBuf::from).unwrap_or_default().join(".local/share")
				};

				/* Created on first save rather than here */
				path.join("plugdep-rs")
			},
			validate_manifests: true,
		}
	}
}

impl PlugdepOptions {
	pub fn data_dir(&self) -> &std::path::PathBuf {
		&self.data_dir
	}
	/// returns if the directory is valid or not.
	pub fn set_data_dir(&mut self, data_dir: std::path::PathBuf) -> bool {
		if data_dir.is_dir() {
			self.data_dir = data_dir;
			true
		} else {
			false
		}
	}

	/// Where [`Catalogue::save_to_disk`](crate::Catalogue::save_to_disk) writes to.
	pub fn catalogue_path(&self) -> std::path::PathBuf {
		self.data_dir.join("catalogue.bin")
	}

	pub fn validate_manifests(&self) -> bool {
		self.validate_manifests
	}
	pub fn set_validate_manifests(&mut self, validate_manifests: bool) {
		self.validate_manifests = validate_manifests;
	}
}
