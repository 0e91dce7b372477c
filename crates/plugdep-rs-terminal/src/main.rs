use plugdep_rs::{Catalogue, DependencyResolver, Manifest, PlugdepOptions};

fn main() {
	let mut opts;

	/* Parse console input */
	let parsed_options = {
		let args: Vec<String> = std::env::args().collect();

		opts = getopts::Options::new();
		opts.optflag( "h", "help",       "Show help");
		opts.optflag( "v", "verbose",    "Increased vebosity");
		opts.optopt(  "d", "data-dir",   "Directory the catalogue is kept in", "DIR");
		opts.optopt(  "a", "available",  "Directory of manifests for plugins not yet installed", "DIR");
		opts.parsing_style(getopts::ParsingStyle::FloatingFrees);

		let parsed_options = match opts.parse(&args[1..]) {
			Ok(m)  => { m }
			Err(e) => { println!("Unable to parse options: {}", e); std::process::exit(2) }
		};

		if parsed_options.opt_present("h") || parsed_options.free.is_empty() {
			eprintln!("{}", opts.usage("Usage: plugdep [options] import <DIR> | resolve <SLUG> | info <SLUG>"));
			return;
		}

		parsed_options
	};

	{
		let mut builder = env_logger::Builder::from_default_env();
		if parsed_options.opt_present("v") {
			builder.filter_level(log::LevelFilter::Debug);
		}
		builder.init();
	}

	let mut options = PlugdepOptions::default();
	if let Some(dir) = parsed_options.opt_str("d") {
		if !options.set_data_dir(std::path::PathBuf::from(&dir)) {
			log::error!("Data directory {} does not exist.", dir);
			std::process::exit(2);
		}
	}

	let command = parsed_options.free[0].as_str();
	let argument = parsed_options.free.get(1);

	let res = match (command, argument) {
		("import", Some(dir)) => import(&options, dir),
		("resolve", Some(slug)) => resolve(&options, slug, parsed_options.opt_str("a")),
		("info", Some(slug)) => info(&options, slug),
		("import", None) | ("resolve", None) | ("info", None) => Err(Error::MissingArgument),
		(other, _) => Err(Error::UnknownCommand(other.to_string())),
	};

	if let Err(e) = res {
		log::error!("{}", e);
		std::process::exit(1);
	}
}

fn load_catalogue(options: &PlugdepOptions) -> Result<Catalogue, Error> {
	match Catalogue::load_from_disk(options) {
		Ok(c) => Ok(c),
		Err(plugdep_rs::Error::IO(e)) if e.kind() == std::io::ErrorKind::NotFound => {
			log::warn!("No catalogue found in {}, treating nothing as installed. Run `plugdep import` first.", options.data_dir().display());
			Ok(Catalogue::new())
		},
		Err(plugdep_rs::Error::Bincode(e)) => {
			log::error!("Failed to read catalogue, format likely changed. Run `plugdep import` again. Error: {}", e);
			Err(Error::CatalogueUnreadable)
		},
		Err(e) => Err(e.into()),
	}
}

fn import(options: &PlugdepOptions, dir: &str) -> Result<(), Error> {
	log::trace!("Importing installed manifests from {}", dir);

	let catalogue = Catalogue::generate_from_dir(dir, options.validate_manifests())?;
	catalogue.save_to_disk(options)?;

	println!("Imported {} installed plugins.", catalogue.len());
	Ok(())
}

fn resolve(options: &PlugdepOptions, slug: &str, available_dir: Option<String>) -> Result<(), Error> {
	let catalogue = load_catalogue(options)?;

	let available = match available_dir {
		Some(dir) => Manifest::load_dir(dir)?,
		None => Vec::new(),
	};
	log::debug!("{} candidate manifests available", available.len());

	let result = DependencyResolver::new(&catalogue, &catalogue).resolve(slug, &available);

	for warning in result.warning_messages() {
		println!("warning: {}", warning);
	}

	if !result.success {
		for error in result.error_messages() {
			println!("error: {}", error);
		}
		return Err(Error::Resolver);
	}

	if result.ordered_install_list.is_empty() {
		println!("{} is already installed.", slug);
	} else {
		println!("Install order:");
		for (i, plugin) in result.ordered_install_list.iter().enumerate() {
			println!("\t{}) {}", i + 1, plugin);
		}
	}
	Ok(())
}

fn info(options: &PlugdepOptions, slug: &str) -> Result<(), Error> {
	let catalogue = load_catalogue(options)?;
	let info = DependencyResolver::new(&catalogue, &catalogue).info(slug);

	println!("Dependencies of {}:", slug);
	for dep in &info.direct_dependencies {
		println!("\t{} {}", dep.slug, dep.constraint);
	}
	println!("All dependencies: {}", info.all_dependencies.join(", "));
	println!("Conflicts: {}", info.conflicts.join(", "));
	println!("Recommends: {}", info.recommendations.join(", "));
	println!("Required by: {}", info.dependents.join(", "));
	Ok(())
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("plugdep-rs error: {0}")]
	PlugdepError(#[from] plugdep_rs::Error),
	#[error("Missing argument")]
	MissingArgument,
	#[error("Unknown command {0}")]
	UnknownCommand(String),
	#[error("Catalogue unreadable")]
	CatalogueUnreadable,
	#[error("Dependencies could not be resolved")]
	Resolver,
}
