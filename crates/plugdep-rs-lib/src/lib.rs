pub mod error;
pub use error::Result;
pub use error::Error;

pub mod version;
pub use version::PluginVersion;
pub use version::VersionConstraint;

pub mod manifest;
pub use manifest::Manifest;

pub mod catalogue;
pub use catalogue::Catalogue;

pub mod config;
pub use config::PlugdepOptions;

pub mod relationship_resolver;
pub use relationship_resolver::DependencyResolver;
pub use relationship_resolver::ResolutionResult;
