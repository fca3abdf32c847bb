use std::path::PathBuf;

use kestrel_route::TemplateError;

use crate::module::ModuleId;

/// Reasons a registration call is refused. The registry is left unchanged.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistrationError {
	#[error(transparent)]
	Template(#[from] TemplateError),
	#[error("template `{template}` is already registered in {module}")]
	DuplicateTemplate { template: String, module: ModuleId },
	#[error("template `{template}` uses unregistered constraint `{name}`")]
	UnknownConstraint { template: String, name: String },
	#[error("option token `{token}` is declared more than once on `{template}`")]
	OptionCollision { template: String, token: String },
	#[error("{module} is not registered")]
	UnknownModule { module: ModuleId },
	#[error("module `{name}` is already registered")]
	DuplicateModule { name: String },
	#[error("constraint `{name}` is already registered")]
	DuplicateConstraint { name: String },
	#[error("constraint `{name}` collides with a built-in constraint kind")]
	ReservedConstraint { name: String },
}

/// Failure loading [`RouterOptions`](crate::RouterOptions).
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
	#[error("failed to read {}: {source}", path.display())]
	Read {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},
	#[error("invalid router options: {0}")]
	Parse(#[from] toml::de::Error),
}
