use std::fmt;
use std::path::PathBuf;

use crate::validator::ValidationIssue;

/// Convenience alias used throughout the generator.
pub type Result<T> = std::result::Result<T, GeneratorError>;

/// Errors raised while generating a document.
///
/// Everything except [`GeneratorError::Validation`] aborts the run at the
/// first occurrence. Validation issues are collected over the whole document
/// and reported together.
#[derive(Debug)]
pub enum GeneratorError {
    /// A route name did not split into `resource.action` or
    /// `resource.relation.action` once the server segment was removed.
    MalformedRouteName {
        /// The full dotted route name
        name: String,
        /// Number of segments found after the server segment
        segments: usize,
    },
    /// A route or relation points at a resource type the server does not register.
    UnknownResource {
        /// The resource type that could not be resolved
        resource: String,
    },
    /// A relationship route names a relation the resource schema does not declare.
    UnknownRelationship {
        /// Resource type owning the relation
        resource: String,
        /// Relation name taken from the route
        relation: String,
    },
    /// A route declares an HTTP method that cannot be parsed.
    InvalidMethod {
        /// Route name
        route: String,
        /// Offending method string
        method: String,
    },
    /// The route/schema source has no server under this key.
    UnknownServer {
        /// Server key requested by the caller
        key: String,
    },
    /// The configuration source has no section for this server key.
    MissingServerConfig {
        /// Server key requested by the caller
        key: String,
    },
    /// A manifest or configuration file could not be read.
    Io {
        /// Path that failed
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },
    /// A manifest, configuration or generated document could not be (de)serialized.
    Parse {
        /// What was being parsed or written
        what: String,
        /// Parser message
        message: String,
    },
    /// The assembled document failed structural validation.
    Validation(Vec<ValidationIssue>),
}

impl GeneratorError {
    /// Build a [`GeneratorError::Parse`] from any displayable parser error.
    pub fn parse(what: impl Into<String>, err: impl fmt::Display) -> Self {
        GeneratorError::Parse {
            what: what.into(),
            message: err.to_string(),
        }
    }

    /// Issues collected by validation, if this is a validation failure.
    pub fn issues(&self) -> Option<&[ValidationIssue]> {
        match self {
            GeneratorError::Validation(issues) => Some(issues),
            _ => None,
        }
    }
}

impl fmt::Display for GeneratorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeneratorError::MalformedRouteName { name, segments } => write!(
                f,
                "Route '{}' has {} segment(s) after the server name; \
                expected 'resource.action' or 'resource.relation.action'",
                name, segments
            ),
            GeneratorError::UnknownResource { resource } => {
                write!(f, "Resource type '{}' is not registered on the server", resource)
            }
            GeneratorError::UnknownRelationship { resource, relation } => write!(
                f,
                "Resource type '{}' does not declare a relationship named '{}'",
                resource, relation
            ),
            GeneratorError::InvalidMethod { route, method } => {
                write!(f, "Route '{}' declares invalid HTTP method '{}'", route, method)
            }
            GeneratorError::UnknownServer { key } => {
                write!(f, "No JSON:API server is registered under '{}'", key)
            }
            GeneratorError::MissingServerConfig { key } => {
                write!(f, "No configuration found for server '{}'", key)
            }
            GeneratorError::Io { path, source } => {
                write!(f, "Failed to read {}: {}", path.display(), source)
            }
            GeneratorError::Parse { what, message } => {
                write!(f, "Failed to parse {}: {}", what, message)
            }
            GeneratorError::Validation(issues) => {
                write!(f, "Generated document failed validation with {} issue(s)", issues.len())
            }
        }
    }
}

impl std::error::Error for GeneratorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GeneratorError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}
