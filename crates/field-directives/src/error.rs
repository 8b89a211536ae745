use crate::format::FormatSpecError;

/// Errors raised while building the directive catalog. These are configuration
/// errors and are expected to abort startup.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("directive @{0} is already registered")]
    DuplicateDirective(String),
    #[error("unknown directive @{0}")]
    UnknownDirective(String),
    #[error("the directive catalog is full")]
    Full,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid directives configuration: {0}")]
    Parse(#[from] toml::de::Error),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// An error scoped to a single field. It never aborts the whole response: the
/// field becomes null and the error is reported next to the data.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    #[error("unknown directive @{0}")]
    UnknownDirective(String),
    #[error("@{directive} has no argument named \"{argument}\"")]
    UnknownArgument { directive: String, argument: String },
    #[error("@{directive} requires the argument \"{argument}\"")]
    MissingArgument { directive: String, argument: String },
    #[error("@{directive}: variable ${variable} is not defined")]
    UnboundVariable { directive: String, variable: String },
    #[error("@{directive} argument \"{argument}\" must be a string, got {found}")]
    InvalidArgument {
        directive: String,
        argument: String,
        found: &'static str,
    },
    #[error("@{directive}: {source}")]
    InvalidFormatSpec {
        directive: String,
        #[source]
        source: FormatSpecError,
    },
    #[error("@{directive} expects {expected}, got {found}")]
    TypeConversion {
        directive: String,
        expected: &'static str,
        found: &'static str,
    },
    #[error("@{directive}: cannot convert \"{value}\" into a number")]
    InvalidNumber { directive: String, value: String },
    #[error("@{directive}: \"{value}\" is not an integer")]
    IntegerRequired { directive: String, value: String },
    #[error("@{directive}: \"{value}\" is out of range")]
    NumberOutOfRange { directive: String, value: String },
}

impl FieldError {
    /// Name of the directive that failed.
    pub fn directive(&self) -> &str {
        match self {
            FieldError::UnknownDirective(directive)
            | FieldError::UnknownArgument { directive, .. }
            | FieldError::MissingArgument { directive, .. }
            | FieldError::UnboundVariable { directive, .. }
            | FieldError::InvalidArgument { directive, .. }
            | FieldError::InvalidFormatSpec { directive, .. }
            | FieldError::TypeConversion { directive, .. }
            | FieldError::InvalidNumber { directive, .. }
            | FieldError::IntegerRequired { directive, .. }
            | FieldError::NumberOutOfRange { directive, .. } => directive,
        }
    }
}
