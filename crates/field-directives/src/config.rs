use crate::{error::ConfigError, format::RoundingMode, transform::TransformOptions};

/// Directive settings, usually read from a `[directives]` TOML section.
#[derive(Debug, Clone, Default, PartialEq, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DirectivesConfig {
    /// How `@number` and `@currency` round the digit they drop.
    pub rounding: RoundingMode,
    /// Built-in directives that should not be exposed by the schema.
    pub disabled: Vec<String>,
}

impl DirectivesConfig {
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(input)?)
    }

    pub fn transform_options(&self) -> TransformOptions {
        TransformOptions {
            rounding: self.rounding,
        }
    }
}
