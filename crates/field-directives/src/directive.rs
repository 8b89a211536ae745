use async_graphql::Value;

use crate::{
    catalog::{ArgumentDefinition, DirectiveDefinition},
    error::FieldError,
    format::FormatSpec,
    invocation::DirectiveInvocation,
    transform::{self, TransformOptions},
};

/// The closed set of directives this crate knows how to apply.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DirectiveKind {
    Default,
    Base64,
    Number,
    Currency,
    Lowercase,
    Uppercase,
    Capitalize,
}

impl DirectiveKind {
    pub const ALL: [DirectiveKind; 7] = [
        DirectiveKind::Default,
        DirectiveKind::Base64,
        DirectiveKind::Number,
        DirectiveKind::Currency,
        DirectiveKind::Lowercase,
        DirectiveKind::Uppercase,
        DirectiveKind::Capitalize,
    ];

    pub fn name(self) -> &'static str {
        match self {
            DirectiveKind::Default => "default",
            DirectiveKind::Base64 => "base64",
            DirectiveKind::Number => "number",
            DirectiveKind::Currency => "currency",
            DirectiveKind::Lowercase => "lowercase",
            DirectiveKind::Uppercase => "uppercase",
            DirectiveKind::Capitalize => "capitalize",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    pub fn definition(self) -> DirectiveDefinition {
        let arguments = match self {
            DirectiveKind::Default => vec![ArgumentDefinition::required("to")],
            DirectiveKind::Number => vec![ArgumentDefinition::required("as")],
            DirectiveKind::Currency => vec![ArgumentDefinition::with_default("symbol", "$")],
            DirectiveKind::Base64 | DirectiveKind::Lowercase | DirectiveKind::Uppercase | DirectiveKind::Capitalize => {
                Vec::new()
            }
        };

        DirectiveDefinition {
            name: self.name(),
            kind: self,
            arguments,
        }
    }
}

/// A directive invocation whose arguments have been checked against its
/// definition. Ready to be applied to any number of values.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Directive {
    Default { to: String },
    Base64,
    Number { format: FormatSpec },
    Currency { symbol: String },
    Lowercase,
    Uppercase,
    Capitalize,
}

impl Directive {
    pub fn number(format: &str) -> Result<Self, FieldError> {
        let format = format.parse().map_err(|source| FieldError::InvalidFormatSpec {
            directive: DirectiveKind::Number.name().to_string(),
            source,
        })?;

        Ok(Directive::Number { format })
    }

    pub fn kind(&self) -> DirectiveKind {
        match self {
            Directive::Default { .. } => DirectiveKind::Default,
            Directive::Base64 => DirectiveKind::Base64,
            Directive::Number { .. } => DirectiveKind::Number,
            Directive::Currency { .. } => DirectiveKind::Currency,
            Directive::Lowercase => DirectiveKind::Lowercase,
            Directive::Uppercase => DirectiveKind::Uppercase,
            Directive::Capitalize => DirectiveKind::Capitalize,
        }
    }

    pub fn name(&self) -> &'static str {
        self.kind().name()
    }

    pub fn resolve(definition: &DirectiveDefinition, invocation: &DirectiveInvocation) -> Result<Self, FieldError> {
        if let Some((name, _)) = invocation
            .arguments
            .iter()
            .find(|(name, _)| definition.argument(name).is_none())
        {
            return Err(FieldError::UnknownArgument {
                directive: definition.name.to_string(),
                argument: name.to_string(),
            });
        }

        let argument = |name: &str| string_argument(definition, invocation, name);

        Ok(match definition.kind {
            DirectiveKind::Default => Directive::Default { to: argument("to")? },
            DirectiveKind::Base64 => Directive::Base64,
            DirectiveKind::Number => Directive::number(&argument("as")?)?,
            DirectiveKind::Currency => Directive::Currency {
                symbol: argument("symbol")?,
            },
            DirectiveKind::Lowercase => Directive::Lowercase,
            DirectiveKind::Uppercase => Directive::Uppercase,
            DirectiveKind::Capitalize => Directive::Capitalize,
        })
    }

    /// Applies the directive to a resolved field value. `None` stands for an
    /// absent value and is handled like `null`.
    pub fn apply(&self, value: Option<Value>, options: &TransformOptions) -> Result<Option<Value>, FieldError> {
        let value = match (self, value) {
            (Directive::Default { to }, None | Some(Value::Null)) => return Ok(Some(Value::String(to.clone()))),
            (_, None) => return Ok(None),
            (_, Some(Value::Null)) => return Ok(Some(Value::Null)),
            (_, Some(value)) => value,
        };

        let name = self.name();

        let value = match self {
            Directive::Default { .. } => value,
            Directive::Base64 => transform::base64(name, value)?,
            Directive::Number { format } => transform::number(name, value, format, options)?,
            Directive::Currency { symbol } => transform::currency(name, value, symbol, options)?,
            Directive::Lowercase => transform::lowercase(name, value)?,
            Directive::Uppercase => transform::uppercase(name, value)?,
            Directive::Capitalize => transform::capitalize(name, value)?,
        };

        Ok(Some(value))
    }
}

fn string_argument(
    definition: &DirectiveDefinition,
    invocation: &DirectiveInvocation,
    name: &str,
) -> Result<String, FieldError> {
    let directive = || definition.name.to_string();

    let Some(argument) = definition.argument(name) else {
        return Err(FieldError::UnknownArgument {
            directive: directive(),
            argument: name.to_string(),
        });
    };

    match invocation.arguments.get(name) {
        Some(Value::String(value)) => Ok(value.clone()),
        Some(Value::Enum(value)) => Ok(value.to_string()),
        Some(other) => Err(FieldError::InvalidArgument {
            directive: directive(),
            argument: name.to_string(),
            found: transform::value_kind(other),
        }),
        None => argument
            .default_value
            .map(str::to_string)
            .ok_or_else(|| FieldError::MissingArgument {
                directive: directive(),
                argument: name.to_string(),
            }),
    }
}
