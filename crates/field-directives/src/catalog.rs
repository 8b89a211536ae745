use std::{fmt, num::TryFromIntError, ops::Index};

use async_graphql::Value;

use crate::{config::DirectivesConfig, directive::DirectiveKind, error::CatalogError};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DirectiveId(u16);

impl TryFrom<usize> for DirectiveId {
    type Error = TryFromIntError;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        u16::try_from(value).map(Self)
    }
}

impl DirectiveId {
    /// `ix` indexes the catalog, whose length `register` keeps within `u16`.
    fn from_index(ix: usize) -> Self {
        debug_assert!(ix <= usize::from(u16::MAX));
        Self(ix as u16)
    }
}

impl From<DirectiveId> for usize {
    fn from(id: DirectiveId) -> Self {
        id.0 as usize
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArgumentType {
    String,
    NonNullString,
}

impl ArgumentType {
    pub fn is_non_null(&self) -> bool {
        matches!(self, ArgumentType::NonNullString)
    }
}

impl fmt::Display for ArgumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgumentType::String => f.write_str("String"),
            ArgumentType::NonNullString => f.write_str("String!"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArgumentDefinition {
    pub name: &'static str,
    pub ty: ArgumentType,
    pub default_value: Option<&'static str>,
}

impl ArgumentDefinition {
    pub(crate) fn required(name: &'static str) -> Self {
        Self {
            name,
            ty: ArgumentType::NonNullString,
            default_value: None,
        }
    }

    pub(crate) fn with_default(name: &'static str, default_value: &'static str) -> Self {
        Self {
            name,
            ty: ArgumentType::NonNullString,
            default_value: Some(default_value),
        }
    }
}

/// A directive as the schema knows it: its name, the transform it selects and
/// the arguments it accepts, in declaration order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DirectiveDefinition {
    pub name: &'static str,
    pub kind: DirectiveKind,
    pub arguments: Vec<ArgumentDefinition>,
}

impl DirectiveDefinition {
    pub fn argument(&self, name: &str) -> Option<&ArgumentDefinition> {
        self.arguments.iter().find(|argument| argument.name == name)
    }

    /// The definition in SDL, e.g. `directive @currency(symbol: String! = "$") on FIELD`.
    pub fn sdl(&self) -> String {
        let mut sdl = format!("directive @{}", self.name);

        if !self.arguments.is_empty() {
            let arguments = self
                .arguments
                .iter()
                .map(|argument| match argument.default_value {
                    Some(default) => format!(
                        "{}: {} = {}",
                        argument.name,
                        argument.ty,
                        Value::String(default.to_string())
                    ),
                    None => format!("{}: {}", argument.name, argument.ty),
                })
                .collect::<Vec<_>>()
                .join(", ");

            sdl.push('(');
            sdl.push_str(&arguments);
            sdl.push(')');
        }

        sdl.push_str(" on FIELD");
        sdl
    }
}

/// Every directive a schema exposes. Built once at startup and only read afterwards.
#[derive(Debug, Default, Clone)]
pub struct DirectiveCatalog {
    directives: Vec<DirectiveDefinition>,
}

impl DirectiveCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// All built-in directives, in a stable order.
    pub fn builtin() -> Self {
        Self {
            directives: DirectiveKind::ALL.map(DirectiveKind::definition).into(),
        }
    }

    /// The built-in directives minus the ones the configuration disables.
    pub fn from_config(config: &DirectivesConfig) -> Result<Self, CatalogError> {
        if let Some(unknown) = config
            .disabled
            .iter()
            .find(|name| DirectiveKind::from_name(name).is_none())
        {
            return Err(CatalogError::UnknownDirective(unknown.clone()));
        }

        let mut catalog = Self::new();

        for kind in DirectiveKind::ALL {
            if config.disabled.iter().any(|name| name == kind.name()) {
                continue;
            }

            catalog.register(kind.definition())?;
        }

        Ok(catalog)
    }

    pub fn register(&mut self, definition: DirectiveDefinition) -> Result<DirectiveId, CatalogError> {
        if self.get_id_by_name(definition.name).is_some() {
            return Err(CatalogError::DuplicateDirective(definition.name.to_string()));
        }

        let id = DirectiveId::try_from(self.directives.len()).map_err(|_| CatalogError::Full)?;
        self.directives.push(definition);

        Ok(id)
    }

    pub fn get_id_by_name(&self, name: &str) -> Option<DirectiveId> {
        self.directives
            .iter()
            .position(|definition| definition.name == name)
            .map(DirectiveId::from_index)
    }

    pub fn lookup(&self, name: &str) -> Option<&DirectiveDefinition> {
        self.get_id_by_name(name).map(|id| &self[id])
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = &DirectiveDefinition> {
        self.directives.iter()
    }

    pub fn iter_with_id(&self) -> impl ExactSizeIterator<Item = (DirectiveId, &DirectiveDefinition)> {
        self.directives
            .iter()
            .enumerate()
            .map(|(ix, definition)| (DirectiveId::from_index(ix), definition))
    }

    pub fn len(&self) -> usize {
        self.directives.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Index<DirectiveId> for DirectiveCatalog {
    type Output = DirectiveDefinition;

    fn index(&self, id: DirectiveId) -> &Self::Output {
        &self.directives[usize::from(id)]
    }
}
