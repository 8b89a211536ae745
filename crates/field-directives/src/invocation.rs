use async_graphql::{
    parser::types::{ConstDirective, Directive},
    Name, Value, Variables,
};
use indexmap::IndexMap;

use crate::error::FieldError;

/// A directive as written on a field selection: its name and the literal
/// arguments it was given, in source order.
#[derive(Debug, Clone, PartialEq)]
pub struct DirectiveInvocation {
    pub name: Name,
    pub arguments: IndexMap<Name, Value>,
}

impl DirectiveInvocation {
    pub fn new(name: impl AsRef<str>) -> Self {
        Self {
            name: Name::new(name),
            arguments: IndexMap::new(),
        }
    }

    #[must_use]
    pub fn argument(mut self, name: impl AsRef<str>, value: impl Into<Value>) -> Self {
        self.arguments.insert(Name::new(name), value.into());
        self
    }

    /// Builds the invocation from a directive of an executable document,
    /// replacing variable references with their values.
    pub fn from_directive(directive: &Directive, variables: &Variables) -> Result<Self, FieldError> {
        let arguments = directive
            .arguments
            .iter()
            .map(|(name, value)| {
                let value = value.node.clone().into_const_with(|variable| {
                    variables
                        .get(&variable)
                        .cloned()
                        .ok_or_else(|| FieldError::UnboundVariable {
                            directive: directive.name.node.to_string(),
                            variable: variable.to_string(),
                        })
                })?;

                Ok((name.node.clone(), value))
            })
            .collect::<Result<_, FieldError>>()?;

        Ok(Self {
            name: directive.name.node.clone(),
            arguments,
        })
    }
}

impl From<&ConstDirective> for DirectiveInvocation {
    fn from(directive: &ConstDirective) -> Self {
        Self {
            name: directive.name.node.clone(),
            arguments: directive
                .arguments
                .iter()
                .map(|(name, value)| (name.node.clone(), value.node.clone()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use async_graphql::parser::{parse_query, types::Selection};

    use super::*;

    fn field_directives(query: &str) -> Vec<Directive> {
        let document = parse_query(query).unwrap();
        let (_, operation) = document.operations.iter().next().unwrap();

        match &operation.node.selection_set.node.items[0].node {
            Selection::Field(field) => field.node.directives.iter().map(|d| d.node.clone()).collect(),
            _ => unreachable!(),
        }
    }

    #[test]
    fn keeps_source_order() {
        let directives = field_directives(r#"{ price @default(to: "0") @currency(symbol: "E") @lowercase }"#);

        let invocations = directives
            .iter()
            .map(|directive| DirectiveInvocation::from_directive(directive, &Variables::default()).unwrap())
            .collect::<Vec<_>>();

        assert_eq!(
            invocations,
            vec![
                DirectiveInvocation::new("default").argument("to", "0"),
                DirectiveInvocation::new("currency").argument("symbol", "E"),
                DirectiveInvocation::new("lowercase"),
            ]
        );
    }

    #[test]
    fn resolves_variables() {
        let directives = field_directives(r#"query($format: String!) { price @number(as: $format) }"#);
        let variables = Variables::from_json(serde_json::json!({ "format": ",.2f" }));

        let invocation = DirectiveInvocation::from_directive(&directives[0], &variables).unwrap();

        assert_eq!(invocation, DirectiveInvocation::new("number").argument("as", ",.2f"));
    }

    #[test]
    fn unbound_variable() {
        let directives = field_directives(r#"query($format: String!) { price @number(as: $format) }"#);

        let error = DirectiveInvocation::from_directive(&directives[0], &Variables::default()).unwrap_err();

        assert_eq!(
            error,
            FieldError::UnboundVariable {
                directive: "number".to_string(),
                variable: "format".to_string(),
            }
        );
    }
}
