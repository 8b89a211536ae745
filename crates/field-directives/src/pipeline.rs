use async_graphql::Value;

use crate::{
    catalog::DirectiveCatalog,
    directive::Directive,
    error::FieldError,
    invocation::DirectiveInvocation,
    transform::TransformOptions,
};

/// The directives of one field, in the order they appear in the query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectiveChain {
    directives: Vec<Directive>,
}

impl DirectiveChain {
    pub fn new(directives: Vec<Directive>) -> Self {
        Self { directives }
    }

    /// Checks every invocation against the catalog. Fails on the first
    /// directive the catalog doesn't know or whose arguments don't match.
    pub fn resolve<'a>(
        catalog: &DirectiveCatalog,
        invocations: impl IntoIterator<Item = &'a DirectiveInvocation>,
    ) -> Result<Self, FieldError> {
        let directives = invocations
            .into_iter()
            .map(|invocation| {
                let definition = catalog
                    .lookup(invocation.name.as_str())
                    .ok_or_else(|| FieldError::UnknownDirective(invocation.name.to_string()))?;

                Directive::resolve(definition, invocation)
            })
            .collect::<Result<_, _>>()?;

        Ok(Self { directives })
    }

    /// Folds the value through each directive, feeding every output into the
    /// next directive.
    pub fn apply(&self, value: Option<Value>, options: &TransformOptions) -> Result<Option<Value>, FieldError> {
        self.directives
            .iter()
            .try_fold(value, |value, directive| directive.apply(value, options))
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = &Directive> {
        self.directives.iter()
    }

    pub fn len(&self) -> usize {
        self.directives.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
