//! Binding of the directives to async-graphql.
//!
//! Every directive of the catalog is registered on the schema so that queries
//! using it validate and show up in introspection. At execution time the
//! outermost of a field's directives runs the whole [`DirectiveChain`] once the
//! resolver produced its value; the others let the value through untouched.

use std::{borrow::Cow, sync::Arc};

use async_graphql::{
    extensions::ResolveFut,
    parser::types::{Directive as QueryDirective, Field},
    registry::Registry,
    Context, ContextDirective, CustomDirective, CustomDirectiveFactory, Pos, SchemaBuilder, ServerError,
    ServerResult, Value, Variables,
};

use crate::{
    catalog::DirectiveCatalog,
    config::DirectivesConfig,
    directive::DirectiveKind,
    error::{ConfigError, FieldError},
    invocation::DirectiveInvocation,
    pipeline::DirectiveChain,
    transform::TransformOptions,
};

/// Registers every directive of the catalog on the schema.
pub fn register_directives<Query, Mutation, Subscription>(
    mut builder: SchemaBuilder<Query, Mutation, Subscription>,
    catalog: DirectiveCatalog,
    options: TransformOptions,
) -> SchemaBuilder<Query, Mutation, Subscription> {
    let runtime = Arc::new(Runtime { catalog, options });

    for definition in runtime.catalog.iter() {
        tracing::debug!(directive = definition.name, "registering field directive");

        builder = match definition.kind {
            DirectiveKind::Default => builder.directive(DirectiveFactory::new(default_directive, &runtime)),
            DirectiveKind::Base64 => builder.directive(DirectiveFactory::new(base64_directive, &runtime)),
            DirectiveKind::Number => builder.directive(DirectiveFactory::new(number_directive, &runtime)),
            DirectiveKind::Currency => builder.directive(DirectiveFactory::new(currency_directive, &runtime)),
            DirectiveKind::Lowercase => builder.directive(DirectiveFactory::new(lowercase_directive, &runtime)),
            DirectiveKind::Uppercase => builder.directive(DirectiveFactory::new(uppercase_directive, &runtime)),
            DirectiveKind::Capitalize => builder.directive(DirectiveFactory::new(capitalize_directive, &runtime)),
        };
    }

    builder
}

/// [`register_directives`] with the catalog and options described by the configuration.
pub fn register_configured_directives<Query, Mutation, Subscription>(
    builder: SchemaBuilder<Query, Mutation, Subscription>,
    config: &DirectivesConfig,
) -> Result<SchemaBuilder<Query, Mutation, Subscription>, ConfigError> {
    let catalog = DirectiveCatalog::from_config(config)?;

    Ok(register_directives(builder, catalog, config.transform_options()))
}

struct Runtime {
    catalog: DirectiveCatalog,
    options: TransformOptions,
}

impl Runtime {
    fn is_known(&self, directive: &QueryDirective) -> bool {
        self.catalog.lookup(directive.name.node.as_str()).is_some()
    }

    /// Position of the last directive of the field this crate handles.
    fn outermost(&self, field: &Field) -> Option<Pos> {
        field
            .directives
            .iter()
            .rev()
            .find(|directive| self.is_known(&directive.node))
            .map(|directive| directive.pos)
    }

    fn chain(&self, field: &Field, variables: &Variables) -> Result<DirectiveChain, FieldError> {
        let invocations = field
            .directives
            .iter()
            .filter(|directive| self.is_known(&directive.node))
            .map(|directive| DirectiveInvocation::from_directive(&directive.node, variables))
            .collect::<Result<Vec<_>, _>>()?;

        DirectiveChain::resolve(&self.catalog, &invocations)
    }
}

/// Wraps the factory generated for a directive definition: the schema
/// metadata comes from it, execution is ours.
struct DirectiveFactory<T> {
    definition: T,
    runtime: Arc<Runtime>,
}

impl<T> DirectiveFactory<T> {
    fn new(definition: T, runtime: &Arc<Runtime>) -> Self {
        Self {
            definition,
            runtime: Arc::clone(runtime),
        }
    }
}

impl<T: CustomDirectiveFactory> CustomDirectiveFactory for DirectiveFactory<T> {
    fn name(&self) -> Cow<'static, str> {
        self.definition.name()
    }

    fn register(&self, registry: &mut Registry) {
        self.definition.register(registry);
    }

    fn create(
        &self,
        ctx: &ContextDirective<'_>,
        _directive: &QueryDirective,
    ) -> ServerResult<Box<dyn CustomDirective>> {
        Ok(Box::new(DirectiveHook {
            position: ctx.item.pos,
            runtime: Arc::clone(&self.runtime),
        }))
    }
}

/// One directive occurrence on a field selection. The last occurrence the
/// catalog knows runs the field's whole [`DirectiveChain`].
pub struct DirectiveHook {
    position: Pos,
    runtime: Arc<Runtime>,
}

#[async_trait::async_trait]
impl CustomDirective for DirectiveHook {
    async fn resolve_field(&self, ctx: &Context<'_>, resolve: ResolveFut<'_>) -> ServerResult<Option<Value>> {
        let value = resolve.await?;
        let field = &ctx.item.node;

        if self.runtime.outermost(field) != Some(self.position) {
            return Ok(value);
        }

        let result = self
            .runtime
            .chain(field, &ctx.query_env.variables)
            .and_then(|chain| chain.apply(value, &self.runtime.options));

        match result {
            Ok(value) => Ok(value),
            Err(error) => {
                tracing::debug!(directive = error.directive(), field = field.name.node.as_str(), "{error}");

                let error = ServerError::new(error.to_string(), Some(ctx.item.pos));
                ctx.add_error(ctx.set_error_path(error));

                Ok(Some(Value::Null))
            }
        }
    }
}

/// Stands in for the generated directive instances, which are never created
/// since [`DirectiveFactory`] takes over execution.
struct Passthrough;

impl CustomDirective for Passthrough {}

/// Replaces a null value with `to`.
#[async_graphql::Directive(name = "default", location = "Field")]
fn default_directive(#[graphql(name = "to")] _to: String) -> impl CustomDirective {
    Passthrough
}

/// Encodes the value as standard base64.
#[async_graphql::Directive(name = "base64", location = "Field")]
fn base64_directive() -> impl CustomDirective {
    Passthrough
}

/// Formats a number, e.g. `@number(as: "0,.1f")`.
#[async_graphql::Directive(name = "number", location = "Field")]
fn number_directive(#[graphql(name = "as")] _format: String) -> impl CustomDirective {
    Passthrough
}

/// Formats a number as an amount of money with two decimals.
#[async_graphql::Directive(name = "currency", location = "Field")]
fn currency_directive(#[graphql(name = "symbol", default = "$")] _symbol: String) -> impl CustomDirective {
    Passthrough
}

/// Lowercases the value.
#[async_graphql::Directive(name = "lowercase", location = "Field")]
fn lowercase_directive() -> impl CustomDirective {
    Passthrough
}

/// Uppercases the value.
#[async_graphql::Directive(name = "uppercase", location = "Field")]
fn uppercase_directive() -> impl CustomDirective {
    Passthrough
}

/// Lowercases the value, then uppercases its first character.
#[async_graphql::Directive(name = "capitalize", location = "Field")]
fn capitalize_directive() -> impl CustomDirective {
    Passthrough
}
