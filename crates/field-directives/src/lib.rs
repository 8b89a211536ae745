//! Executable GraphQL directives that reshape the value a field resolved to:
//! `@default`, `@base64`, `@number`, `@currency`, `@lowercase`, `@uppercase`
//! and `@capitalize`.
//!
//! - Build a [DirectiveCatalog], either [DirectiveCatalog::builtin()] or from a
//!   [DirectivesConfig].
//! - Register it on an async-graphql schema with [register_directives()].
//!
//! The directives of a field run in the order they are written, each one
//! receiving the output of the previous one. A directive that fails nulls its
//! field and reports an error; the rest of the response is unaffected.

#![cfg_attr(test, allow(unused_crate_dependencies))]

mod catalog;
mod config;
mod directive;
mod error;
mod format;
mod hook;
mod invocation;
mod pipeline;
mod transform;

pub use catalog::{ArgumentDefinition, ArgumentType, DirectiveCatalog, DirectiveDefinition, DirectiveId};
pub use config::DirectivesConfig;
pub use directive::{Directive, DirectiveKind};
pub use error::{CatalogError, ConfigError, FieldError};
pub use format::{Align, FormatSpec, FormatSpecError, FormatType, RenderError, RoundingMode, Sign};
pub use hook::{register_configured_directives, register_directives, DirectiveHook};
pub use invocation::DirectiveInvocation;
pub use pipeline::DirectiveChain;
pub use transform::TransformOptions;
