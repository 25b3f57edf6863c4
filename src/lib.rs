//! elm-infer: Hindley-Milner type inference for an Elm-like language
//!
//! Modules arrive as a metadata-parameterized syntax tree annotated with
//! source spans (usually as JSON from an external parser) and come back
//! annotated with types.
//!
//! # Example
//!
//! ```
//! use elm_infer::frontend::core::ast::build::{int, lambda, pvar};
//! use elm_infer::infer_expr;
//!
//! let ty = infer_expr(&lambda(vec![pvar("x")], int(1))).unwrap();
//! assert_eq!(ty.to_string(), "a -> number");
//! ```

#![doc(html_root_url = "https://docs.rs/elm-infer")]
#![warn(rust_2018_idioms)]

pub mod frontend;
pub mod util;

pub use frontend::core::ast::{Declaration, Expr, Module, Pattern};
pub use frontend::core::type_system::{MonoType, PolyType};
pub use frontend::typecheck::{InputError, TypeError, Typed};
pub use frontend::{infer, infer_expr, infer_module, infer_with_config, type_of, Engine, Error};

use indexmap::IndexMap;
use serde::Deserialize;
use util::span::Span;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Tool name
pub const NAME: &str = "elm-infer";

/// JSON input: one module or a list of modules
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ModuleInput {
    Many(Vec<Module<Span>>),
    One(Module<Span>),
}

/// Errors reading the JSON input
#[derive(Debug, thiserror::Error)]
pub enum ReadError {
    #[error("invalid module JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("module `{0}` appears more than once in the input")]
    DuplicateModule(String),
}

/// Parse modules from JSON, keyed by module name in input order
pub fn read_modules(json: &str) -> Result<IndexMap<String, Module<Span>>, ReadError> {
    let modules = match serde_json::from_str(json)? {
        ModuleInput::Many(modules) => modules,
        ModuleInput::One(module) => vec![module],
    };
    let mut map = IndexMap::with_capacity(modules.len());
    for module in modules {
        if map.contains_key(&module.name) {
            return Err(ReadError::DuplicateModule(module.name));
        }
        map.insert(module.name.clone(), module);
    }
    Ok(map)
}
