//! Frontend type inference pipeline
//!
//! Takes metadata-parameterized modules (annotated with source spans) and
//! produces the same modules annotated with types, or a single error.

use crate::util::config::InferConfig;
use crate::util::span::Span;
use self::core::ast::{Expr, Module};
use self::core::type_system::{MonoType, PolyType};
use indexmap::IndexMap;
use std::panic;
use std::thread;
use thiserror::Error;
use tracing::debug;
use self::typecheck::{InputError, TypeChecker, TypeError, Typed};

pub mod core;
pub mod typecheck;

/// Worker stack reserved per nesting level (sized for unoptimized builds)
const STACK_PER_LEVEL: usize = 128 * 1024;

/// Worker stack reserved regardless of the nesting limit
const BASE_STACK: usize = 8 * 1024 * 1024;

/// Inference engine context
#[derive(Debug, Default, Clone)]
pub struct Engine {
    config: InferConfig,
}

impl Engine {
    /// Create an engine with default settings
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an engine with the given configuration
    #[inline]
    pub fn with_config(config: InferConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &InferConfig {
        &self.config
    }

    fn checker(&self) -> TypeChecker {
        TypeChecker::new().with_max_depth(self.config.infer.max_depth)
    }

    /// Stack size that lets `max_depth` levels of nesting unwind normally
    pub fn stack_size(&self) -> usize {
        self.config
            .infer
            .max_depth
            .saturating_mul(STACK_PER_LEVEL)
            .saturating_add(BASE_STACK)
    }

    /// Run a checker on a worker thread sized for the nesting limit
    fn run<T, F>(
        &self,
        f: F,
    ) -> Result<T, Error>
    where
        T: Send,
        F: FnOnce(TypeChecker) -> Result<T, Error> + Send,
    {
        let checker = self.checker();
        thread::scope(|scope| {
            let worker = thread::Builder::new()
                .name("elm-infer".to_string())
                .stack_size(self.stack_size())
                .spawn_scoped(scope, move || f(checker))
                .map_err(|err| Error::Resource(format!("cannot start inference thread: {}", err)))?;
            match worker.join() {
                Ok(result) => result,
                Err(payload) => panic::resume_unwind(payload),
            }
        })
    }

    /// Infer every module; imports are resolved among the given modules
    pub fn infer(
        &self,
        modules: &IndexMap<String, Module<Span>>,
    ) -> Result<IndexMap<String, Module<Typed>>, Error> {
        debug!("Inferring {} module(s)", modules.len());
        let typed = self.run(|mut checker| checker.check_modules(modules))?;
        debug!("Inference successful");
        Ok(typed)
    }

    /// Infer a single module, keyed under its own name
    pub fn infer_module(
        &self,
        module: Module<Span>,
    ) -> Result<IndexMap<String, Module<Typed>>, Error> {
        let mut modules = IndexMap::new();
        modules.insert(module.name.clone(), module);
        self.infer(&modules)
    }

    /// Infer a standalone expression under the prelude
    pub fn infer_expr(
        &self,
        expr: &Expr<Span>,
    ) -> Result<MonoType, Error> {
        self.run(|mut checker| {
            let typed = checker.check_expr(expr)?;
            Ok(typed.meta.ty.body)
        })
    }
}

/// Infer every module with the default configuration
pub fn infer(modules: IndexMap<String, Module<Span>>) -> Result<IndexMap<String, Module<Typed>>, Error> {
    Engine::new().infer(&modules)
}

/// Infer with an explicit configuration
pub fn infer_with_config(
    modules: IndexMap<String, Module<Span>>,
    config: &InferConfig,
) -> Result<IndexMap<String, Module<Typed>>, Error> {
    Engine::with_config(config.clone()).infer(&modules)
}

/// Infer a single module, keyed under its own name
pub fn infer_module(module: Module<Span>) -> Result<IndexMap<String, Module<Typed>>, Error> {
    Engine::new().infer_module(module)
}

/// Infer a standalone expression and return its resolved type
pub fn infer_expr(expr: &Expr<Span>) -> Result<MonoType, Error> {
    Engine::new().infer_expr(expr)
}

/// Look up the inferred scheme of a declaration
pub fn type_of(
    modules: &IndexMap<String, Module<Typed>>,
    module_name: &str,
    declaration: &str,
) -> Result<PolyType, Error> {
    let module = modules
        .get(module_name)
        .ok_or_else(|| InputError::ModuleNotFound {
            module: module_name.to_string(),
        })?;
    let decl = module
        .declaration(declaration)
        .ok_or_else(|| InputError::DeclarationNotFound {
            module: module_name.to_string(),
            declaration: declaration.to_string(),
        })?;
    Ok(decl.meta.ty.clone())
}

/// Inference errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error("type error: {0}")]
    Type(#[from] TypeError),

    #[error("input error: {0}")]
    Input(#[from] InputError),

    /// The inference thread could not be started
    #[error("resource error: {0}")]
    Resource(String),
}

impl Error {
    /// Source span of the offending node, where known
    pub fn span(&self) -> Option<Span> {
        match self {
            Error::Type(err) => Some(err.span()),
            Error::Input(err) => err.span(),
            Error::Resource(_) => None,
        }
    }

    pub fn as_type_error(&self) -> Option<&TypeError> {
        match self {
            Error::Type(err) => Some(err),
            Error::Input(_) | Error::Resource(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::core::ast::build::*;
    use crate::frontend::typecheck::DEFAULT_MAX_DEPTH;

    fn nest(
        depth: usize,
        wrap: impl Fn(Expr<Span>) -> Expr<Span>,
    ) -> Expr<Span> {
        let mut e = int(1);
        for _ in 0..depth {
            e = wrap(e);
        }
        e
    }

    /// 默认上限以内最深的表达式在测试线程上也能推断完成
    #[test]
    fn test_default_limit_minus_one_parens() {
        // 每层括号一层，加上最内层的字面量
        let e = nest(DEFAULT_MAX_DEPTH - 1, paren);
        let ty = infer_expr(&e).unwrap();
        assert_eq!(ty.to_string(), "number");
    }

    #[test]
    fn test_default_limit_parens_rejected() {
        let e = nest(DEFAULT_MAX_DEPTH, paren);
        let err = infer_expr(&e).unwrap_err();
        assert!(
            matches!(
                err,
                Error::Type(TypeError::NestingTooDeep {
                    limit: DEFAULT_MAX_DEPTH,
                    ..
                })
            ),
            "{:?}",
            err
        );
    }

    /// lambda 体与列表交替嵌套，接近默认上限
    #[test]
    fn test_lambda_list_nesting_near_default_limit() {
        let depth = (DEFAULT_MAX_DEPTH - 2) / 2;
        let e = nest(depth, |body| lambda(vec![pwild()], list(vec![body])));
        assert!(infer_expr(&e).is_ok());
    }

    #[test]
    fn test_deep_module_declaration() {
        let body = nest(DEFAULT_MAX_DEPTH - 1, paren);
        let typed = infer_module(module("Main", vec![declaration("deep", vec![], body)])).unwrap();
        let scheme = type_of(&typed, "Main", "deep").unwrap();
        assert_eq!(scheme.to_string(), "number");
    }

    #[test]
    fn test_stack_size_grows_with_limit() {
        let small = Engine::with_config(InferConfig {
            infer: crate::util::config::InferSection { max_depth: 8 },
            ..InferConfig::default()
        });
        let large = Engine::new();
        assert!(small.stack_size() >= BASE_STACK);
        assert!(large.stack_size() > small.stack_size());
        assert_eq!(
            large.stack_size(),
            DEFAULT_MAX_DEPTH * STACK_PER_LEVEL + BASE_STACK
        );
    }
}
