//! 类型检查器模块
//!
//! 为 Elm 风格语言实现 Hindley-Milner 类型推断：
//! - 单态/多态类型、带超类约束的类型变量
//! - 可扩展记录的行多态
//! - 多模块推断（按导入拓扑排序）
//! - 完整标注类型的语法树输出

use crate::frontend::core::ast::{Expr, Module};
use crate::frontend::core::type_system::TypeVarSupply;
use crate::frontend::Error;
use crate::util::span::Span;
use indexmap::IndexMap;
use tracing::{debug, info};

pub mod environment;
pub mod errors;
pub mod inference;
pub mod modules;
pub mod prelude;
pub mod typed;

#[cfg(test)]
mod tests;

pub use environment::TypeEnvironment;
pub use errors::{InputError, TypeError, TypeResult};
pub use inference::{Inferrer, PatternBindings, DEFAULT_MAX_DEPTH};
pub use typed::Typed;

/// 类型检查器
///
/// 一次推断运行：拥有新变量来源，并保存已推断的模块供后续导入
#[derive(Debug)]
pub struct TypeChecker {
    supply: TypeVarSupply,
    max_depth: usize,
    checked: IndexMap<String, Module<Typed>>,
}

impl Default for TypeChecker {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeChecker {
    /// 创建新的类型检查器
    pub fn new() -> Self {
        Self {
            supply: TypeVarSupply::new(),
            max_depth: DEFAULT_MAX_DEPTH,
            checked: IndexMap::new(),
        }
    }

    /// 设置嵌套上限
    pub fn with_max_depth(
        mut self,
        max_depth: usize,
    ) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// 已推断的模块
    pub fn checked(&self) -> &IndexMap<String, Module<Typed>> {
        &self.checked
    }

    /// 推断一组模块，结果按输入顺序返回
    pub fn check_modules(
        &mut self,
        modules: &IndexMap<String, Module<Span>>,
    ) -> Result<IndexMap<String, Module<Typed>>, Error> {
        let order = modules::dependency_order(modules)?;
        debug!("module order: {}", order.join(", "));
        for name in &order {
            if let Some(module) = modules.get(name) {
                let typed = self.check_module(name, module)?;
                self.checked.insert(name.clone(), typed);
            }
        }
        Ok(modules
            .keys()
            .filter_map(|name| {
                self.checked
                    .get(name)
                    .map(|m| (name.clone(), m.clone()))
            })
            .collect())
    }

    /// 推断单个模块；其导入必须已经推断过
    pub fn check_module(
        &mut self,
        name: &str,
        module: &Module<Span>,
    ) -> Result<Module<Typed>, Error> {
        info!("checking module {}", name);
        modules::check_unique_declarations(module)?;

        let mut env = prelude::environment();
        for import in &module.imports {
            let dep = self
                .checked
                .get(&import.module)
                .ok_or_else(|| InputError::UnknownImport {
                    module: name.to_string(),
                    import: import.module.clone(),
                })?;
            modules::add_import(&mut env, import, dep);
        }

        let mut inferrer = Inferrer::new(env, &mut self.supply).with_max_depth(self.max_depth);
        let declarations = module
            .declarations
            .iter()
            .map(|decl| inferrer.infer_declaration(decl))
            .collect::<TypeResult<Vec<_>>>()?;

        Ok(Module {
            name: module.name.clone(),
            imports: module.imports.clone(),
            declarations,
        })
    }

    /// 在前置环境下推断独立表达式
    pub fn check_expr(
        &mut self,
        expr: &Expr<Span>,
    ) -> TypeResult<Expr<Typed>> {
        Inferrer::new(prelude::environment(), &mut self.supply)
            .with_max_depth(self.max_depth)
            .infer_closed_expr(expr)
    }
}
