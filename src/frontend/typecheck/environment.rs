//! 类型环境
//!
//! 名称到类型方案的映射，按作用域分层。最外层是模块级作用域
//! （前置定义、导入、已推断的顶层声明），内层由 lambda、let、case 分支压入。

use crate::frontend::core::type_system::{PolyType, Substitution, TypeVarId};
use std::collections::{HashMap, HashSet};

/// 类型环境
#[derive(Debug, Clone)]
pub struct TypeEnvironment {
    scopes: Vec<HashMap<String, PolyType>>,
}

impl Default for TypeEnvironment {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeEnvironment {
    /// 创建只含一个空的模块级作用域的环境
    pub fn new() -> Self {
        Self {
            scopes: vec![HashMap::new()],
        }
    }

    /// 添加变量到当前作用域
    pub fn add_var(
        &mut self,
        name: impl Into<String>,
        poly: PolyType,
    ) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name.into(), poly);
        }
    }

    /// 获取变量（从最内层作用域开始查找）
    pub fn get_var(
        &self,
        name: &str,
    ) -> Option<&PolyType> {
        self.scopes.iter().rev().find_map(|scope| scope.get(name))
    }

    /// 进入新作用域
    pub fn enter_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    /// 退出当前作用域；模块级作用域不会被弹出
    pub fn exit_scope(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
    }

    /// 当前作用域深度（模块级为 1）
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    /// 经替换后环境中所有方案的自由变量
    pub fn free_type_vars(
        &self,
        subst: &Substitution,
    ) -> HashSet<TypeVarId> {
        self.scopes
            .iter()
            .flat_map(|scope| scope.values())
            .flat_map(|poly| subst.apply_poly(poly).free_type_vars())
            .map(|v| v.id)
            .collect()
    }

    /// 所有可见名称（内层遮蔽外层）
    pub fn names(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        let mut names = Vec::new();
        for scope in self.scopes.iter().rev() {
            for name in scope.keys() {
                if seen.insert(name.as_str()) {
                    names.push(name.as_str());
                }
            }
        }
        names.sort_unstable();
        names
    }
}
