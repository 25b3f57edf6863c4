//! 多模块推断
//!
//! - 依赖顺序：按导入做拓扑排序，互不依赖的模块保持输入顺序
//! - 导入可见性：`Alias.name` / `Module.name` 限定访问，暴露的名称可直接访问

use super::environment::TypeEnvironment;
use super::errors::InputError;
use super::typed::Typed;
use crate::frontend::core::ast::{Import, Module};
use crate::util::span::Span;
use indexmap::IndexMap;
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Visiting,
    Done,
}

/// 计算模块的推断顺序（依赖在前）
pub fn dependency_order<M>(modules: &IndexMap<String, Module<M>>) -> Result<Vec<String>, InputError> {
    let mut marks: IndexMap<&str, Mark> = IndexMap::new();
    let mut order = Vec::with_capacity(modules.len());
    let mut path = Vec::new();
    for name in modules.keys() {
        visit(name, modules, &mut marks, &mut path, &mut order)?;
    }
    Ok(order)
}

fn visit<'m, M>(
    name: &'m str,
    modules: &'m IndexMap<String, Module<M>>,
    marks: &mut IndexMap<&'m str, Mark>,
    path: &mut Vec<&'m str>,
    order: &mut Vec<String>,
) -> Result<(), InputError> {
    match marks.get(name) {
        Some(Mark::Done) => return Ok(()),
        Some(Mark::Visiting) => {
            let start = path.iter().position(|n| *n == name).unwrap_or(0);
            let mut cycle: Vec<String> = path[start..].iter().map(|n| n.to_string()).collect();
            cycle.push(name.to_string());
            return Err(InputError::ImportCycle { cycle });
        }
        None => {}
    }
    let Some(module) = modules.get(name) else {
        return Ok(());
    };
    marks.insert(name, Mark::Visiting);
    path.push(name);
    for import in &module.imports {
        let Some((dep, _)) = modules.get_key_value(import.module.as_str()) else {
            return Err(InputError::UnknownImport {
                module: name.to_string(),
                import: import.module.clone(),
            });
        };
        visit(dep.as_str(), modules, marks, path, order)?;
    }
    path.pop();
    marks.insert(name, Mark::Done);
    order.push(name.to_string());
    Ok(())
}

/// 检查顶层声明名称唯一
pub fn check_unique_declarations(module: &Module<Span>) -> Result<(), InputError> {
    let mut seen = HashSet::new();
    for decl in &module.declarations {
        if !seen.insert(decl.name.as_str()) {
            return Err(InputError::DuplicateDeclaration {
                module: module.name.clone(),
                declaration: decl.name.clone(),
                span: decl.meta,
            });
        }
    }
    Ok(())
}

/// 把已推断模块的声明按导入规则加入环境
pub fn add_import(
    env: &mut TypeEnvironment,
    import: &Import,
    module: &Module<Typed>,
) {
    let qualifier = import.alias.as_deref().unwrap_or(&import.module);
    for decl in &module.declarations {
        let scheme = decl.meta.ty.clone();
        env.add_var(format!("{}.{}", qualifier, decl.name), scheme.clone());
        if import.exposing.exposes(&decl.name) {
            env.add_var(decl.name.clone(), scheme);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::core::ast::build::module;
    use crate::frontend::core::ast::Exposing;

    fn importing(
        name: &str,
        imports: &[&str],
    ) -> Module<Span> {
        let mut m = module(name, vec![]);
        m.imports = imports
            .iter()
            .map(|i| Import {
                module: i.to_string(),
                alias: None,
                exposing: Exposing::Nothing,
            })
            .collect();
        m
    }

    fn modules(list: Vec<Module<Span>>) -> IndexMap<String, Module<Span>> {
        list.into_iter().map(|m| (m.name.clone(), m)).collect()
    }

    #[test]
    fn test_dependencies_first() {
        let input = modules(vec![
            importing("Main", &["Util", "Data"]),
            importing("Data", &[]),
            importing("Util", &["Data"]),
        ]);
        assert_eq!(dependency_order(&input).unwrap(), vec!["Data", "Util", "Main"]);
    }

    #[test]
    fn test_independent_modules_keep_input_order() {
        let input = modules(vec![importing("B", &[]), importing("A", &[])]);
        assert_eq!(dependency_order(&input).unwrap(), vec!["B", "A"]);
    }

    #[test]
    fn test_import_cycle() {
        let input = modules(vec![
            importing("A", &["B"]),
            importing("B", &["C"]),
            importing("C", &["A"]),
        ]);
        assert_eq!(
            dependency_order(&input),
            Err(InputError::ImportCycle {
                cycle: vec!["A".into(), "B".into(), "C".into(), "A".into()]
            })
        );
    }

    #[test]
    fn test_unknown_import() {
        let input = modules(vec![importing("Main", &["Html"])]);
        assert_eq!(
            dependency_order(&input),
            Err(InputError::UnknownImport {
                module: "Main".into(),
                import: "Html".into()
            })
        );
    }
}
