//! 泛化与实例化
//!
//! - generalize: 把环境中不自由的类型变量提升为量化变量
//! - instantiate: 为每个量化变量换上新的变量，得到一次使用点的单态类型

use super::mono::{MonoType, PolyType};
use super::substitute::map_vars;
use super::var::{TypeVarId, TypeVarSupply};
use std::collections::{HashMap, HashSet};

/// 泛化：量化 `ty` 中不出现在环境里的自由变量（按首次出现顺序）
pub fn generalize(
    env_vars: &HashSet<TypeVarId>,
    ty: &MonoType,
) -> PolyType {
    let type_binders = ty
        .free_type_vars()
        .into_iter()
        .filter(|v| !env_vars.contains(&v.id))
        .collect();
    PolyType::new(type_binders, ty.clone())
}

/// 实例化：每个量化变量换成同约束的新变量
pub fn instantiate(
    poly: &PolyType,
    supply: &mut TypeVarSupply,
) -> MonoType {
    if poly.is_mono() {
        return poly.body.clone();
    }
    let fresh: HashMap<TypeVarId, MonoType> = poly
        .type_binders
        .iter()
        .map(|v| {
            (
                v.id.clone(),
                MonoType::Var(supply.fresh_constrained(v.constraint)),
            )
        })
        .collect();
    map_vars(&poly.body, &mut |v| fresh.get(&v.id).cloned())
}
