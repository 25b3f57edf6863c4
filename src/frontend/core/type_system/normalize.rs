//! 规范化
//!
//! 按首次出现顺序重命名类型变量，用于 alpha 等价比较：
//! 生成变量重新编号为 0..n，命名变量重命名为 a, b, ..., z, aa, ab, ...

use super::mono::{MonoType, PolyType};
use super::substitute::map_vars;
use super::var::{TypeVar, TypeVarId};
use std::collections::HashMap;

/// 双射 26 进制字母序列：0 -> a, 25 -> z, 26 -> aa
pub fn letter_name(index: usize) -> String {
    let mut n = index + 1;
    let mut out = Vec::new();
    while n > 0 {
        n -= 1;
        out.push(b'a' + (n % 26) as u8);
        n /= 26;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}

/// 规范重命名表
#[derive(Debug, Default)]
struct Renaming {
    map: HashMap<TypeVarId, TypeVar>,
    generated: u32,
    named: usize,
}

impl Renaming {
    fn rename(
        &mut self,
        var: &TypeVar,
    ) -> TypeVar {
        if let Some(renamed) = self.map.get(&var.id) {
            return renamed.clone();
        }
        let id = match var.id {
            TypeVarId::Generated(_) => {
                let id = TypeVarId::Generated(self.generated);
                self.generated += 1;
                id
            }
            TypeVarId::Named(_) => {
                let id = TypeVarId::Named(letter_name(self.named));
                self.named += 1;
                id
            }
        };
        let renamed = TypeVar {
            id,
            constraint: var.constraint,
        };
        self.map.insert(var.id.clone(), renamed.clone());
        renamed
    }
}

/// 规范化多态类型（量化变量与自由变量一并重命名）
pub fn normalize(poly: &PolyType) -> PolyType {
    let mut renaming = Renaming::default();
    for var in poly.body.free_type_vars() {
        renaming.rename(&var);
    }
    let body = map_vars(&poly.body, &mut |v| Some(MonoType::Var(renaming.rename(v))));

    let mut type_binders: Vec<TypeVar> = poly
        .type_binders
        .iter()
        .map(|v| renaming.rename(v))
        .collect();
    type_binders.sort();
    type_binders.dedup();
    PolyType::new(type_binders, body)
}

/// 规范化单态类型
pub fn normalize_mono(ty: &MonoType) -> MonoType {
    normalize(&PolyType::mono(ty.clone())).body
}

/// alpha 等价：规范化后结构相等
pub fn alpha_eq(
    left: &PolyType,
    right: &PolyType,
) -> bool {
    normalize(left) == normalize(right)
}
