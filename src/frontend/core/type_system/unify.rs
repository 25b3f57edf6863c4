//! 类型合一
//!
//! 计算使两个单态类型相等的最一般替换。包含 occurs check、超类约束收窄
//! 以及可扩展记录的行合一。

use super::error::UnifyError;
use super::mono::{Fields, MonoType};
use super::substitute::Substitution;
use super::var::{TypeVar, TypeVarSupply};
use tracing::trace;

/// 合一器
///
/// 行合一需要新变量，因此借用推断运行的变量来源
pub struct Unifier<'a> {
    supply: &'a mut TypeVarSupply,
}

impl<'a> Unifier<'a> {
    pub fn new(supply: &'a mut TypeVarSupply) -> Self {
        Self { supply }
    }

    /// 合一两个类型，`expected` 与 `actual` 只影响错误信息中的方向
    pub fn unify(
        &mut self,
        expected: &MonoType,
        actual: &MonoType,
    ) -> Result<Substitution, UnifyError> {
        let result = self.unify_inner(expected, actual);
        if let Err(err) = &result {
            trace!("unify failed: {}", err);
        }
        result
    }

    fn unify_inner(
        &mut self,
        expected: &MonoType,
        actual: &MonoType,
    ) -> Result<Substitution, UnifyError> {
        match (expected, actual) {
            (a, b) if a.is_builtin() && a == b => Ok(Substitution::new()),
            (MonoType::Var(a), MonoType::Var(b)) if a.id == b.id => Ok(Substitution::new()),
            (MonoType::Var(a), MonoType::Var(b)) => self.unify_vars(a, b, expected, actual),
            (MonoType::Var(v), ty) | (ty, MonoType::Var(v)) => bind(v, ty, expected, actual),
            (MonoType::Tuple(a1, b1), MonoType::Tuple(a2, b2)) => {
                self.unify_pairs(&[(&**a1, &**a2), (&**b1, &**b2)])
            }
            (MonoType::Tuple3(a1, b1, c1), MonoType::Tuple3(a2, b2, c2)) => {
                self.unify_pairs(&[(&**a1, &**a2), (&**b1, &**b2), (&**c1, &**c2)])
            }
            (MonoType::List(t1), MonoType::List(t2)) => self.unify_inner(t1, t2),
            (
                MonoType::Function { from: f1, to: t1 },
                MonoType::Function { from: f2, to: t2 },
            ) => self.unify_pairs(&[(&**f1, &**f2), (&**t1, &**t2)]),
            (
                MonoType::Record(_) | MonoType::ExtensibleRecord { .. },
                MonoType::Record(_) | MonoType::ExtensibleRecord { .. },
            ) => self.unify_rows(expected, actual),
            _ => Err(UnifyError::mismatch(expected, actual)),
        }
    }

    /// 两个不同变量：约束更强的一方作为代表
    fn unify_vars(
        &mut self,
        a: &TypeVar,
        b: &TypeVar,
        expected: &MonoType,
        actual: &MonoType,
    ) -> Result<Substitution, UnifyError> {
        match (a.constraint, b.constraint) {
            (None, _) => Ok(Substitution::singleton(a, MonoType::Var(b.clone()))),
            (Some(_), None) => Ok(Substitution::singleton(b, MonoType::Var(a.clone()))),
            (Some(c1), Some(c2)) if c1 == c2 => {
                Ok(Substitution::singleton(b, MonoType::Var(a.clone())))
            }
            _ => Err(UnifyError::mismatch(expected, actual)),
        }
    }

    /// 按顺序合一各分量，后续分量先应用已累积的替换
    fn unify_pairs(
        &mut self,
        pairs: &[(&MonoType, &MonoType)],
    ) -> Result<Substitution, UnifyError> {
        let mut sub = Substitution::new();
        for (left, right) in pairs {
            let next = self.unify_inner(&sub.apply(left), &sub.apply(right))?;
            sub = next.compose(&sub);
        }
        Ok(sub)
    }

    /// 行合一
    fn unify_rows(
        &mut self,
        expected: &MonoType,
        actual: &MonoType,
    ) -> Result<Substitution, UnifyError> {
        let (fields1, tail1) = row_parts(expected);
        let (fields2, tail2) = row_parts(actual);

        let mut sub = Substitution::new();
        for (name, t1) in &fields1 {
            if let Some(t2) = fields2.get(name) {
                let next = self.unify_inner(&sub.apply(t1), &sub.apply(t2))?;
                sub = next.compose(&sub);
            }
        }

        let only1: Fields = fields1
            .iter()
            .filter(|(name, _)| !fields2.contains_key(*name))
            .map(|(name, t)| (name.clone(), t.clone()))
            .collect();
        let only2: Fields = fields2
            .iter()
            .filter(|(name, _)| !fields1.contains_key(*name))
            .map(|(name, t)| (name.clone(), t.clone()))
            .collect();

        match (tail1, tail2) {
            (None, None) => {
                if only1.is_empty() && only2.is_empty() {
                    Ok(sub)
                } else {
                    Err(UnifyError::mismatch(expected, actual))
                }
            }
            (Some(tail), None) => {
                if !only1.is_empty() {
                    return Err(UnifyError::mismatch(expected, actual));
                }
                self.unify_tail(sub, &tail, &MonoType::Record(only2))
            }
            (None, Some(tail)) => {
                if !only2.is_empty() {
                    return Err(UnifyError::mismatch(expected, actual));
                }
                self.unify_tail(sub, &tail, &MonoType::Record(only1))
            }
            (Some(tail1), Some(tail2)) if tail1 == tail2 => {
                if only1.is_empty() && only2.is_empty() {
                    Ok(sub)
                } else {
                    Err(UnifyError::mismatch(expected, actual))
                }
            }
            (Some(tail1), Some(tail2)) => {
                if only1.is_empty() && only2.is_empty() {
                    return self.unify_tail(sub, &tail1, &tail2);
                }
                let shared = MonoType::Var(self.supply.fresh());
                let sub = self.unify_tail(sub, &tail1, &open_row(shared.clone(), only2))?;
                self.unify_tail(sub, &tail2, &open_row(shared, only1))
            }
        }
    }

    fn unify_tail(
        &mut self,
        sub: Substitution,
        tail: &MonoType,
        ty: &MonoType,
    ) -> Result<Substitution, UnifyError> {
        let next = self.unify_inner(&sub.apply(tail), &sub.apply(ty))?;
        Ok(next.compose(&sub))
    }
}

/// 绑定变量，执行 occurs check 与约束检查
fn bind(
    var: &TypeVar,
    ty: &MonoType,
    expected: &MonoType,
    actual: &MonoType,
) -> Result<Substitution, UnifyError> {
    if ty.occurs(&var.id) {
        return Err(UnifyError::OccursCheck {
            var: var.clone(),
            ty: ty.clone(),
        });
    }
    if let Some(constraint) = var.constraint {
        if !ty.satisfies(constraint) {
            return Err(UnifyError::mismatch(expected, actual));
        }
    }
    Ok(Substitution::singleton(var, ty.clone()))
}

/// 拆出记录类型的全部已知字段与尾部（若为开放行）
fn row_parts(ty: &MonoType) -> (Fields, Option<MonoType>) {
    match ty {
        MonoType::Record(fields) => (fields.clone(), None),
        MonoType::ExtensibleRecord { base, fields } => {
            let (mut inner, tail) = row_parts(base);
            inner.extend(fields.iter().map(|(k, v)| (k.clone(), v.clone())));
            (inner, tail)
        }
        other => (Fields::new(), Some(other.clone())),
    }
}

fn open_row(
    base: MonoType,
    fields: Fields,
) -> MonoType {
    if fields.is_empty() {
        base
    } else {
        MonoType::ExtensibleRecord {
            base: Box::new(base),
            fields,
        }
    }
}

/// 便捷函数：用给定变量来源合一两个类型
pub fn unify(
    supply: &mut TypeVarSupply,
    expected: &MonoType,
    actual: &MonoType,
) -> Result<Substitution, UnifyError> {
    Unifier::new(supply).unify(expected, actual)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::core::type_system::var::SuperType;

    fn number(supply: &mut TypeVarSupply) -> MonoType {
        MonoType::Var(supply.fresh_constrained(Some(SuperType::Number)))
    }

    #[test]
    fn test_identical_builtins() {
        let mut supply = TypeVarSupply::new();
        for ty in [
            MonoType::Unit,
            MonoType::Bool,
            MonoType::Char,
            MonoType::String,
            MonoType::Int,
            MonoType::Float,
        ] {
            assert!(unify(&mut supply, &ty, &ty).unwrap().is_empty());
        }
    }

    #[test]
    fn test_var_binds_either_side() {
        let mut supply = TypeVarSupply::new();
        let a = supply.fresh();
        let left = unify(&mut supply, &MonoType::Var(a.clone()), &MonoType::Char).unwrap();
        assert_eq!(left.apply(&MonoType::Var(a.clone())), MonoType::Char);
        let right = unify(&mut supply, &MonoType::Char, &MonoType::Var(a.clone())).unwrap();
        assert_eq!(right.apply(&MonoType::Var(a)), MonoType::Char);
    }

    #[test]
    fn test_occurs_check() {
        let mut supply = TypeVarSupply::new();
        let a = supply.fresh();
        let err = unify(
            &mut supply,
            &MonoType::Var(a.clone()),
            &MonoType::list(MonoType::Var(a.clone())),
        )
        .unwrap_err();
        assert!(matches!(err, UnifyError::OccursCheck { var, .. } if var == a));
    }

    #[test]
    fn test_number_narrows_to_float() {
        let mut supply = TypeVarSupply::new();
        let n = number(&mut supply);
        let sub = unify(&mut supply, &n, &MonoType::Float).unwrap();
        assert_eq!(sub.apply(&n), MonoType::Float);
        let m = number(&mut supply);
        let sub = unify(&mut supply, &MonoType::Int, &m).unwrap();
        assert_eq!(sub.apply(&m), MonoType::Int);
    }

    #[test]
    fn test_number_rejects_other_builtins() {
        let mut supply = TypeVarSupply::new();
        for ty in [MonoType::String, MonoType::Char, MonoType::Unit, MonoType::Bool] {
            let n = number(&mut supply);
            let err = unify(&mut supply, &n, &ty).unwrap_err();
            assert_eq!(err, UnifyError::mismatch(&n, &ty));
        }
    }

    #[test]
    fn test_two_numbers_stay_ambiguous() {
        let mut supply = TypeVarSupply::new();
        let n = number(&mut supply);
        let m = number(&mut supply);
        let sub = unify(&mut supply, &n, &m).unwrap();
        let resolved = sub.apply(&m);
        assert_eq!(sub.apply(&n), resolved);
        assert!(resolved.is_constrained_by(SuperType::Number));
    }

    #[test]
    fn test_unconstrained_var_takes_constraint() {
        let mut supply = TypeVarSupply::new();
        let a = MonoType::Var(supply.fresh());
        let n = number(&mut supply);
        let sub = unify(&mut supply, &a, &n).unwrap();
        assert!(sub.apply(&a).is_constrained_by(SuperType::Number));
    }

    #[test]
    fn test_mixed_constraints_mismatch() {
        let mut supply = TypeVarSupply::new();
        let n = number(&mut supply);
        let s = MonoType::Var(supply.fresh_constrained(Some(SuperType::Appendable)));
        assert!(unify(&mut supply, &n, &s).is_err());
    }

    #[test]
    fn test_tuple_arity_mismatch() {
        let mut supply = TypeVarSupply::new();
        let pair = MonoType::tuple(MonoType::Int, MonoType::Int);
        let triple = MonoType::tuple3(MonoType::Int, MonoType::Int, MonoType::Int);
        assert!(matches!(
            unify(&mut supply, &pair, &triple),
            Err(UnifyError::Mismatch { .. })
        ));
    }

    #[test]
    fn test_function_threads_substitution() {
        let mut supply = TypeVarSupply::new();
        let a = supply.fresh();
        let b = supply.fresh();
        // (a -> a) ~ (Int -> b)
        let left = MonoType::function(MonoType::Var(a.clone()), MonoType::Var(a.clone()));
        let right = MonoType::function(MonoType::Int, MonoType::Var(b.clone()));
        let sub = unify(&mut supply, &left, &right).unwrap();
        assert_eq!(sub.apply(&MonoType::Var(a)), MonoType::Int);
        assert_eq!(sub.apply(&MonoType::Var(b)), MonoType::Int);
    }

    #[test]
    fn test_records_require_same_fields() {
        let mut supply = TypeVarSupply::new();
        let ab = MonoType::record([("a", MonoType::Int), ("b", MonoType::Char)]);
        let a = MonoType::record([("a", MonoType::Int)]);
        assert!(unify(&mut supply, &ab, &a).is_err());
        assert!(unify(&mut supply, &ab, &ab.clone()).is_ok());
    }

    #[test]
    fn test_row_absorbs_leftover_fields() {
        let mut supply = TypeVarSupply::new();
        let r = supply.fresh();
        let x = supply.fresh();
        let row = MonoType::extensible_record(
            MonoType::Var(r.clone()),
            [("a", MonoType::Var(x.clone()))],
        );
        let record = MonoType::record([("a", MonoType::Float), ("b", MonoType::String)]);
        let sub = unify(&mut supply, &row, &record).unwrap();
        assert_eq!(sub.apply(&MonoType::Var(x)), MonoType::Float);
        assert_eq!(
            sub.apply(&MonoType::Var(r)),
            MonoType::record([("b", MonoType::String)])
        );
        assert_eq!(sub.apply(&row), record);
    }

    #[test]
    fn test_row_missing_field_fails() {
        let mut supply = TypeVarSupply::new();
        let r = supply.fresh();
        let row = MonoType::extensible_record(MonoType::Var(r), [("z", MonoType::Int)]);
        let record = MonoType::record([("a", MonoType::Int)]);
        assert!(unify(&mut supply, &row, &record).is_err());
        assert!(unify(&mut supply, &record, &row).is_err());
    }

    #[test]
    fn test_two_open_rows_share_base() {
        let mut supply = TypeVarSupply::new();
        let r1 = supply.fresh();
        let r2 = supply.fresh();
        let left = MonoType::extensible_record(MonoType::Var(r1), [("a", MonoType::Int)]);
        let right = MonoType::extensible_record(MonoType::Var(r2), [("b", MonoType::Char)]);
        let sub = unify(&mut supply, &left, &right).unwrap();
        let l = sub.apply(&left);
        let r = sub.apply(&right);
        assert_eq!(l, r);
        match l {
            MonoType::ExtensibleRecord { base, fields } => {
                assert!(base.type_var().is_some());
                assert_eq!(fields.len(), 2);
            }
            other => panic!("expected open row, got {:?}", other),
        }
    }

    #[test]
    fn test_rows_over_same_base_must_match() {
        let mut supply = TypeVarSupply::new();
        let r = supply.fresh();
        // { r | a : Int } ~ { r | b : Int }
        let left = MonoType::extensible_record(MonoType::Var(r.clone()), [("a", MonoType::Int)]);
        let right = MonoType::extensible_record(MonoType::Var(r.clone()), [("b", MonoType::Int)]);
        assert_eq!(
            unify(&mut supply, &left, &right).unwrap_err(),
            UnifyError::mismatch(&left, &right)
        );

        let same = MonoType::extensible_record(MonoType::Var(r.clone()), [("a", MonoType::Int)]);
        assert!(unify(&mut supply, &left, &same).unwrap().is_empty());

        let other = MonoType::extensible_record(MonoType::Var(r), [("a", MonoType::Char)]);
        assert!(matches!(
            unify(&mut supply, &left, &other),
            Err(UnifyError::Mismatch { .. })
        ));
    }

    #[test]
    fn test_concrete_row_base_must_match() {
        let mut supply = TypeVarSupply::new();
        // { { b : Char } | a : Int } is closed over a and b
        let row = MonoType::extensible_record(
            MonoType::record([("b", MonoType::Char)]),
            [("a", MonoType::Int)],
        );
        let wider = MonoType::record([
            ("a", MonoType::Int),
            ("b", MonoType::Char),
            ("c", MonoType::Int),
        ]);
        assert!(matches!(
            unify(&mut supply, &row, &wider),
            Err(UnifyError::Mismatch { .. })
        ));
        assert!(unify(&mut supply, &wider, &row).is_err());

        let exact = MonoType::record([("a", MonoType::Int), ("b", MonoType::Char)]);
        assert!(unify(&mut supply, &row, &exact).unwrap().is_empty());

        let wrong = MonoType::record([("a", MonoType::Int), ("b", MonoType::Int)]);
        assert!(unify(&mut supply, &row, &wrong).is_err());
    }

    #[test]
    fn test_row_occurs_check() {
        let mut supply = TypeVarSupply::new();
        let r = supply.fresh();
        let row = MonoType::extensible_record(MonoType::Var(r.clone()), [("a", MonoType::Int)]);
        let record = MonoType::record([("a", MonoType::Int), ("b", MonoType::Var(r))]);
        assert!(matches!(
            unify(&mut supply, &row, &record),
            Err(UnifyError::OccursCheck { .. })
        ));
    }

    #[test]
    fn test_constructor_mismatch() {
        let mut supply = TypeVarSupply::new();
        let err = unify(
            &mut supply,
            &MonoType::list(MonoType::Int),
            &MonoType::String,
        )
        .unwrap_err();
        assert_eq!(
            err,
            UnifyError::Mismatch {
                expected: MonoType::list(MonoType::Int),
                actual: MonoType::String,
            }
        );
    }
}
