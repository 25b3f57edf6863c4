//! 类型渲染
//!
//! 稳定的人类可读格式，诊断信息依赖它：
//! - 无约束变量按首次出现依次命名为 a, b, c ...，记录字段中的变量先于行变量
//! - Number 变量渲染为 number, number1 ...；Appendable 同理
//! - 元组 `( A, B )`，记录 `{ f : T }`，可扩展记录 `{ r | f : T }`
//! - 箭头右结合，只在必要时加括号

use super::mono::{Fields, MonoType, PolyType};
use super::normalize::letter_name;
use super::var::{SuperType, TypeVar, TypeVarId};
use indexmap::IndexSet;
use std::collections::HashMap;
use std::fmt;

/// 优先级：顶层 / 箭头左侧 / 类型应用的参数
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Prec {
    Top,
    Arrow,
    Arg,
}

/// 类型打印器
///
/// 变量名在第一次遍历时按出现顺序分配，同一个打印器内保持一致
#[derive(Debug, Default)]
pub struct TypePrinter {
    names: HashMap<TypeVarId, String>,
    letters: usize,
    constrained: HashMap<SuperType, usize>,
}

impl TypePrinter {
    pub fn new() -> Self {
        Self::default()
    }

    /// 渲染单态类型
    pub fn print(
        &mut self,
        ty: &MonoType,
    ) -> String {
        self.assign(ty);
        let mut out = String::new();
        self.write(ty, Prec::Top, &mut out);
        out
    }

    fn assign(
        &mut self,
        ty: &MonoType,
    ) {
        let mut order = IndexSet::new();
        print_order(ty, &mut order);
        for var in order {
            if self.names.contains_key(&var.id) {
                continue;
            }
            let name = match var.constraint {
                None => {
                    let name = letter_name(self.letters);
                    self.letters += 1;
                    name
                }
                Some(constraint) => {
                    let count = self.constrained.entry(constraint).or_insert(0);
                    let name = if *count == 0 {
                        constraint.name().to_string()
                    } else {
                        format!("{}{}", constraint.name(), count)
                    };
                    *count += 1;
                    name
                }
            };
            self.names.insert(var.id, name);
        }
    }

    fn write(
        &self,
        ty: &MonoType,
        prec: Prec,
        out: &mut String,
    ) {
        match ty {
            MonoType::Unit => out.push_str("()"),
            MonoType::Bool => out.push_str("Bool"),
            MonoType::Char => out.push_str("Char"),
            MonoType::String => out.push_str("String"),
            MonoType::Int => out.push_str("Int"),
            MonoType::Float => out.push_str("Float"),
            MonoType::Var(v) => match self.names.get(&v.id) {
                Some(name) => out.push_str(name),
                None => out.push_str(&v.id.to_string()),
            },
            MonoType::Tuple(a, b) => {
                out.push_str("( ");
                self.write(a, Prec::Top, out);
                out.push_str(", ");
                self.write(b, Prec::Top, out);
                out.push_str(" )");
            }
            MonoType::Tuple3(a, b, c) => {
                out.push_str("( ");
                self.write(a, Prec::Top, out);
                out.push_str(", ");
                self.write(b, Prec::Top, out);
                out.push_str(", ");
                self.write(c, Prec::Top, out);
                out.push_str(" )");
            }
            MonoType::List(elem) => {
                if prec >= Prec::Arg {
                    out.push('(');
                }
                out.push_str("List ");
                self.write(elem, Prec::Arg, out);
                if prec >= Prec::Arg {
                    out.push(')');
                }
            }
            MonoType::Function { from, to } => {
                if prec >= Prec::Arrow {
                    out.push('(');
                }
                self.write(from, Prec::Arrow, out);
                out.push_str(" -> ");
                self.write(to, Prec::Top, out);
                if prec >= Prec::Arrow {
                    out.push(')');
                }
            }
            MonoType::Record(fields) => {
                if fields.is_empty() {
                    out.push_str("{}");
                } else {
                    out.push_str("{ ");
                    self.write_fields(fields, out);
                    out.push_str(" }");
                }
            }
            MonoType::ExtensibleRecord { base, fields } => {
                if fields.is_empty() {
                    self.write(base, prec, out);
                    return;
                }
                out.push_str("{ ");
                self.write(base, Prec::Top, out);
                out.push_str(" | ");
                self.write_fields(fields, out);
                out.push_str(" }");
            }
        }
    }

    fn write_fields(
        &self,
        fields: &Fields,
        out: &mut String,
    ) {
        for (i, (name, ty)) in fields.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            out.push_str(name);
            out.push_str(" : ");
            self.write(ty, Prec::Top, out);
        }
    }
}

/// 按书写顺序收集变量；可扩展记录的字段先于行变量
fn print_order(
    ty: &MonoType,
    out: &mut IndexSet<TypeVar>,
) {
    match ty {
        MonoType::ExtensibleRecord { base, fields } => {
            for field in fields.values() {
                print_order(field, out);
            }
            print_order(base, out);
        }
        MonoType::Var(v) => {
            out.insert(v.clone());
        }
        MonoType::Tuple(a, b) => {
            print_order(a, out);
            print_order(b, out);
        }
        MonoType::Tuple3(a, b, c) => {
            print_order(a, out);
            print_order(b, out);
            print_order(c, out);
        }
        MonoType::List(elem) => print_order(elem, out),
        MonoType::Function { from, to } => {
            print_order(from, out);
            print_order(to, out);
        }
        MonoType::Record(fields) => {
            for field in fields.values() {
                print_order(field, out);
            }
        }
        _ => {}
    }
}

impl fmt::Display for MonoType {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "{}", TypePrinter::new().print(self))
    }
}

impl fmt::Display for PolyType {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "{}", TypePrinter::new().print(&self.body))
    }
}
