//! Core layer: syntax tree and type system

pub mod ast;
pub mod type_system;
