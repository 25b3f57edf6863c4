//! Library surface: JSON in, typed tree out

use elm_infer::frontend::core::ast::build::*;
use elm_infer::frontend::core::ast::BinOp;
use elm_infer::util::config::InferConfig;
use elm_infer::util::span::Span;
use elm_infer::{infer, infer_with_config, read_modules, type_of, Error, InputError, Module, Typed};
use indexmap::IndexMap;

const MAIN: &str = r#"{
  "name": "Main",
  "declarations": [
    {
      "name": "identity",
      "args": [{"kind": {"Var": "x"}}],
      "body": {"kind": {"Var": "x"}}
    },
    {
      "name": "answer",
      "body": {"kind": {"Application": {
        "function": {"kind": {"Var": "identity"}},
        "args": [{"kind": {"Integer": 42}}]
      }}}
    }
  ]
}"#;

#[test]
fn test_json_module_infers() {
    let modules = read_modules(MAIN).unwrap();
    let typed = infer(modules).unwrap();
    let main = &typed["Main"];
    let rendered: Vec<String> = main
        .declarations
        .iter()
        .map(|d| format!("{} : {}", d.name, d.meta.ty))
        .collect();
    assert_eq!(rendered, vec!["identity : a -> a", "answer : number"]);
}

#[test]
fn test_typed_tree_serializes() {
    let modules = read_modules(MAIN).unwrap();
    let typed = infer(modules).unwrap();
    let json = serde_json::to_string(&typed).unwrap();
    let back: IndexMap<String, Module<Typed>> = serde_json::from_str(&json).unwrap();
    assert_eq!(back, typed);
}

#[test]
fn test_type_of_lookup() {
    let typed = infer(read_modules(MAIN).unwrap()).unwrap();
    let ty = type_of(&typed, "Main", "identity").unwrap();
    assert_eq!(ty.to_string(), "a -> a");

    let err = type_of(&typed, "Main", "missing").unwrap_err();
    assert!(matches!(err, Error::Input(InputError::DeclarationNotFound { .. })));
    let err = type_of(&typed, "Other", "identity").unwrap_err();
    assert!(matches!(err, Error::Input(InputError::ModuleNotFound { .. })));
}

#[test]
fn test_config_limits_depth() {
    let mut body = int(1);
    for _ in 0..40 {
        body = op(BinOp::Add, int(1), body);
    }
    let m = module("Main", vec![declaration("deep", vec![], body)]);
    let modules: IndexMap<String, Module<Span>> = [("Main".to_string(), m)].into_iter().collect();

    let mut config = InferConfig::default();
    config.infer.max_depth = 16;
    let err = infer_with_config(modules.clone(), &config).unwrap_err();
    assert_eq!(err.as_type_error().map(|e| e.kind()), Some("NestingTooDeep"));

    assert!(infer(modules).is_ok());
}
