//! 错误码注册表
//!
//! - E1xxx: 类型错误
//! - E2xxx: 输入错误（模块、声明、导入）
//! - E3xxx: 资源错误

/// 错误类别
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    TypeCheck, // E1xxx
    Input,     // E2xxx
    Resource,  // E3xxx
}

/// 错误码定义
#[derive(Debug, Clone, Copy)]
pub struct ErrorCodeDefinition {
    pub code: &'static str,
    pub category: ErrorCategory,
    /// 错误类别名，与错误枚举的变体名一致
    pub kind: &'static str,
    /// 帮助信息
    pub help: &'static str,
}

/// 所有错误码
pub static CODES: &[ErrorCodeDefinition] = &[
    ErrorCodeDefinition {
        code: "E1001",
        category: ErrorCategory::TypeCheck,
        kind: "UnboundVariable",
        help: "check the spelling, or import the module that defines it",
    },
    ErrorCodeDefinition {
        code: "E1002",
        category: ErrorCategory::TypeCheck,
        kind: "TypeMismatch",
        help: "",
    },
    ErrorCodeDefinition {
        code: "E1003",
        category: ErrorCategory::TypeCheck,
        kind: "OccursCheckFailed",
        help: "a value is used in a way that would require an infinitely large type",
    },
    ErrorCodeDefinition {
        code: "E1004",
        category: ErrorCategory::TypeCheck,
        kind: "UnsupportedExpression",
        help: "",
    },
    ErrorCodeDefinition {
        code: "E1005",
        category: ErrorCategory::TypeCheck,
        kind: "NestingTooDeep",
        help: "raise `max_depth` in the [infer] section of elm-infer.toml",
    },
    ErrorCodeDefinition {
        code: "E1006",
        category: ErrorCategory::TypeCheck,
        kind: "DuplicateBinding",
        help: "rename one of the bindings",
    },
    ErrorCodeDefinition {
        code: "E2001",
        category: ErrorCategory::Input,
        kind: "ModuleNotFound",
        help: "",
    },
    ErrorCodeDefinition {
        code: "E2002",
        category: ErrorCategory::Input,
        kind: "DeclarationNotFound",
        help: "",
    },
    ErrorCodeDefinition {
        code: "E2003",
        category: ErrorCategory::Input,
        kind: "DuplicateDeclaration",
        help: "top-level names must be unique within a module",
    },
    ErrorCodeDefinition {
        code: "E2004",
        category: ErrorCategory::Input,
        kind: "ImportCycle",
        help: "break the cycle by moving shared declarations into a separate module",
    },
    ErrorCodeDefinition {
        code: "E2005",
        category: ErrorCategory::Input,
        kind: "UnknownImport",
        help: "pass the imported module in the same input",
    },
    ErrorCodeDefinition {
        code: "E3001",
        category: ErrorCategory::Resource,
        kind: "Resource",
        help: "lower `max_depth` in the [infer] section of elm-infer.toml",
    },
];

impl ErrorCodeDefinition {
    /// 按错误码查找
    pub fn find(code: &str) -> Option<&'static ErrorCodeDefinition> {
        CODES.iter().find(|def| def.code == code)
    }

    /// 按错误类别名查找
    pub fn for_kind(kind: &str) -> Option<&'static ErrorCodeDefinition> {
        CODES.iter().find(|def| def.kind == kind)
    }
}
