//! Closed error-code enumerations, one per error kind.
//!
//! Each code has a stable namespaced identifier, a fallback message used when
//! no detail is known, and a template where `{}` is replaced by the detail.

use std::fmt;

use serde::Serialize;

pub trait ErrorCode: Copy + fmt::Debug + Eq + 'static {
    /// Stable identifier such as `A012` or `E003`.
    fn code(&self) -> &'static str;

    /// Base message, used when no detail is provided.
    fn fallback_message(&self) -> &'static str;

    /// Template for messages with detail. `{}` is replaced by the detail text.
    fn custom_message(&self) -> &'static str;

    fn message(&self, detail: Option<&str>) -> String {
        match detail {
            Some(detail) => self.custom_message().replace("{}", detail),
            None => self.fallback_message().to_string(),
        }
    }
}

macro_rules! error_codes {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $( $variant:ident = ($code:literal, $fallback:literal, $custom:literal), )*
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
        pub enum $name {
            $( $variant, )*
        }

        impl ErrorCode for $name {
            fn code(&self) -> &'static str {
                match self {
                    $( Self::$variant => $code, )*
                }
            }

            fn fallback_message(&self) -> &'static str {
                match self {
                    $( Self::$variant => $fallback, )*
                }
            }

            fn custom_message(&self) -> &'static str {
                match self {
                    $( Self::$variant => $custom, )*
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.code())
            }
        }
    };
}

error_codes! {
    /// Problems found by the parser while building the CST.
    pub enum SyntaxCode {
        UnexpectedToken = ("P001", "unexpected token", "unexpected {}"),
        InvalidCharacters = ("P002", "invalid characters", "invalid characters `{}`"),
        ExpectedToken = ("P003", "missing token", "expected {}"),
        ExpectedExpression = ("P004", "expected an expression", "expected an expression, found {}"),
        ExpectedType = ("P005", "expected a type", "expected a type, found {}"),
        ExpectedIdentifier = ("P006", "expected an identifier", "expected {}"),
    }
}

error_codes! {
    /// CST shape violations found while building the AST.
    pub enum AnalysisCode {
        UnexpectedNode = ("A001", "unexpected node", "unexpected {}"),
        UnsupportedSyntax = ("A002", "invalid syntax in tree", "invalid syntax in tree: {}"),
        ExpectedFunctionKeyword = ("A003", "expected `f`", "expected `f`, found {}"),
        ExpectedFunctionName = ("A004", "expected function name", "expected function name, found {}"),
        ExpectedParameterList = ("A005", "expected parameter list", "expected parameter list, found {}"),
        ExpectedFunctionBody = ("A006", "expected function body", "expected function body, found {}"),
        ExpectedTypeParameterName = ("A007", "expected type parameter name", "expected type parameter name, found {}"),
        ExpectedTypeConstraint = ("A008", "expected constraint after `:`", "expected constraint after `:`, found {}"),
        ExpectedParameterName = ("A009", "expected parameter name", "expected parameter name, found {}"),
        ExpectedParameterType = ("A010", "expected parameter type after `:`", "expected parameter type after `:`, found {}"),
        ExpectedDefaultValue = ("A011", "expected default value after `=`", "expected default value after `=`, found {}"),
        ExpectedReturnType = ("A012", "expected return type", "expected return type, found {}"),
        ExpectedClassName = ("A013", "expected class name", "expected class name, found {}"),
        ExpectedClassBody = ("A014", "expected class body", "expected class body, found {}"),
        ExpectedEnumName = ("A015", "expected enum name", "expected enum name, found {}"),
        ExpectedEnumBody = ("A016", "expected enum body", "expected enum body, found {}"),
        ExpectedEnumMemberName = ("A017", "expected enum member name", "expected enum member name, found {}"),
        ExpectedEnumValue = ("A018", "expected enum value after `=`", "expected enum value after `=`, found {}"),
        ExpectedInterfaceName = ("A019", "expected interface name", "expected interface name, found {}"),
        ExpectedInterfaceBody = ("A020", "expected interface body", "expected interface body, found {}"),
        ExpectedMemberName = ("A021", "expected member name", "expected member name, found {}"),
        ExpectedMemberType = ("A022", "expected member type", "expected member type, found {}"),
        ExpectedVariableKeyword = ("A023", "expected `const` or `let`", "expected `const` or `let`, found {}"),
        ExpectedVariableTarget = ("A024", "expected variable name", "expected variable name, found {}"),
        ExpectedVariableType = ("A025", "expected variable type after `:`", "expected variable type after `:`, found {}"),
        ExpectedInitializer = ("A026", "expected initializer after `=`", "expected initializer after `=`, found {}"),
        ExpectedSemicolon = ("A027", "expected `;`", "expected `;`, found {}"),
        ExpectedBlock = ("A028", "expected block", "expected block, found {}"),
        ExpectedCondition = ("A029", "expected condition", "expected condition, found {}"),
        ExpectedElseBranch = ("A030", "expected `if` or block after `else`", "expected `if` or block after `else`, found {}"),
        ExpectedLoopVariable = ("A031", "expected loop variable", "expected loop variable, found {}"),
        ExpectedIterable = ("A032", "expected iterable after `in`", "expected iterable after `in`, found {}"),
        ExpectedKeyword = ("A033", "expected keyword", "expected {}"),
        ExpectedExpression = ("A034", "expected expression", "expected expression, found {}"),
        ExpectedOperator = ("A035", "expected operator", "expected operator, found {}"),
        ExpectedOperand = ("A036", "expected operand", "expected operand, found {}"),
        ExpectedArguments = ("A037", "expected argument list", "expected argument list, found {}"),
        ExpectedIndex = ("A038", "expected index expression", "expected index expression, found {}"),
        ExpectedType = ("A039", "expected type", "expected type, found {}"),
        ExpectedTypeArguments = ("A040", "expected type arguments", "expected type arguments, found {}"),
        ExpectedDelimiter = ("A041", "expected delimiter", "expected {}"),
        ExpectedCaseValues = ("A042", "expected case values or `else`", "expected case values or `else`, found {}"),
        ExpectedObjectKey = ("A043", "expected object key", "expected object key, found {}"),
        ExpectedAssignmentValue = ("A044", "expected value after `=`", "expected value after `=`, found {}"),
        InvalidAssignmentTarget = ("A045", "invalid assignment target", "cannot assign to {}"),
        InvalidNumberLiteral = ("A046", "invalid number literal", "invalid number literal `{}`"),
        NumberOutOfRange = ("A047", "number literal out of range", "number literal out of range: {}"),
        InvalidStringLiteral = ("A048", "invalid string literal", "invalid string literal: {}"),
        InvalidPathLiteral = ("A049", "invalid path literal", "invalid path literal: {}"),
        InvalidRegexLiteral = ("A050", "invalid regex literal", "invalid regex literal: {}"),
    }
}

error_codes! {
    /// Whole-program rule violations found by the validator.
    pub enum SemanticCode {
        MainFunctionNotFound = ("E001", "no `main` function found", "no `main` function found: {}"),
        MainTypeParametersNotExpected = ("E002", "`main` cannot have type parameters", "`main` cannot have type parameters: {}"),
        MainParametersNotExpected = ("E003", "`main` cannot have parameters", "`main` cannot have parameters: {}"),
        MainReturnTypesNotExpected = ("E004", "`main` cannot return values", "`main` cannot return values: {}"),
        DuplicateIdentifier = ("E005", "duplicate identifier", "`{}` is already defined in this scope"),
        RestParameterNotLast = ("E006", "rest parameter must be last", "rest parameter `{}` must be last"),
        DuplicateParameter = ("E007", "duplicate parameter name", "parameter `{}` is declared more than once"),
        MissingTypeAnnotation = ("E008", "missing type or default value", "`{}` needs a type annotation or a value"),
        AmbiguousType = ("E009", "type cannot be inferred unambiguously", "{}"),
        TypeMismatch = ("E010", "type mismatch", "{}"),
        TargetCountMismatch = ("E011", "number of targets and values differ", "{}"),
        ReturnCountMismatch = ("E012", "wrong number of return values", "{}"),
        UndefinedIdentifier = ("E013", "undefined identifier", "`{}` is not defined"),
        UndefinedMember = ("E014", "undefined member", "{}"),
        NotCallable = ("E015", "expression is not callable", "`{}` is not a function"),
        TypeArgumentCountMismatch = ("E016", "wrong number of type arguments", "{}"),
        TypeArgumentConstraint = ("E017", "type argument does not satisfy its constraint", "{}"),
        ArgumentCountMismatch = ("E018", "wrong number of arguments", "{}"),
        ImmutableAssignment = ("E019", "cannot assign to immutable binding", "cannot assign to `{}`"),
        ConditionNotBool = ("E020", "condition must be a `bool`", "condition must be a `bool`, found {}"),
        NotIterable = ("E021", "value is not iterable", "cannot iterate over {}"),
    }
}

error_codes! {
    /// Scope tree misuse.
    pub enum SymbolCode {
        ScopeNotFound = ("Y001", "scope not found", "scope `{}` not found"),
        ExitAtRoot = ("Y002", "cannot exit the global scope", "cannot exit the global scope"),
        SymbolNotFound = ("Y003", "symbol not found", "symbol `{}` not found"),
        SymbolKindMismatch = ("Y004", "symbol has a different kind", "{}"),
    }
}
