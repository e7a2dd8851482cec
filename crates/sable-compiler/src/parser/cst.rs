//! Syntax kinds for Sable.
//!
//! `SyntaxKind` serves dual roles: token kinds (from lexer) and node kinds (from parser).
//! Logos derives token recognition; node kinds lack token/regex attributes.
//! `SableLang` implements Rowan's `Language` trait for tree construction.

use logos::Logos;
use rowan::Language;

/// All token and node kinds. Tokens first, then nodes, then `__LAST` sentinel.
/// `#[repr(u16)]` enables safe transmute in `kind_from_raw`.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
pub enum SyntaxKind {
    #[token("(")]
    ParenOpen = 0,

    #[token(")")]
    ParenClose,

    #[token("[")]
    BracketOpen,

    #[token("]")]
    BracketClose,

    #[token("{")]
    BraceOpen,

    #[token("}")]
    BraceClose,

    /// `<|` opens type parameters and type arguments
    #[token("<|")]
    TypeArgsOpen,

    #[token("|>")]
    TypeArgsClose,

    #[token(",")]
    Comma,

    #[token(";")]
    Semicolon,

    #[token(":")]
    Colon,

    #[token(".")]
    Dot,

    /// Rest parameter marker
    #[token("...")]
    Ellipsis,

    #[token("->")]
    Arrow,

    #[token("=>")]
    FatArrow,

    #[token("?")]
    Question,

    #[token("=")]
    Equals,

    #[token("+")]
    Plus,

    #[token("-")]
    Minus,

    #[token("*")]
    Star,

    /// Division. The lexer rewrites it into `RegexLit` where an operand is expected.
    #[token("/")]
    Slash,

    #[token("%")]
    Percent,

    /// Exponent operator `^e`
    #[token("^e")]
    Exp,

    #[token("==")]
    EqEq,

    #[token("!=")]
    NotEq,

    #[token("<")]
    Lt,

    #[token("<=")]
    LtEq,

    #[token(">")]
    Gt,

    #[token(">=")]
    GtEq,

    #[token("&&")]
    AndAnd,

    #[token("||")]
    OrOr,

    #[token("!")]
    Bang,

    #[token("++")]
    PlusPlus,

    #[token("--")]
    MinusMinus,

    /// Single-letter keyword; ties with `Id` at equal priority otherwise.
    #[token("f", priority = 3)]
    KwF,

    #[token("class")]
    KwClass,

    #[token("enum")]
    KwEnum,

    #[token("interface")]
    KwInterface,

    #[token("const")]
    KwConst,

    #[token("let")]
    KwLet,

    #[token("if")]
    KwIf,

    #[token("else")]
    KwElse,

    #[token("for")]
    KwFor,

    #[token("in")]
    KwIn,

    #[token("loop")]
    KwLoop,

    #[token("return")]
    KwReturn,

    #[token("print")]
    KwPrint,

    #[token("when")]
    KwWhen,

    #[token("break")]
    KwBreak,

    #[token("continue")]
    KwContinue,

    #[token("true")]
    KwTrue,

    #[token("false")]
    KwFalse,

    #[token("bool")]
    #[token("string")]
    #[token("path")]
    #[token("regex")]
    PrimitiveName,

    #[token("int8")]
    #[token("int16")]
    #[token("int32")]
    #[token("int64")]
    #[token("uint8")]
    #[token("uint16")]
    #[token("uint32")]
    #[token("uint64")]
    #[token("dec32")]
    #[token("dec64")]
    NumberName,

    /// Digits with optional fraction and size suffix: `42`, `2.5`, `1_000`, `1_int16`
    #[regex(r"[0-9][0-9_]*(\.[0-9][0-9_]*)?(_(int8|int16|int32|int64|uint8|uint16|uint32|uint64|dec32|dec64))?")]
    Number,

    #[regex(r#""(?:[^"\\\n]|\\.)*""#)]
    StringLit,

    #[regex(r#"p"(?:[^"\\\n]|\\.)*""#)]
    PathLit,

    /// `/pattern/`, produced by the lexer from `Slash` in operand position
    RegexLit,

    /// Exact keyword matches win over identifiers of the same length.
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*")]
    Id,

    #[regex(r"[ \t]+")]
    Whitespace,

    #[token("\n")]
    #[token("\r\n")]
    Newline,

    #[regex(r"//[^\n]*", allow_greedy = true)]
    LineComment,

    #[regex(r"/\*(?:[^*]|\*[^/])*\*/")]
    BlockComment,

    /// Coalesced unrecognized characters
    Garbage,
    Error,

    // --- Node kinds (non-terminals) ---
    Root,
    FunctionDecl,
    TypeParamList,
    TypeParam,
    ParamList,
    Param,
    ReturnTypes,
    ClassDecl,
    ClassBody,
    EnumDecl,
    EnumBody,
    EnumMember,
    InterfaceDecl,
    InterfaceBody,
    InterfaceMember,
    VariableDecl,
    TargetList,
    VariableTarget,
    ExprList,
    Block,
    IfStmt,
    ElseClause,
    ForStmt,
    LoopStmt,
    ReturnStmt,
    PrintStmt,
    WhenStmt,
    WhenBody,
    WhenCase,
    BreakStmt,
    ContinueStmt,
    AssignStmt,
    ExprStmt,
    TernaryExpr,
    BinaryExpr,
    UnaryExpr,
    CallExpr,
    ArgList,
    TypeArgList,
    MemberExpr,
    IndexExpr,
    ParenExpr,
    TupleExpr,
    ArrayExpr,
    ObjectExpr,
    ObjectField,
    Literal,
    NameRef,
    AnonFunction,
    PrimitiveType,
    NumberType,
    NamedType,
    InstanceType,
    FunctionType,
    TypeList,
    ArrayType,

    // Must be last - used for bounds checking in `kind_from_raw`
    #[doc(hidden)]
    __LAST,
}

use SyntaxKind::*;

impl SyntaxKind {
    #[inline]
    pub fn is_trivia(self) -> bool {
        matches!(self, Whitespace | Newline | LineComment | BlockComment)
    }

    #[inline]
    pub fn is_error(self) -> bool {
        matches!(self, Error | Garbage)
    }

    #[inline]
    pub fn is_node(self) -> bool {
        self >= Root && self < __LAST
    }

    /// Human-readable name used in syntax and shape errors.
    pub fn describe(self) -> &'static str {
        match self {
            ParenOpen => "`(`",
            ParenClose => "`)`",
            BracketOpen => "`[`",
            BracketClose => "`]`",
            BraceOpen => "`{`",
            BraceClose => "`}`",
            TypeArgsOpen => "`<|`",
            TypeArgsClose => "`|>`",
            Comma => "`,`",
            Semicolon => "`;`",
            Colon => "`:`",
            Dot => "`.`",
            Ellipsis => "`...`",
            Arrow => "`->`",
            FatArrow => "`=>`",
            Question => "`?`",
            Equals => "`=`",
            Plus | Minus | Star | Slash | Percent | Exp | EqEq | NotEq | Lt | LtEq | Gt
            | GtEq | AndAnd | OrOr | Bang | PlusPlus | MinusMinus => "operator",
            KwF | KwClass | KwEnum | KwInterface | KwConst | KwLet | KwIf | KwElse | KwFor
            | KwIn | KwLoop | KwReturn | KwPrint | KwWhen | KwBreak | KwContinue => "keyword",
            KwTrue | KwFalse | Number | StringLit | PathLit | RegexLit | Literal => "literal",
            PrimitiveName | NumberName => "type name",
            Id | NameRef => "identifier",
            Whitespace | Newline | LineComment | BlockComment => "trivia",
            Garbage | Error => "invalid syntax",
            Root => "program",
            FunctionDecl => "function",
            TypeParamList => "type parameter list",
            TypeParam => "type parameter",
            ParamList => "parameter list",
            Param => "parameter",
            ReturnTypes => "return types",
            ClassDecl => "class",
            ClassBody => "class body",
            EnumDecl => "enum",
            EnumBody => "enum body",
            EnumMember => "enum member",
            InterfaceDecl => "interface",
            InterfaceBody => "interface body",
            InterfaceMember => "interface member",
            VariableDecl => "variable declaration",
            TargetList => "variable targets",
            VariableTarget => "variable target",
            ExprList => "expression list",
            Block => "block",
            IfStmt | ElseClause | ForStmt | LoopStmt | ReturnStmt | PrintStmt | WhenStmt
            | WhenBody | WhenCase | BreakStmt | ContinueStmt | AssignStmt | ExprStmt => "statement",
            TernaryExpr | BinaryExpr | UnaryExpr | CallExpr | MemberExpr | IndexExpr
            | ParenExpr | TupleExpr | ArrayExpr | ObjectExpr | AnonFunction => "expression",
            ArgList => "argument list",
            TypeArgList => "type argument list",
            ObjectField => "object field",
            PrimitiveType | NumberType | NamedType | InstanceType | FunctionType | ArrayType => {
                "type"
            }
            TypeList => "type list",
            __LAST => "end of input",
        }
    }
}

impl From<SyntaxKind> for rowan::SyntaxKind {
    #[inline]
    fn from(kind: SyntaxKind) -> Self {
        Self(kind as u16)
    }
}

/// Language tag for Rowan's tree types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SableLang {}

impl Language for SableLang {
    type Kind = SyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> Self::Kind {
        assert!(raw.0 < __LAST as u16);
        // SAFETY: We've verified the value is in bounds, and SyntaxKind is repr(u16)
        unsafe { std::mem::transmute::<u16, SyntaxKind>(raw.0) }
    }

    fn kind_to_raw(kind: Self::Kind) -> rowan::SyntaxKind {
        kind.into()
    }
}

/// Type aliases for Rowan types parameterized by our language.
pub type SyntaxNode = rowan::SyntaxNode<SableLang>;
pub type SyntaxToken = rowan::SyntaxToken<SableLang>;
pub type SyntaxElement = rowan::NodeOrToken<SyntaxNode, SyntaxToken>;

/// 128-bit bitset of `SyntaxKind`s for O(1) membership testing.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct KindSet(u128);

impl KindSet {
    pub const EMPTY: KindSet = KindSet(0);

    /// Panics at compile time if any kind's discriminant >= 128.
    #[inline]
    pub const fn new(kinds: &[SyntaxKind]) -> Self {
        let mut bits = 0u128;
        let mut i = 0;
        while i < kinds.len() {
            let kind = kinds[i] as u16;
            assert!(kind < 128, "SyntaxKind value exceeds KindSet capacity");
            bits |= 1 << kind;
            i += 1;
        }
        KindSet(bits)
    }

    #[inline]
    pub const fn single(kind: SyntaxKind) -> Self {
        let kind = kind as u16;
        assert!(kind < 128, "SyntaxKind value exceeds KindSet capacity");
        KindSet(1 << kind)
    }

    #[inline]
    pub const fn contains(&self, kind: SyntaxKind) -> bool {
        let kind = kind as u16;
        if kind >= 128 {
            return false;
        }
        self.0 & (1 << kind) != 0
    }

    #[inline]
    pub const fn union(self, other: KindSet) -> KindSet {
        KindSet(self.0 | other.0)
    }

    /// Members in discriminant order.
    pub fn iter(self) -> impl Iterator<Item = SyntaxKind> {
        (0..__LAST as u16)
            .filter(move |&i| i < 128 && self.0 & (1 << i) != 0)
            .map(|i| SableLang::kind_from_raw(rowan::SyntaxKind(i)))
    }

    /// Distinct human-readable names of the members, joined with `or`.
    pub fn describe(self) -> String {
        let mut names: Vec<&str> = Vec::new();
        for kind in self.iter() {
            let name = kind.describe();
            if !names.contains(&name) {
                names.push(name);
            }
        }
        names.join(" or ")
    }
}

impl std::fmt::Debug for KindSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

/// Pre-defined kind sets for the parser and the AST builder.
pub mod kind_sets {
    use super::*;

    pub const TRIVIA: KindSet = KindSet::new(&[Whitespace, Newline, LineComment, BlockComment]);

    pub const LITERAL_TOKENS: KindSet =
        KindSet::new(&[Number, StringLit, PathLit, RegexLit, KwTrue, KwFalse]);

    /// FIRST set of expressions (tokens).
    pub const EXPR_FIRST: KindSet = LITERAL_TOKENS.union(KindSet::new(&[
        Id,
        ParenOpen,
        BracketOpen,
        BraceOpen,
        KwF,
        Bang,
        Minus,
        PlusPlus,
        MinusMinus,
    ]));

    /// FIRST set of types (tokens).
    pub const TYPE_FIRST: KindSet = KindSet::new(&[PrimitiveName, NumberName, Id, KwF]);

    pub const BINARY_OPS: KindSet = KindSet::new(&[
        OrOr, AndAnd, EqEq, NotEq, Lt, LtEq, Gt, GtEq, Plus, Minus, Star, Slash, Percent, Exp,
    ]);

    pub const UNARY_OPS: KindSet = KindSet::new(&[Bang, Minus, PlusPlus, MinusMinus]);

    /// Expression node kinds.
    pub const EXPR: KindSet = KindSet::new(&[
        TernaryExpr,
        BinaryExpr,
        UnaryExpr,
        CallExpr,
        MemberExpr,
        IndexExpr,
        ParenExpr,
        TupleExpr,
        ArrayExpr,
        ObjectExpr,
        Literal,
        NameRef,
        AnonFunction,
    ]);

    /// Type node kinds.
    pub const TYPE: KindSet = KindSet::new(&[
        PrimitiveType,
        NumberType,
        NamedType,
        InstanceType,
        FunctionType,
        ArrayType,
    ]);

    /// Statement node kinds, including nested declarations.
    pub const STATEMENT: KindSet = KindSet::new(&[
        VariableDecl,
        FunctionDecl,
        Block,
        IfStmt,
        ForStmt,
        LoopStmt,
        ReturnStmt,
        PrintStmt,
        WhenStmt,
        BreakStmt,
        ContinueStmt,
        AssignStmt,
        ExprStmt,
    ]);

    pub const DECLARATION: KindSet =
        KindSet::new(&[FunctionDecl, ClassDecl, EnumDecl, InterfaceDecl, VariableDecl]);

    pub const DECLARATION_FIRST: KindSet =
        KindSet::new(&[KwF, KwClass, KwEnum, KwInterface, KwConst, KwLet]);

    pub const STATEMENT_RECOVERY: KindSet = KindSet::new(&[
        Semicolon, BraceClose, KwConst, KwLet, KwIf, KwFor, KwLoop, KwReturn, KwPrint, KwWhen,
        KwBreak, KwContinue,
    ]);

    pub const ROOT_RECOVERY: KindSet = DECLARATION_FIRST;

    /// Tokens that end a delimited list even when they are not its closer.
    pub const LIST_RECOVERY: KindSet = KindSet::new(&[
        BraceOpen,
        BraceClose,
        ParenClose,
        BracketClose,
        TypeArgsClose,
        Semicolon,
    ]);
}
