pub mod notation;
pub mod problem;
pub mod token_stream;
pub mod tree;

pub use notation::{parse_tree, to_notation, NotationError};
pub use problem::{ParseCancelled, Problem, ProblemReporter};
pub use token_stream::{Channel, ChannelSet, MultiChannelTokenStream, Token, TokenSource};
pub use tree::{unquote, SyntaxElement, SyntaxNode, SyntaxToken, MAX_DEPTH};

/// Node kinds produced by the XQuery grammar.
/// Use these constants with `node.kind` for pattern matching.
pub mod kind {
    // Top-level
    pub const MODULE: &str = "module";
    pub const MODULE_TRANSACTION: &str = "moduleTransaction";
    /// Boundary of an independent top-level transaction inside one unit
    pub const MAIN_MODULE: &str = "mainModule";
    pub const LIBRARY_MODULE: &str = "libraryModule";
    pub const QUERY_BODY: &str = "queryBody";

    // Prolog
    pub const VERSION_DECL: &str = "versionDecl";
    pub const MODULE_DECL: &str = "moduleDecl";
    pub const MODULE_IMPORT: &str = "moduleImport";
    pub const OPTION_DECL: &str = "optionDecl";
    pub const VAR_DECL: &str = "varDecl";

    // Functions
    pub const FUNCTION_DECL: &str = "functionDecl";
    pub const PARAM_LIST: &str = "paramList";
    pub const PARAM: &str = "param";
    pub const FUNCTION_BODY: &str = "functionBody";
    pub const FUNCTION_CALL: &str = "functionCall";
    pub const FUNCTION_NAME: &str = "functionName";
    pub const ARGUMENT_LIST: &str = "argumentList";

    // FLWOR
    pub const FLWOR_EXPR: &str = "flworExpr";
    pub const FOR_CLAUSE: &str = "forClause";
    pub const FOR_VAR: &str = "forVar";
    pub const LET_CLAUSE: &str = "letClause";
    pub const LET_VAR: &str = "letVar";
    pub const ORDER_SPEC: &str = "orderSpec";

    // Expressions
    pub const EXPR: &str = "expr";
    pub const IF_EXPR: &str = "ifExpr";
    pub const COMPARISON: &str = "comparison";
    pub const CASTABLE: &str = "castable";
    pub const TREAT: &str = "treat";
    pub const INSTANCE_OF: &str = "instanceOf";
    pub const ADD: &str = "add";
    pub const MULT: &str = "mult";
    pub const VAR_REF: &str = "varRef";
    pub const QNAME: &str = "qName";
    pub const STRING_LITERAL: &str = "stringLiteral";

    // Paths
    pub const RELATIVE_PATH_EXPR: &str = "relativePathExpr";
    pub const STEP_EXPR: &str = "stepExpr";
    pub const PREDICATE: &str = "predicate";
    pub const NODE_TEST: &str = "nodeTest";
    pub const KIND_TEST: &str = "kindTest";
    pub const TEXT_TEST: &str = "textTest";

    // Types
    pub const SEQUENCE_TYPE: &str = "sequenceType";
    pub const ITEM_TYPE: &str = "itemType";
}

/// Field labels the grammar gives to child elements.
pub mod field {
    pub const NAME: &str = "name";
    pub const TYPE: &str = "type";
    pub const PREFIX: &str = "prefix";
    pub const URI: &str = "uri";
    pub const AT: &str = "at";
    pub const VERSION: &str = "version";
    pub const CONDITION: &str = "condition";
}
