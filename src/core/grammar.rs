//! Grammars
//!
//! A grammar is pure data: an ordered list of regex rules, each assigning a
//! token class, plus a table of multi-line constructs. Rules later in the
//! list overwrite classes assigned by earlier rules on overlapping text.
//! Grammars are compiled once and shared read-only.

use std::collections::HashMap;
use std::sync::Arc;

use regex::Regex;

use crate::core::error::GrammarError;

// ===== TOKEN CLASSES =====

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenClass {
    /// Resets text to the default color; never reported as a span
    Plain,
    Keyword,
    Operator,
    Number,
    /// True/False/None and friends
    Constant,
    String,
    Comment,
    Function,
    Class,
    Argument,
    Callable,
    /// Built-in exception names
    ErrorType,
    /// The host application's module name
    Module,
    /// Built-in type names and math functions
    Builtin,
    SelfRef,
    Type,
    Variable,
    /// Identifier followed by `.`
    Object,
}

// ===== RULES =====

#[derive(Debug, Clone)]
pub struct Rule {
    pub pattern: Regex,
    /// Capture group whose range is classified (0 = whole match)
    pub group: usize,
    pub class: TokenClass,
}

/// A construct that may span lines, such as `'''...'''` or `/* ... */`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultilineConstruct {
    pub open: String,
    pub close: String,
    /// Carry-state id, never 0
    pub state: u8,
    pub class: TokenClass,
}

#[derive(Debug, Clone)]
pub struct Grammar {
    pub name: String,
    pub rules: Vec<Rule>,
    pub constructs: Vec<MultilineConstruct>,
    /// Line comment marker used by comment toggling
    pub comment_marker: String,
}

// ===== BUILDER =====

pub struct GrammarBuilder {
    grammar: Grammar,
}

impl GrammarBuilder {
    /// Classify whole matches of `pattern`
    pub fn rule(self, pattern: &str, class: TokenClass) -> Result<Self, GrammarError> {
        self.capture(pattern, 0, class)
    }

    /// Classify capture group `group` of `pattern`
    pub fn capture(mut self, pattern: &str, group: usize, class: TokenClass) -> Result<Self, GrammarError> {
        let compiled = Regex::new(pattern).map_err(|source| GrammarError::BadRule {
            pattern: pattern.to_string(),
            source,
        })?;
        self.grammar.rules.push(Rule {
            pattern: compiled,
            group,
            class,
        });
        Ok(self)
    }

    /// Classify any of `words` as whole words
    pub fn words(self, words: &[&str], class: TokenClass) -> Result<Self, GrammarError> {
        let alternatives: Vec<String> = words.iter().map(|w| regex::escape(w)).collect();
        self.rule(&format!(r"\b(?:{})\b", alternatives.join("|")), class)
    }

    /// Classify any of `symbols` literally, longest first
    pub fn symbols(self, symbols: &[&str], class: TokenClass) -> Result<Self, GrammarError> {
        let mut sorted: Vec<&str> = symbols.to_vec();
        sorted.sort_by_key(|s| std::cmp::Reverse(s.len()));
        sorted.dedup();
        let alternatives: Vec<String> = sorted.iter().map(|s| regex::escape(s)).collect();
        self.rule(&alternatives.join("|"), class)
    }

    /// Add a multi-line construct; carry-state ids are assigned in order from 1
    pub fn multiline(mut self, open: &str, close: &str, class: TokenClass) -> Self {
        let state = self.grammar.constructs.len() as u8 + 1;
        self.grammar.constructs.push(MultilineConstruct {
            open: open.to_string(),
            close: close.to_string(),
            state,
            class,
        });
        self
    }

    pub fn build(self) -> Grammar {
        self.grammar
    }
}

// ===== BUILT-IN GRAMMARS =====

const PYTHON_KEYWORDS: &[&str] = &[
    "and", "assert", "break", "continue", "del", "elif", "else", "except", "exec", "finally",
    "for", "from", "global", "if", "import", "in", "is", "lambda", "not", "or", "pass", "print",
    "raise", "return", "try", "while", "yield", "with", "as",
];

const PYTHON_ERRORS: &[&str] = &[
    "AssertionError", "AttributeError", "EOFError", "FloatingPointError", "GeneratorExit",
    "ImportError", "IndexError", "KeyError", "KeyboardInterrupt", "MemoryError", "NameError",
    "NotImplementedError", "OSError", "OverflowError", "ReferenceError", "RuntimeError",
    "StopIteration", "SyntaxError", "IndentationError", "TabError", "SystemError", "SystemExit",
    "TypeError", "UnboundLocalError", "UnicodeError", "UnicodeEncodeError", "UnicodeDecodeError",
    "UnicodeTranslateError", "ValueError", "ZeroDivisionError",
];

const PYTHON_OPERATORS: &[&str] = &[
    "=", "==", "!=", "<", "<=", ">", ">=", "+", "-", "*", "/", "//", "%", "**", "+=", "-=", "*=",
    "/=", "%=", "^", "|", "&", "~", ">>", "<<",
];

const PYTHON_BUILTIN_TYPES: &[&str] = &[
    "def", "class", "int", "str", "float", "bool", "list", "dict", "set",
];

const BLINK_KEYWORDS: &[&str] = &[
    "class", "const", "enum", "explicit", "friend", "inline", "long", "namespace", "operator",
    "private", "protected", "public", "short", "signed", "static", "struct", "template",
    "typedef", "typename", "union", "unsigned", "virtual", "volatile", "local", "param",
    "kernel", "for", "continue", "return", "if", "else", "while", "true", "false",
];

const BLINK_OPERATORS: &[&str] = &[
    "=", "==", "!=", "<", "<=", ">", ">=", "+", "-", "*", "/", "//", "%", "**", "+=", "-=", "*=",
    "/=", "%=", "^", "|", "&", "~", ">>", "<<", "++", "?", "!",
];

const BLINK_VALUE_TYPES: &[&str] = &[
    "int", "int2", "int3", "int4", "float", "float2", "float3", "float4", "float3x3", "float4x4",
    "bool", "char", "double", "void",
];

const BLINK_API: &[&str] = &[
    "Image", "eRead", "eWrite", "eReadWrite", "eEdgeClamped", "eEdgeConstant", "eEdgeNull",
    "eAccessPoint", "eAccessRanged1D", "eAccessRanged2D", "eAccessRandom", "eComponentWise",
    "ePixelWise", "ImageComputationKernel",
];

const BLINK_FUNCTIONS: &[&str] = &[
    "define", "defineParam", "process", "init", "setRange", "setAxis", "median", "bilinear",
];

const TCL_KEYWORDS: &[&str] = &[
    "proc", "if", "while", "for", "foreach", "switch", "string", "list", "array", "catch",
    "return", "puts", "source", "incr", "rename", "continue", "unset", "append", "lindex",
    "concat", "regexp", "join", "format", "open", "close", "info", "eof", "seek", "else",
];

const TCL_MATH: &[&str] = &[
    "set", "expr", "puts", "exists", "x", "abs", "acos", "asin", "atan", "atan2", "ceil",
    "clamp", "cos", "cosh", "degrees", "exp", "exponent", "fBm", "fabs", "floor", "fmod",
    "frame", "hypot", "int", "ldexp", "lerp", "log", "log10", "logb", "mantissa", "max", "min",
    "mix", "noise", "pi", "pow", "pow2", "radians", "random", "rint", "sin", "sinh",
    "smoothstep", "sqrt", "step", "tan", "tanh", "trunc", "turbulence", "y",
];

const DOUBLE_QUOTED: &str = r#""[^"\\]*(\\.[^"\\]*)*""#;
const SINGLE_QUOTED: &str = r"'[^'\\]*(\\.[^'\\]*)*'";

impl Grammar {
    pub fn builder(name: &str, comment_marker: &str) -> GrammarBuilder {
        GrammarBuilder {
            grammar: Grammar {
                name: name.to_string(),
                rules: Vec::new(),
                constructs: Vec::new(),
                comment_marker: comment_marker.to_string(),
            },
        }
    }

    /// General scripting grammar
    pub fn python() -> Result<Self, GrammarError> {
        use TokenClass::*;
        Ok(Self::builder("python", "#")
            .capture(r"def [\w]+[\s]*\((.*)\)", 1, Argument)?
            .rule(",", Plain)?
            .rule(r"[^\(\w),.][\s]*[\w]+", Plain)?
            .capture(r"\b([\w]+)[\s]*[(]", 1, Callable)?
            .words(PYTHON_KEYWORDS, Keyword)?
            .words(PYTHON_ERRORS, ErrorType)?
            .symbols(PYTHON_OPERATORS, Operator)?
            .words(&["True", "False", "None"], Constant)?
            .rule(r"\b[0-9]+\b", Number)?
            .capture(r"def[\s]+([\w\.]+)", 1, Function)?
            .capture(r"class[\s]+([\w\.]+)", 1, Class)?
            .capture(r"class[\s]+[\w\.]+[\s]*\((.*)\)", 1, Class)?
            .capture(r"def[\s]+[\w]+[\s]*\(([\w]+)", 1, Argument)?
            .words(&["nuke"], Module)?
            .words(PYTHON_BUILTIN_TYPES, Builtin)?
            .words(&["self"], SelfRef)?
            .rule(DOUBLE_QUOTED, String)?
            .rule(SINGLE_QUOTED, String)?
            .rule(r"#[^\n]*", Comment)?
            .multiline("'''", "'''", String)
            .multiline(r#"""""#, r#"""""#, String)
            .build())
    }

    /// C-like kernel grammar
    pub fn blink() -> Result<Self, GrammarError> {
        use TokenClass::*;
        Ok(Self::builder("blink", "//")
            .rule(r"\b\d+\b", Number)?
            .rule(r"\b\d+\.\d*(?:f)?\b", Number)?
            .words(BLINK_KEYWORDS, Keyword)?
            .capture(r"\b(\w+)\s*\(", 1, Function)?
            .words(BLINK_FUNCTIONS, Function)?
            .words(BLINK_API, Builtin)?
            .words(BLINK_VALUE_TYPES, Type)?
            .symbols(BLINK_OPERATORS, Operator)?
            .rule(r#""([^"\\]|\\.)*""#, String)?
            .rule(r"'([^'\\]|\\.)*'", String)?
            .rule(r"//[^\n]*", Comment)?
            .multiline("/*", "*/", Comment)
            .build())
    }

    /// Command-language (expression) grammar
    pub fn tcl() -> Result<Self, GrammarError> {
        use TokenClass::*;
        Ok(Self::builder("tcl", "#")
            .rule(r"\b[0-9]+\b", Number)?
            .rule("true|false|True|False", Constant)?
            .rule(r"proc\s+([\w\.]+)", Function)?
            .words(TCL_KEYWORDS, Keyword)?
            .words(TCL_MATH, Builtin)?
            .rule(DOUBLE_QUOTED, String)?
            .rule(SINGLE_QUOTED, String)?
            .capture(r"(\w+)\.", 1, Object)?
            .rule(r"\b\d+\.\d+\b", Number)?
            .rule(r"\$\w+", Variable)?
            .rule(r"\$::\w+", Variable)?
            .rule(r"#[^\n]*", Comment)?
            .build())
    }

    pub fn construct(&self, state: u8) -> Option<&MultilineConstruct> {
        self.constructs.iter().find(|c| c.state == state)
    }
}

// ===== REGISTRY =====

/// Named grammars, built once and shared
#[derive(Debug, Clone, Default)]
pub struct GrammarRegistry {
    grammars: HashMap<String, Arc<Grammar>>,
    aliases: HashMap<String, String>,
}

impl GrammarRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The three built-in grammars with their usual aliases
    pub fn builtin() -> Result<Self, GrammarError> {
        let mut registry = Self::new();
        registry.register(Grammar::python()?, &["py"]);
        registry.register(Grammar::blink()?, &["blinkscript", "kernel", "cpp"]);
        registry.register(Grammar::tcl()?, &["expression", "expr"]);
        Ok(registry)
    }

    pub fn register(&mut self, grammar: Grammar, aliases: &[&str]) {
        let name = grammar.name.clone();
        for alias in aliases {
            self.aliases.insert(alias.to_string(), name.clone());
        }
        self.grammars.insert(name, Arc::new(grammar));
    }

    pub fn get(&self, name: &str) -> Result<Arc<Grammar>, GrammarError> {
        let key = name.to_ascii_lowercase();
        let resolved = self.aliases.get(&key).unwrap_or(&key);
        self.grammars
            .get(resolved)
            .cloned()
            .ok_or_else(|| GrammarError::UnknownGrammar(name.to_string()))
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.grammars.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
