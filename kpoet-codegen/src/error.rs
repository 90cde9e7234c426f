use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

/// Result type for rendering operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while building templates or rendering a tree.
///
/// Every variant is fatal to the current render call.
#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("tag {tag} cannot be used for both '{existing}' and '{requested}'")]
    #[diagnostic(
        code(kpoet::tag_already_bound),
        help("each tag maps to exactly one identifier for the allocator's lifetime")
    )]
    TagAlreadyBound {
        tag: String,
        existing: String,
        requested: String,
    },

    #[error("unknown tag: {0}")]
    #[diagnostic(code(kpoet::unknown_tag))]
    UnknownTag(String),

    #[error("missing tag: {0}")]
    #[diagnostic(code(kpoet::missing_tag))]
    MissingTag(String),

    #[error("dangling format characters in '{0}'")]
    #[diagnostic(code(kpoet::dangling_format))]
    DanglingFormat(String),

    #[error("unknown format %{placeholder} at {index} in '{format}'")]
    #[diagnostic(
        code(kpoet::unknown_placeholder),
        help("supported placeholders are %L, %N, %S, %P, %T, %M and %%")
    )]
    UnknownPlaceholder {
        placeholder: char,
        index: usize,
        format: String,
    },

    #[error("%% may not have an index")]
    #[diagnostic(code(kpoet::indexed_percent))]
    IndexedPercent,

    #[error("index {index} for '{placeholder}' not in range (received {count} arguments)")]
    #[diagnostic(code(kpoet::index_out_of_range))]
    IndexOutOfRange {
        index: usize,
        placeholder: String,
        count: usize,
    },

    #[error("cannot mix indexed and positional parameters")]
    #[diagnostic(code(kpoet::mixed_arguments))]
    MixedArguments,

    #[error("unused arguments: expected {expected}, received {received}")]
    #[diagnostic(code(kpoet::unused_arguments))]
    UnusedArguments { expected: usize, received: usize },

    #[error("{}", unused_message(.unused))]
    #[diagnostic(code(kpoet::unused_arguments))]
    UnusedIndexedArguments { unused: Vec<String> },

    #[error("expected {expected} for %{placeholder} but was {actual}")]
    #[diagnostic(code(kpoet::argument_kind))]
    ArgumentKind {
        expected: &'static str,
        placeholder: char,
        actual: String,
    },

    #[error("Missing named argument for %{0}")]
    #[diagnostic(code(kpoet::missing_named_argument))]
    MissingNamedArgument(String),

    #[error("argument '{0}' must start with a lowercase character")]
    #[diagnostic(
        code(kpoet::invalid_argument_name),
        help("argument names use a-z, A-Z, 0-9 and _ and start with a lowercase letter")
    )]
    InvalidArgumentName(String),

    #[error("cannot unindent {levels} from {current}")]
    #[diagnostic(code(kpoet::unindent))]
    Unindent { levels: usize, current: usize },

    #[error("can't open a new statement until the current statement is closed")]
    #[diagnostic(code(kpoet::statement_open), help("a « must be followed by » before the next «"))]
    StatementAlreadyOpen,

    #[error("can't close a statement that hasn't been opened")]
    #[diagnostic(code(kpoet::statement_closed), help("a » must be preceded by «"))]
    StatementNotOpen,

    #[error("invalid package state: {0}")]
    #[diagnostic(code(kpoet::package_state))]
    PackageState(String),

    #[error("can't escape identifier {name} because it contains illegal characters: {illegal}")]
    #[diagnostic(code(kpoet::illegal_identifier))]
    IllegalIdentifier { name: String, illegal: String },

    #[error("line wrapper is closed")]
    #[diagnostic(code(kpoet::wrapper_closed))]
    WrapperClosed,

    #[error("non-wrapping text must not contain a newline: {0:?}")]
    #[diagnostic(code(kpoet::newline_in_non_wrapping))]
    NewlineInNonWrapping(String),

    #[error("{0}")]
    #[diagnostic(code(kpoet::invalid_spec))]
    InvalidSpec(String),

    #[error("failed to parse format options")]
    #[diagnostic(code(kpoet::config_parse))]
    Config(#[from] toml::de::Error),

    #[error("failed to read {path}")]
    #[diagnostic(code(kpoet::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write to the output sink")]
    #[diagnostic(code(kpoet::sink))]
    Sink(#[from] std::fmt::Error),
}

fn unused_message(unused: &[String]) -> String {
    let s = if unused.len() == 1 { "" } else { "s" };
    format!("unused argument{s}: {}", unused.join(", "))
}

impl Error {
    /// Create a builder validation error.
    pub fn invalid_spec(message: impl Into<String>) -> Self {
        Self::InvalidSpec(message.into())
    }

    pub(crate) fn argument_kind(
        expected: &'static str,
        placeholder: char,
        actual: impl Into<String>,
    ) -> Self {
        Self::ArgumentKind {
            expected,
            placeholder,
            actual: actual.into(),
        }
    }
}
