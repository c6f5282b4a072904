//! Format-preserving YAML syntax tree
//!
//! A [`SyntaxTree`] owns the token list of one YAML document and an arena of
//! nodes over it. Node spans are token index ranges, so marking a node only
//! flips flags on tokens and rendering reproduces the input byte for byte.
//!
//! # Supported subset
//! - Block mappings and sequences, including compact `- key: value` entries
//!   and sequences at the same indentation as their key
//! - Plain, single-quoted and double-quoted scalars (quoted may span lines)
//! - Literal and folded block scalars with chomping/indentation indicators
//! - Flow collections, kept as opaque single tokens
//! - Comments, blank lines, `---` and `...`
//!
//! Anchors, aliases, tags and multi-line plain scalars are not recognized.

mod lexer;
mod parser;

use crate::error::SyntaxError;
use crate::highlight::Marker;
use serde_json::Value;
use std::ops::Range;

/// Lexical class of a token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Leading spaces of a line
    Indent,
    /// Spaces or tabs between tokens
    Space,
    /// `\n`
    Newline,
    /// `# ...` up to the end of the line
    Comment,
    /// `---`
    DocumentStart,
    /// `...`
    DocumentEnd,
    /// Sequence entry indicator `-`
    Dash,
    /// Mapping key scalar
    Key,
    /// `:` after a key
    Colon,
    /// Plain or quoted scalar
    Scalar,
    /// `|` or `>` with indicators
    BlockHeader,
    /// One content line of a block scalar, without indentation
    BlockLine,
    /// Whole `{...}` or `[...]` collection
    Flow,
}

impl TokenKind {
    /// Whether the token carries document content (and can be marked)
    #[inline]
    #[must_use]
    pub fn is_content(self) -> bool {
        !matches!(
            self,
            Self::Indent | Self::Space | Self::Newline | Self::Comment
        )
    }
}

/// Source token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Lexical class
    pub kind: TokenKind,
    /// Exact source text
    pub text: String,
    /// Zero-based line of the first character
    pub line: usize,
    /// Zero-based column (in characters) of the first character
    pub column: usize,
    /// Set by highlighting
    pub marked: bool,
}

/// Index of a node in a [`SyntaxTree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// Mapping entry: key, value and the tokens from key to end of value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingEntry {
    /// Decoded key text
    pub name: String,
    /// Key scalar node
    pub key: NodeId,
    /// Value node
    pub value: NodeId,
    /// Token range of the whole entry
    pub span: Range<usize>,
}

/// Sequence entry: the dash and its value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceEntry {
    /// Value node
    pub value: NodeId,
    /// Token range of the whole entry
    pub span: Range<usize>,
}

/// Node shape
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// Block mapping
    Mapping(Vec<MappingEntry>),
    /// Block sequence
    Sequence(Vec<SequenceEntry>),
    /// Plain, quoted or block scalar
    Scalar,
    /// Flow collection
    Flow,
    /// Absent value
    Null,
}

impl NodeKind {
    /// Short name for error messages
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Mapping(_) => "mapping",
            Self::Sequence(_) => "sequence",
            Self::Scalar => "scalar",
            Self::Flow => "flow collection",
            Self::Null => "null",
        }
    }
}

/// Node in the arena
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    /// Shape and children
    pub kind: NodeKind,
    /// Token range covered by the node
    pub span: Range<usize>,
}

/// Parsed YAML document
#[derive(Debug, Clone)]
pub struct SyntaxTree {
    tokens: Vec<Token>,
    nodes: Vec<Node>,
    root: NodeId,
}

impl SyntaxTree {
    /// Parse one YAML document
    ///
    /// # Errors
    /// Returns [`SyntaxError`] for unterminated quotes or flow collections and
    /// for content that does not fit the indentation structure
    pub fn parse(source: &str) -> Result<Self, SyntaxError> {
        let tokens = lexer::Lexer::new(source).tokenize()?;
        let (nodes, root) = parser::Parser::new(&tokens).parse()?;
        Ok(Self {
            tokens,
            nodes,
            root,
        })
    }

    /// Root node
    #[inline]
    #[must_use]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Node by id
    #[inline]
    #[must_use]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    /// All tokens in source order
    #[inline]
    #[must_use]
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Mark every content token in a token range
    pub fn mark(&mut self, span: Range<usize>) {
        for token in &mut self.tokens[span] {
            if token.kind.is_content() {
                token.marked = true;
            }
        }
    }

    /// Remove all marks
    pub fn clear_marks(&mut self) {
        for token in &mut self.tokens {
            token.marked = false;
        }
    }

    /// Original source text
    #[must_use]
    pub fn render(&self) -> String {
        self.tokens.iter().map(|token| token.text.as_str()).collect()
    }

    /// Source text with marked tokens wrapped in the marker
    #[must_use]
    pub fn render_marked(&self, marker: &Marker) -> String {
        let mut out = String::new();
        for token in &self.tokens {
            if token.marked {
                out.push_str(&marker.wrap(&token.text));
            } else {
                out.push_str(&token.text);
            }
        }
        out
    }

    /// Source text of a node as a standalone YAML document
    ///
    /// Block collections starting mid-line get their first line padded to the
    /// original column so that the indentation stays consistent. Block
    /// scalars are re-based to the document root.
    #[must_use]
    pub fn node_source(&self, id: NodeId) -> String {
        let node = self.node(id);
        let tokens = &self.tokens[node.span.clone()];
        let mut out = String::new();
        match (&node.kind, tokens.first()) {
            (NodeKind::Mapping(_) | NodeKind::Sequence(_), Some(first)) => {
                out.push_str(&" ".repeat(first.column));
                out.extend(tokens.iter().map(|token| token.text.as_str()));
            }
            (NodeKind::Scalar, Some(header)) if header.kind == TokenKind::BlockHeader => {
                out.push_str(&block_source(tokens));
            }
            _ => out.extend(tokens.iter().map(|token| token.text.as_str())),
        }
        if !out.ends_with('\n') {
            out.push('\n');
        }
        out
    }

    /// Decoded value of a node
    ///
    /// # Errors
    /// Returns the YAML error if the node text does not decode
    pub fn node_value(&self, id: NodeId) -> Result<Value, serde_yaml::Error> {
        match self.node(id).kind {
            NodeKind::Null => Ok(Value::Null),
            _ => serde_yaml::from_str(&self.node_source(id)),
        }
    }
}

/// Block scalar tokens with every content line indented as a root scalar
///
/// Content lines get the header's indentation indicator as indentation (two
/// spaces without one); their relative indentation is part of the line text.
fn block_source(tokens: &[Token]) -> String {
    let indent = tokens
        .first()
        .and_then(|header| header.text.bytes().find(|b| (b'1'..=b'9').contains(b)))
        .map_or(2, |b| usize::from(b - b'0'));

    let mut out = String::new();
    for (i, token) in tokens.iter().enumerate() {
        match token.kind {
            TokenKind::Indent => {
                let before_content = tokens
                    .get(i + 1)
                    .is_some_and(|next| next.kind == TokenKind::BlockLine);
                if before_content {
                    out.push_str(&" ".repeat(indent));
                }
            }
            _ => out.push_str(&token.text),
        }
    }
    out
}
