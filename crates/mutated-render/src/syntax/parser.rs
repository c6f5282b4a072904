//! Indentation-driven parser over lexer tokens
//!
//! Builds the node arena of a [`SyntaxTree`](super::SyntaxTree). Mappings and
//! sequences are recognized by the column of their first key or dash; a
//! sequence may sit at the same column as the key that owns it.

use crate::error::SyntaxError;
use crate::syntax::{MappingEntry, Node, NodeId, NodeKind, SequenceEntry, Token, TokenKind};
use std::ops::Range;

/// Where a value appears
#[derive(Debug, Clone, Copy)]
enum Owner {
    /// After `key:`; same-line content must be a scalar
    Key { line: usize, column: usize },
    /// After `-`; same-line content may start a mapping or sequence
    Dash { line: usize, column: usize },
}

pub(crate) struct Parser<'t> {
    tokens: &'t [Token],
    /// Indices of content tokens
    content: Vec<usize>,
    cursor: usize,
    nodes: Vec<Node>,
}

impl<'t> Parser<'t> {
    pub(crate) fn new(tokens: &'t [Token]) -> Self {
        let content = tokens
            .iter()
            .enumerate()
            .filter(|(_, token)| token.kind.is_content())
            .map(|(i, _)| i)
            .collect();
        Self {
            tokens,
            content,
            cursor: 0,
            nodes: Vec::new(),
        }
    }

    /// Parse a single document; returns the node arena and the root
    pub(crate) fn parse(mut self) -> Result<(Vec<Node>, NodeId), SyntaxError> {
        if self.peek_kind() == Some(TokenKind::DocumentStart) {
            self.cursor += 1;
        }

        let root = match self.peek() {
            Some((_, token)) if token.kind != TokenKind::DocumentEnd => self.node()?,
            _ => self.null_at(self.next_index()),
        };

        if self.peek_kind() == Some(TokenKind::DocumentEnd) {
            self.cursor += 1;
        }
        if let Some((_, token)) = self.peek() {
            return Err(unexpected(token));
        }
        Ok((self.nodes, root))
    }

    fn peek(&self) -> Option<(usize, &'t Token)> {
        self.content
            .get(self.cursor)
            .map(|&index| (index, &self.tokens[index]))
    }

    fn peek_kind(&self) -> Option<TokenKind> {
        self.peek().map(|(_, token)| token.kind)
    }

    /// Token index of the next content token, or the end of the stream
    fn next_index(&self) -> usize {
        self.peek().map_or(self.tokens.len(), |(index, _)| index)
    }

    fn push(&mut self, kind: NodeKind, span: Range<usize>) -> NodeId {
        self.nodes.push(Node { kind, span });
        NodeId(self.nodes.len() - 1)
    }

    fn null_at(&mut self, index: usize) -> NodeId {
        self.push(NodeKind::Null, index..index)
    }

    fn span_end(&self, id: NodeId) -> usize {
        self.nodes[id.0].span.end
    }

    /// Node starting at the current token
    fn node(&mut self) -> Result<NodeId, SyntaxError> {
        let Some((index, token)) = self.peek() else {
            return Ok(self.null_at(self.tokens.len()));
        };
        match token.kind {
            TokenKind::Dash => self.sequence(token.column),
            TokenKind::Key => self.mapping(token.column),
            TokenKind::Scalar => {
                self.cursor += 1;
                Ok(self.push(NodeKind::Scalar, index..index + 1))
            }
            TokenKind::Flow => {
                self.cursor += 1;
                Ok(self.push(NodeKind::Flow, index..index + 1))
            }
            TokenKind::BlockHeader => {
                self.cursor += 1;
                let mut end = index + 1;
                while let Some((line_index, TokenKind::BlockLine)) =
                    self.peek().map(|(i, t)| (i, t.kind))
                {
                    end = line_index + 1;
                    self.cursor += 1;
                }
                if token.text.contains('+') {
                    end = self.blank_lines_end(end);
                }
                Ok(self.push(NodeKind::Scalar, index..end))
            }
            _ => Err(unexpected(token)),
        }
    }

    /// End of the empty lines following a token index; kept block scalars
    /// (`|+`) own them
    fn blank_lines_end(&self, mut end: usize) -> usize {
        while let Some(token) = self.tokens.get(end) {
            let blank = match token.kind {
                TokenKind::Newline => true,
                TokenKind::Indent => self
                    .tokens
                    .get(end + 1)
                    .is_some_and(|next| next.kind == TokenKind::Newline),
                _ => false,
            };
            if !blank {
                break;
            }
            end += 1;
        }
        end
    }

    fn mapping(&mut self, column: usize) -> Result<NodeId, SyntaxError> {
        let start = self.next_index();
        let mut entries = Vec::new();

        while let Some((key_index, key)) = self.peek() {
            if key.kind != TokenKind::Key || key.column != column {
                break;
            }
            self.cursor += 1;
            let name = key_name(key)?;
            let key_node = self.push(NodeKind::Scalar, key_index..key_index + 1);

            let (colon_index, colon) = match self.peek() {
                Some((i, token)) if token.kind == TokenKind::Colon => (i, token),
                _ => return Err(unexpected(key)),
            };
            self.cursor += 1;

            let value = self.value(
                Owner::Key {
                    line: colon.line,
                    column,
                },
                colon_index + 1,
            )?;
            let end = self.span_end(value).max(colon_index + 1);
            entries.push(MappingEntry {
                name,
                key: key_node,
                value,
                span: key_index..end,
            });
        }

        let end = entries.last().map_or(start, |entry| entry.span.end);
        Ok(self.push(NodeKind::Mapping(entries), start..end))
    }

    fn sequence(&mut self, column: usize) -> Result<NodeId, SyntaxError> {
        let start = self.next_index();
        let mut entries = Vec::new();

        while let Some((dash_index, dash)) = self.peek() {
            if dash.kind != TokenKind::Dash || dash.column != column {
                break;
            }
            self.cursor += 1;
            let value = self.value(
                Owner::Dash {
                    line: dash.line,
                    column,
                },
                dash_index + 1,
            )?;
            let end = self.span_end(value).max(dash_index + 1);
            entries.push(SequenceEntry {
                value,
                span: dash_index..end,
            });
        }

        let end = entries.last().map_or(start, |entry| entry.span.end);
        Ok(self.push(NodeKind::Sequence(entries), start..end))
    }

    /// Value following a key or dash; `empty_at` positions a null value
    fn value(&mut self, owner: Owner, empty_at: usize) -> Result<NodeId, SyntaxError> {
        let Some((_, token)) = self.peek() else {
            return Ok(self.null_at(empty_at));
        };
        if token.kind == TokenKind::DocumentEnd {
            return Ok(self.null_at(empty_at));
        }

        let (owner_line, owner_column) = match owner {
            Owner::Key { line, column } | Owner::Dash { line, column } => (line, column),
        };

        if token.line == owner_line {
            return match (owner, token.kind) {
                (Owner::Key { .. }, TokenKind::Key | TokenKind::Dash) => Err(unexpected(token)),
                _ => self.node(),
            };
        }

        if token.column > owner_column {
            return self.node();
        }
        if matches!(owner, Owner::Key { .. })
            && token.kind == TokenKind::Dash
            && token.column == owner_column
        {
            return self.sequence(owner_column);
        }
        Ok(self.null_at(empty_at))
    }
}

fn unexpected(token: &Token) -> SyntaxError {
    SyntaxError::Unexpected {
        found: token.text.clone(),
        line: token.line + 1,
        column: token.column + 1,
    }
}

/// Decoded text of a mapping key
fn key_name(token: &Token) -> Result<String, SyntaxError> {
    if token.text.starts_with(['"', '\'']) {
        serde_yaml::from_str(&token.text).map_err(|source| SyntaxError::InvalidKey {
            line: token.line + 1,
            source,
        })
    } else {
        Ok(token.text.clone())
    }
}
