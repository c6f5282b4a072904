//! YAML lexer
//!
//! Splits a document into tokens whose texts concatenate back to the input.
//! Whitespace, line breaks and comments become their own tokens so that only
//! content tokens are ever marked.

use crate::error::SyntaxError;
use crate::syntax::{Token, TokenKind};

/// Pending block scalar (`|` or `>`) whose lines are still being read
#[derive(Debug, Clone, Copy)]
struct Block {
    /// Column of the key or dash owning the scalar; `None` at document root
    parent: Option<usize>,
    /// Indentation of the content: from the header's indicator, else from
    /// the first content line
    indent: Option<usize>,
}

pub(crate) struct Lexer<'s> {
    src: &'s str,
    pos: usize,
    line: usize,
    column: usize,
    tokens: Vec<Token>,
    block: Option<Block>,
    /// Column of the last key or dash on the current line
    owner: Option<usize>,
}

impl<'s> Lexer<'s> {
    pub(crate) fn new(src: &'s str) -> Self {
        Self {
            src,
            pos: 0,
            line: 0,
            column: 0,
            tokens: Vec::new(),
            block: None,
            owner: None,
        }
    }

    pub(crate) fn tokenize(mut self) -> Result<Vec<Token>, SyntaxError> {
        while self.pos < self.src.len() {
            self.owner = None;
            if !self.block_line() {
                self.line_content()?;
            }
        }
        Ok(self.tokens)
    }

    fn rest(&self) -> &'s str {
        &self.src[self.pos..]
    }

    fn push(&mut self, kind: TokenKind, len: usize) {
        let text = &self.src[self.pos..self.pos + len];
        self.tokens.push(Token {
            kind,
            text: text.to_string(),
            line: self.line,
            column: self.column,
            marked: false,
        });
        for c in text.chars() {
            if c == '\n' {
                self.line += 1;
                self.column = 0;
            } else {
                self.column += 1;
            }
        }
        self.pos += len;
    }

    /// Length of the current line, without its line break
    fn line_len(&self) -> usize {
        self.rest().find('\n').unwrap_or(self.rest().len())
    }

    fn newline(&mut self) {
        if self.rest().starts_with('\n') {
            self.push(TokenKind::Newline, 1);
        }
    }

    /// Consume one line of a pending block scalar; false when the block ended
    fn block_line(&mut self) -> bool {
        let Some(mut block) = self.block else {
            return false;
        };
        let line = &self.rest()[..self.line_len()];
        let indent = line.len() - line.trim_start_matches(' ').len();
        let blank = line.trim().is_empty();

        if blank {
            if !line.is_empty() {
                self.push(TokenKind::Indent, line.len());
            }
        } else {
            let continues = match block.indent {
                Some(required) => indent >= required,
                None => block.parent.map_or(true, |parent| indent > parent),
            };
            if !continues {
                self.block = None;
                return false;
            }
            let base = *block.indent.get_or_insert(indent);
            self.block = Some(block);
            if base > 0 {
                self.push(TokenKind::Indent, base);
            }
            self.push(TokenKind::BlockLine, line.len() - base);
        }
        self.newline();
        true
    }

    fn line_content(&mut self) -> Result<(), SyntaxError> {
        let indent = self.rest().len() - self.rest().trim_start_matches(' ').len();
        if indent > 0 {
            self.push(TokenKind::Indent, indent);
        }

        if self.column == 0 {
            for (marker, kind) in [
                ("---", TokenKind::DocumentStart),
                ("...", TokenKind::DocumentEnd),
            ] {
                if self.rest().starts_with(marker) && ends_token(&self.rest()[3..]) {
                    self.push(kind, 3);
                }
            }
        }

        loop {
            let rest = self.rest();
            let Some(c) = rest.chars().next() else {
                return Ok(());
            };
            match c {
                '\n' => {
                    self.push(TokenKind::Newline, 1);
                    return Ok(());
                }
                ' ' | '\t' | '\r' => {
                    let len = rest.len() - rest.trim_start_matches([' ', '\t', '\r']).len();
                    self.push(TokenKind::Space, len);
                }
                '#' if self.at_token_boundary() => {
                    let len = self.line_len();
                    self.push(TokenKind::Comment, len);
                }
                '-' if ends_token(&rest[1..]) => {
                    self.owner = Some(self.column);
                    self.push(TokenKind::Dash, 1);
                }
                '{' | '[' => {
                    let len = self.flow_len()?;
                    self.push(TokenKind::Flow, len);
                }
                '"' | '\'' => {
                    let len = self.quoted_len(c)?;
                    self.scalar_or_key(len);
                }
                '|' | '>' => {
                    let len = rest
                        .find(|ch: char| ch.is_whitespace())
                        .unwrap_or(rest.len());
                    let parent = self.owner;
                    self.block = Some(Block {
                        parent,
                        indent: indentation_indicator(&rest[..len])
                            .map(|n| parent.unwrap_or(0) + n),
                    });
                    self.push(TokenKind::BlockHeader, len);
                }
                _ => {
                    let len = plain_len(rest);
                    self.scalar_or_key(len);
                }
            }
        }
    }

    /// Whether the previous token on this line (if any) is whitespace
    fn at_token_boundary(&self) -> bool {
        match self.tokens.last() {
            Some(token) if token.line == self.line => {
                matches!(token.kind, TokenKind::Indent | TokenKind::Space)
            }
            _ => true,
        }
    }

    /// Push a scalar, or a key and its colon when one follows
    fn scalar_or_key(&mut self, len: usize) {
        let after = &self.rest()[len..];
        if after.starts_with(':') && ends_token(&after[1..]) {
            self.owner = Some(self.column);
            self.push(TokenKind::Key, len);
            self.push(TokenKind::Colon, 1);
        } else {
            self.push(TokenKind::Scalar, len);
        }
    }

    fn quoted_len(&self, quote: char) -> Result<usize, SyntaxError> {
        let rest = self.rest();
        let mut chars = rest.char_indices().skip(1).peekable();
        while let Some((i, c)) = chars.next() {
            match c {
                '\\' if quote == '"' => {
                    chars.next();
                }
                '\'' if quote == '\'' => {
                    if chars.peek().is_some_and(|&(_, next)| next == '\'') {
                        chars.next();
                    } else {
                        return Ok(i + 1);
                    }
                }
                c if c == quote => return Ok(i + 1),
                _ => {}
            }
        }
        Err(self.unterminated("quoted scalar"))
    }

    fn flow_len(&self) -> Result<usize, SyntaxError> {
        let rest = self.rest();
        let mut depth = 0usize;
        let mut quote: Option<char> = None;
        let mut escaped = false;
        for (i, c) in rest.char_indices() {
            if let Some(q) = quote {
                if escaped {
                    escaped = false;
                } else if c == '\\' && q == '"' {
                    escaped = true;
                } else if c == q {
                    quote = None;
                }
                continue;
            }
            match c {
                '"' | '\'' => quote = Some(c),
                '{' | '[' => depth += 1,
                '}' | ']' => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        return Ok(i + 1);
                    }
                }
                _ => {}
            }
        }
        Err(self.unterminated("flow collection"))
    }

    fn unterminated(&self, what: &'static str) -> SyntaxError {
        SyntaxError::Unterminated {
            what,
            line: self.line + 1,
            column: self.column + 1,
        }
    }
}

/// Whether the text that follows ends the current token
fn ends_token(after: &str) -> bool {
    after.is_empty() || after.starts_with([' ', '\t', '\r', '\n'])
}

/// Explicit indentation indicator of a block scalar header (`|2`, `>-4`)
fn indentation_indicator(header: &str) -> Option<usize> {
    header
        .bytes()
        .skip(1)
        .find(|b| (b'1'..=b'9').contains(b))
        .map(|b| usize::from(b - b'0'))
}

/// Length of a plain scalar: up to `: `, ` #` or the end of the line,
/// excluding trailing whitespace
fn plain_len(rest: &str) -> usize {
    let line = &rest[..rest.find('\n').unwrap_or(rest.len())];
    let bytes = line.as_bytes();
    let mut end = line.len();
    for (i, &b) in bytes.iter().enumerate() {
        let colon = b == b':' && ends_token(&line[i + 1..]);
        let comment = b == b'#' && i > 0 && matches!(bytes[i - 1], b' ' | b'\t');
        if colon || comment {
            end = i;
            break;
        }
    }
    line[..end].trim_end_matches([' ', '\t', '\r']).len()
}
