//! Parser for the real-filter text format. Unlike SF, block membership is
//! indentation-based (one statement per physical line) rather than
//! brace-delimited, matching the format the game client itself writes and
//! reads.

use super::ast::{Block, Document, RawVisibility};
use crate::keywords::is_action_keyword;
use crate::lexer::Lexer;
use crate::sf::ast::{ActionStmt, ConditionStmt, Expr, Statement};
use crate::token::{Token, TokenKind};
use fs_base::{Result, Span, SpannedError};

pub fn parse_document(source: &str) -> Result<Document> {
    let mut blocks = Vec::new();
    let mut current: Option<Block> = None;
    let mut offset = 0usize;

    for raw_line in source.split_inclusive('\n') {
        let line_start = offset;
        offset += raw_line.len();
        let line = raw_line.trim_end_matches(['\n', '\r']);
        let indent = line.len() - line.trim_start().len();
        let content_start = line_start + indent;
        let content = strip_comment(line.trim_start());
        let trimmed = content.trim_end();
        if trimmed.is_empty() {
            continue;
        }

        if indent == 0 {
            if let Some(block) = current.take() {
                blocks.push(block);
            }
            current = Some(parse_block_header(trimmed, content_start)?);
        } else {
            let block = current
                .as_mut()
                .ok_or_else(|| SpannedError::new("indented line appears before any Show/Hide block", Span::point(content_start)))?;
            parse_statement_line(trimmed, content_start, block)?;
        }
    }
    if let Some(block) = current.take() {
        blocks.push(block);
    }
    Ok(Document { blocks })
}

/// Strips a `#`-to-end-of-line comment, respecting double-quoted strings so
/// a base type name can never accidentally contain one.
fn strip_comment(line: &str) -> &str {
    let mut in_string = false;
    let mut escaped = false;
    for (idx, ch) in line.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match ch {
            '\\' if in_string => escaped = true,
            '"' => in_string = !in_string,
            '#' if !in_string => return &line[..idx],
            _ => {}
        }
    }
    line
}

fn line_tokens(text: &str, base_offset: usize) -> Result<Vec<Token>> {
    let tokens = Lexer::new(text).tokenize()?;
    Ok(tokens
        .into_iter()
        .map(|t| Token::new(t.kind, Span::new(t.origin.start + base_offset, t.origin.end + base_offset)))
        .collect())
}

fn parse_block_header(text: &str, base_offset: usize) -> Result<Block> {
    let tokens = line_tokens(text, base_offset)?;
    let (word, origin) = match tokens.first() {
        Some(Token { kind: TokenKind::Identifier(w), origin }) => (w.clone(), *origin),
        _ => return Err(SpannedError::new("expected 'Show', 'Hide', or 'Minimal'", Span::point(base_offset))),
    };
    let visibility = match word.as_str() {
        "Show" => RawVisibility::Show,
        "Hide" => RawVisibility::Hide,
        "Minimal" => RawVisibility::Minimal,
        _ => return Err(SpannedError::new("expected 'Show', 'Hide', or 'Minimal'", origin)),
    };
    if tokens.len() > 2 {
        return Err(SpannedError::new("unexpected tokens after block visibility", tokens[1].origin));
    }
    Ok(Block {
        visibility,
        visibility_origin: origin,
        continue_: false,
        statements: Vec::new(),
        origin,
    })
}

fn parse_statement_line(text: &str, base_offset: usize, block: &mut Block) -> Result<()> {
    let tokens = line_tokens(text, base_offset)?;
    let mut iter = tokens.into_iter().filter(|t| t.kind != TokenKind::Eof);
    let first = iter
        .next()
        .ok_or_else(|| SpannedError::new("empty statement line", Span::point(base_offset)))?;
    let (keyword, keyword_origin) = match first.kind {
        TokenKind::Identifier(word) => (word, first.origin),
        other => return Err(SpannedError::new(format!("expected a keyword, found {other:?}"), first.origin)),
    };

    if keyword == "Continue" {
        block.continue_ = true;
        return Ok(());
    }

    let mut op = None;
    let mut rest: Vec<Token> = iter.collect();
    if let Some(Token { kind: TokenKind::Operator(o), .. }) = rest.first() {
        op = Some(*o);
        rest.remove(0);
    }

    let mut operands = Vec::with_capacity(rest.len());
    for tok in rest {
        operands.push(token_to_expr(tok)?);
    }
    let origin = operands
        .last()
        .map(|e: &Expr| keyword_origin.merge(e.origin()))
        .unwrap_or(keyword_origin);

    let statement = if is_action_keyword(&keyword) {
        Statement::Action(ActionStmt { keyword, keyword_origin, operands, origin })
    } else {
        Statement::Condition(ConditionStmt { keyword, keyword_origin, op, operands, origin })
    };
    block.statements.push(statement);
    Ok(())
}

fn token_to_expr(tok: Token) -> Result<Expr> {
    match tok.kind {
        TokenKind::Integer(v) => Ok(Expr::Integer(v, tok.origin)),
        TokenKind::Fractional(v) => Ok(Expr::Fractional(v, tok.origin)),
        TokenKind::String(v) => Ok(Expr::String(v, tok.origin)),
        TokenKind::Identifier(v) => Ok(Expr::Identifier(v, tok.origin)),
        other => Err(SpannedError::new(format!("unexpected token {other:?} in operand position"), tok.origin)),
    }
}
