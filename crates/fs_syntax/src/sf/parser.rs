//! Recursive-descent parser for the spirit-filter grammar. Statement
//! boundaries are found by keyword lookahead (the language has no statement
//! terminator token) rather than by tracking newlines, matching how the
//! game's own filter grammar is structured.

use super::ast::*;
use crate::keywords::is_statement_boundary;
use crate::lexer::Lexer;
use crate::token::{Operator, Token, TokenKind};
use fs_base::{Result, Span, SpannedError};

pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

pub fn parse_document(source: &str) -> Result<Document> {
    let tokens = Lexer::new(source).tokenize()?;
    Parser { tokens, pos: 0 }.parse_document()
}

impl Parser {
    fn peek(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn advance(&mut self) -> Token {
        let tok = self.peek().clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        tok
    }

    fn at_eof(&self) -> bool {
        matches!(self.peek().kind, TokenKind::Eof)
    }

    fn error(&self, message: impl Into<String>) -> SpannedError {
        SpannedError::new(message, self.peek().origin)
    }

    fn expect_identifier(&mut self) -> Result<(String, Span)> {
        match self.advance() {
            Token { kind: TokenKind::Identifier(word), origin } => Ok((word, origin)),
            other => Err(SpannedError::new(format!("expected an identifier, found {:?}", other.kind), other.origin)),
        }
    }

    fn peek_identifier(&self) -> Option<&str> {
        match &self.peek().kind {
            TokenKind::Identifier(word) => Some(word.as_str()),
            _ => None,
        }
    }

    fn parse_document(&mut self) -> Result<Document> {
        let mut items = Vec::new();
        while !self.at_eof() {
            items.push(self.parse_top_level()?);
        }
        Ok(Document { items })
    }

    fn parse_top_level(&mut self) -> Result<TopLevel> {
        match &self.peek().kind {
            TokenKind::Dollar(_) => Ok(TopLevel::ConstantDef(self.parse_constant_def()?)),
            TokenKind::Identifier(word) if word == "Show" || word == "Hide" || word == "Minimal" => Ok(TopLevel::Block(self.parse_block()?)),
            TokenKind::Identifier(word) if word == "Import" => Ok(TopLevel::Import(self.parse_import()?)),
            _ => Err(self.error("expected a constant definition, an import statement, or a Show/Hide/Minimal block")),
        }
    }

    /// `$name = <sequence>` or `$name = { block tree }`. A sequence is one
    /// or more values, spliced wherever `$name` is later referenced; a tree
    /// is a sequence of statements, spliced wherever `Expand $name` appears.
    fn parse_constant_def(&mut self) -> Result<ConstantDef> {
        let start = self.peek().origin;
        let (name, name_origin) = match self.advance() {
            Token { kind: TokenKind::Dollar(name), origin } => (name, origin),
            other => return Err(SpannedError::new("expected '$name'", other.origin)),
        };
        match self.advance() {
            Token { kind: TokenKind::Operator(Operator::Equal), .. } => {}
            other => return Err(SpannedError::new("expected '=' after constant name", other.origin)),
        }
        let (value, end) = if matches!(self.peek().kind, TokenKind::LBrace) {
            let (tree, tree_span) = self.parse_constant_tree()?;
            (ConstantValue::Tree(tree), tree_span)
        } else {
            let sequence = self.parse_constant_sequence()?;
            let seq_end = sequence.last().map(|e| e.origin()).unwrap_or(name_origin);
            (ConstantValue::Sequence(sequence), seq_end)
        };
        let origin = start.merge(end);
        Ok(ConstantDef { name, name_origin, value, origin })
    }

    /// Consumes one expression, then more until a statement-starting
    /// keyword, `$name` (the next definition), or end of input.
    fn parse_constant_sequence(&mut self) -> Result<Vec<Expr>> {
        let mut values = vec![self.parse_expr()?];
        loop {
            match &self.peek().kind {
                TokenKind::Eof | TokenKind::Dollar(_) => break,
                TokenKind::Identifier(word) if is_statement_boundary(word) => break,
                _ => values.push(self.parse_expr()?),
            }
        }
        Ok(values)
    }

    /// A block tree is deliberately narrower than a real block: it may hold
    /// conditions, actions, `Autogenerate`, nested `Expand`, and `Import`,
    /// but never its own `Show`/`Hide`/`Minimal` visibility — it only ever
    /// becomes part of one when spliced in by `Expand`.
    fn parse_constant_tree(&mut self) -> Result<(Vec<Statement>, Span)> {
        let open = match self.advance() {
            Token { kind: TokenKind::LBrace, origin } => origin,
            other => return Err(SpannedError::new("expected '{' to open a block tree", other.origin)),
        };
        let mut statements = Vec::new();
        loop {
            match &self.peek().kind {
                TokenKind::RBrace => break,
                TokenKind::Eof => return Err(self.error("unterminated block tree, expected '}'")),
                TokenKind::Identifier(word) if word == "Show" || word == "Hide" || word == "Minimal" => {
                    return Err(self.error("a block tree may not contain a visibility block; Expand splices it into one"));
                }
                TokenKind::Identifier(word) if word == "Autogenerate" => {
                    statements.push(Statement::Autogenerate(self.parse_autogenerate()?));
                }
                TokenKind::Identifier(word) if word == "Expand" => {
                    statements.push(Statement::Expand(self.parse_expand()?));
                }
                TokenKind::Identifier(word) if word == "Import" => {
                    statements.push(Statement::Import(self.parse_import()?));
                }
                TokenKind::Identifier(_) => {
                    statements.push(self.parse_statement()?);
                }
                other => return Err(SpannedError::new(format!("unexpected token {:?} in block tree", other), self.peek().origin)),
            }
        }
        let close = self.peek().origin;
        self.advance(); // consume '}'
        Ok((statements, open.merge(close)))
    }

    fn parse_expand(&mut self) -> Result<ExpandStmt> {
        let start = self.peek().origin;
        self.advance(); // "Expand"
        let (name, name_origin) = match self.advance() {
            Token { kind: TokenKind::Dollar(name), origin } => (name, origin),
            other => return Err(SpannedError::new("expected '$name' after 'Expand'", other.origin)),
        };
        Ok(ExpandStmt { name, name_origin, origin: start.merge(name_origin) })
    }

    fn parse_import(&mut self) -> Result<ImportStmt> {
        let start = self.peek().origin;
        self.advance(); // "Import"
        let (path, path_origin) = match self.advance() {
            Token { kind: TokenKind::String(path), origin } => (path, origin),
            other => return Err(SpannedError::new("expected a quoted path after 'Import'", other.origin)),
        };
        Ok(ImportStmt { path, path_origin, origin: start.merge(path_origin) })
    }

    fn parse_block(&mut self) -> Result<Block> {
        let (word, visibility_origin) = self.expect_identifier()?;
        let visibility = match word.as_str() {
            "Show" => RawVisibility::Show,
            "Hide" => RawVisibility::Hide,
            "Minimal" => RawVisibility::Minimal,
            _ => return Err(SpannedError::new("expected 'Show', 'Hide', or 'Minimal'", visibility_origin)),
        };
        match self.advance() {
            Token { kind: TokenKind::LBrace, .. } => {}
            other => return Err(SpannedError::new("expected '{' to open the block", other.origin)),
        }

        let mut statements = Vec::new();
        let mut nested = Vec::new();
        let mut continue_ = false;
        loop {
            match &self.peek().kind {
                TokenKind::RBrace => break,
                TokenKind::Eof => return Err(self.error("unterminated block, expected '}'")),
                TokenKind::Identifier(word) if word == "Show" || word == "Hide" || word == "Minimal" => {
                    nested.push(self.parse_block()?);
                }
                TokenKind::Identifier(word) if word == "Continue" => {
                    self.advance();
                    continue_ = true;
                }
                TokenKind::Identifier(word) if word == "Autogenerate" => {
                    statements.push(Statement::Autogenerate(self.parse_autogenerate()?));
                }
                TokenKind::Identifier(word) if word == "Expand" => {
                    statements.push(Statement::Expand(self.parse_expand()?));
                }
                TokenKind::Identifier(word) if word == "Import" => {
                    statements.push(Statement::Import(self.parse_import()?));
                }
                TokenKind::Identifier(_) => {
                    statements.push(self.parse_statement()?);
                }
                other => return Err(SpannedError::new(format!("unexpected token {:?} in block body", other), self.peek().origin)),
            }
        }
        let end_origin = self.peek().origin;
        self.advance(); // consume '}'
        Ok(Block {
            visibility,
            visibility_origin,
            continue_,
            statements,
            nested,
            origin: visibility_origin.merge(end_origin),
        })
    }

    fn parse_statement(&mut self) -> Result<Statement> {
        let (keyword, keyword_origin) = self.expect_identifier()?;
        let op = self.try_parse_operator();
        let operands = self.parse_operand_list()?;
        let origin = operands
            .last()
            .map(|e| keyword_origin.merge(e.origin()))
            .unwrap_or(keyword_origin);

        if crate::keywords::is_action_keyword(&keyword) {
            Ok(Statement::Action(ActionStmt { keyword, keyword_origin, operands, origin }))
        } else {
            Ok(Statement::Condition(ConditionStmt { keyword, keyword_origin, op, operands, origin }))
        }
    }

    fn try_parse_operator(&mut self) -> Option<Operator> {
        if let TokenKind::Operator(op) = self.peek().kind {
            self.advance();
            Some(op)
        } else {
            None
        }
    }

    /// Consumes expressions until the next statement-starting keyword, a
    /// closing brace, or end of input.
    fn parse_operand_list(&mut self) -> Result<Vec<Expr>> {
        let mut operands = Vec::new();
        loop {
            match &self.peek().kind {
                TokenKind::RBrace | TokenKind::Eof => break,
                TokenKind::Identifier(word) if is_statement_boundary(word) => break,
                _ => operands.push(self.parse_expr()?),
            }
        }
        Ok(operands)
    }

    fn parse_expr(&mut self) -> Result<Expr> {
        match self.advance() {
            Token { kind: TokenKind::Integer(v), origin } => Ok(Expr::Integer(v, origin)),
            Token { kind: TokenKind::Fractional(v), origin } => Ok(Expr::Fractional(v, origin)),
            Token { kind: TokenKind::String(v), origin } => Ok(Expr::String(v, origin)),
            Token { kind: TokenKind::Identifier(v), origin } => Ok(Expr::Identifier(v, origin)),
            Token { kind: TokenKind::Dollar(v), origin } => Ok(Expr::Reference(v, origin)),
            other => Err(SpannedError::new(format!("expected a value, found {:?}", other.kind), other.origin)),
        }
    }

    fn parse_autogenerate(&mut self) -> Result<AutogenerateStmt> {
        let start = self.peek().origin;
        self.advance(); // "Autogenerate"
        let (category, category_origin) = self.expect_identifier()?;
        let price = self.parse_price_range()?;
        let origin = start.merge(price.origin);
        Ok(AutogenerateStmt { category, category_origin, price, origin })
    }

    /// `Price($lower .. $upper)`, either bound optional, written with a
    /// literal `..` spelled as two consecutive dots — tokenized here as two
    /// `Colon`-adjacent checks would be wrong, so this grammar spells the
    /// range with parentheses and a comma instead: `Price($lower, $upper)`.
    fn parse_price_range(&mut self) -> Result<PriceRangeExpr> {
        let (word, word_origin) = self.expect_identifier()?;
        if word != "Price" {
            return Err(SpannedError::new("expected 'Price(...)' after the autogeneration category", word_origin));
        }
        match self.advance() {
            Token { kind: TokenKind::LParen, .. } => {}
            other => return Err(SpannedError::new("expected '(' after 'Price'", other.origin)),
        }
        let lower = self.parse_optional_bound()?;
        match self.advance() {
            Token { kind: TokenKind::Comma, .. } => {}
            other => return Err(SpannedError::new("expected ',' between price bounds", other.origin)),
        }
        let upper = self.parse_optional_bound()?;
        let end = match self.advance() {
            Token { kind: TokenKind::RParen, origin } => origin,
            other => return Err(SpannedError::new("expected ')' to close the price range", other.origin)),
        };
        Ok(PriceRangeExpr { lower, upper, origin: word_origin.merge(end) })
    }

    /// A bound is an expression, optionally followed by `Inclusive`, or the
    /// bare word `None` for an unbounded side.
    fn parse_optional_bound(&mut self) -> Result<Option<(Expr, bool)>> {
        if let Some("None") = self.peek_identifier() {
            self.advance();
            return Ok(None);
        }
        let value = self.parse_expr()?;
        let inclusive = if let Some("Inclusive") = self.peek_identifier() {
            self.advance();
            true
        } else {
            false
        };
        Ok(Some((value, inclusive)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_minimal_block() {
        let doc = parse_document(
            r#"
            Show {
                BaseType == "Chaos Orb"
                SetFontSize 45
            }
            "#,
        )
        .unwrap();
        assert_eq!(doc.items.len(), 1);
        let TopLevel::Block(block) = &doc.items[0] else { panic!("expected a block") };
        assert_eq!(block.visibility, RawVisibility::Show);
        assert_eq!(block.statements.len(), 2);
    }

    #[test]
    fn parses_constant_definitions() {
        let doc = parse_document("$price = 5\nShow { ItemLevel >= 80 }").unwrap();
        let TopLevel::ConstantDef(def) = &doc.items[0] else { panic!("expected a constant") };
        assert_eq!(def.name, "price");
        let ConstantValue::Sequence(values) = &def.value else { panic!("expected a sequence") };
        assert_eq!(values.as_slice(), [Expr::Integer(5, values[0].origin())]);
    }

    #[test]
    fn parses_a_multi_value_constant_sequence() {
        let doc = parse_document("$col = 100 200 50\nShow { SetTextColor $col }").unwrap();
        let TopLevel::ConstantDef(def) = &doc.items[0] else { panic!("expected a constant") };
        let ConstantValue::Sequence(values) = &def.value else { panic!("expected a sequence") };
        assert_eq!(values.len(), 3);
    }

    #[test]
    fn parses_a_block_tree_constant() {
        let doc = parse_document(
            r#"
            $shared = {
                ItemLevel >= 80
                SetFontSize 45
            }
            Show {
                Expand $shared
            }
            "#,
        )
        .unwrap();
        let TopLevel::ConstantDef(def) = &doc.items[0] else { panic!("expected a constant") };
        let ConstantValue::Tree(statements) = &def.value else { panic!("expected a block tree") };
        assert_eq!(statements.len(), 2);
        let TopLevel::Block(block) = &doc.items[1] else { panic!("expected a block") };
        match &block.statements[0] {
            Statement::Expand(stmt) => assert_eq!(stmt.name, "shared"),
            other => panic!("expected Expand, got {other:?}"),
        }
    }

    #[test]
    fn parses_import_statement() {
        let doc = parse_document(r#"Show { Import "shared.filter" ItemLevel >= 1 }"#).unwrap();
        let TopLevel::Block(block) = &doc.items[0] else { panic!() };
        match &block.statements[0] {
            Statement::Import(stmt) => assert_eq!(stmt.path, "shared.filter"),
            other => panic!("expected Import, got {other:?}"),
        }
    }

    #[test]
    fn parses_a_top_level_import_statement() {
        let doc = parse_document(r#"Import "shared.filter" Show { ItemLevel >= 1 }"#).unwrap();
        match &doc.items[0] {
            TopLevel::Import(stmt) => assert_eq!(stmt.path, "shared.filter"),
            other => panic!("expected a top-level Import, got {other:?}"),
        }
        let TopLevel::Block(_) = &doc.items[1] else { panic!("expected a block") };
    }

    #[test]
    fn block_tree_rejects_a_nested_visibility_block() {
        let err = parse_document("$bad = { Show { ItemLevel >= 1 } }\nShow { Expand $bad }");
        assert!(err.is_err());
    }

    #[test]
    fn parses_nested_blocks() {
        let doc = parse_document(
            r#"
            Show {
                Rarity == Rare
                Show {
                    ItemLevel >= 80
                }
            }
            "#,
        )
        .unwrap();
        let TopLevel::Block(outer) = &doc.items[0] else { panic!() };
        assert_eq!(outer.nested.len(), 1);
        assert_eq!(outer.statements.len(), 1);
    }

    #[test]
    fn parses_continue_keyword() {
        let doc = parse_document("Show { Continue \n ItemLevel >= 1 }").unwrap();
        let TopLevel::Block(block) = &doc.items[0] else { panic!() };
        assert!(block.continue_);
    }

    #[test]
    fn parses_autogenerate_with_price_range() {
        let doc = parse_document(
            r#"
            Show {
                Autogenerate StackableCurrency Price(5, 300)
            }
            "#,
        )
        .unwrap();
        let TopLevel::Block(block) = &doc.items[0] else { panic!() };
        assert_eq!(block.statements.len(), 1);
        match &block.statements[0] {
            Statement::Autogenerate(stmt) => {
                assert_eq!(stmt.category, "StackableCurrency");
                assert!(stmt.price.lower.is_some());
            }
            other => panic!("expected Autogenerate, got {other:?}"),
        }
    }

    #[test]
    fn rejects_unterminated_block() {
        assert!(parse_document("Show { ItemLevel >= 1").is_err());
    }
}
