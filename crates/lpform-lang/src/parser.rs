use lpform_solver::{ConstraintOp, Direction};
use thiserror::Error;

use crate::ast::*;
use crate::lexer::{Span, Token, TokenKind};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("Unexpected token: expected {expected}, found {found} at position {span:?}")]
    UnexpectedToken {
        expected: String,
        found: String,
        span: Span,
    },
    #[error("Unexpected end of file")]
    UnexpectedEof,
    #[error("Invalid number: {0}")]
    InvalidNumber(String),
    #[error("Duplicate {section} section at position {span:?}")]
    DuplicateSection { section: &'static str, span: Span },
}

impl ParseError {
    pub fn span(&self) -> Option<Span> {
        match self {
            ParseError::UnexpectedToken { span, .. } | ParseError::DuplicateSection { span, .. } => {
                Some(*span)
            }
            ParseError::UnexpectedEof | ParseError::InvalidNumber(_) => None,
        }
    }
}

pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, pos: 0 }
    }

    pub fn parse(source: &str) -> Result<Program, ParseError> {
        let tokens = crate::lexer::Lexer::tokenize(source);
        let mut parser = Parser::new(tokens);
        parser.parse_program()
    }

    fn current(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn peek_kind(&self) -> TokenKind {
        self.current().map(|t| t.kind).unwrap_or(TokenKind::Eof)
    }

    fn peek_kind_at(&self, offset: usize) -> TokenKind {
        self.tokens
            .get(self.pos + offset)
            .map(|t| t.kind)
            .unwrap_or(TokenKind::Eof)
    }

    fn advance(&mut self) -> Option<&Token> {
        let token = self.tokens.get(self.pos);
        self.pos += 1;
        token
    }

    fn skip_newlines_and_comments(&mut self) {
        while matches!(self.peek_kind(), TokenKind::Newline | TokenKind::Comment) {
            self.advance();
        }
    }

    fn unexpected(&self, expected: &str) -> ParseError {
        match self.current() {
            Some(t) if t.kind != TokenKind::Eof => ParseError::UnexpectedToken {
                expected: expected.to_string(),
                found: format!("{:?}", t.kind),
                span: t.span,
            },
            _ => ParseError::UnexpectedEof,
        }
    }

    fn expect(&mut self, kind: TokenKind) -> Result<Token, ParseError> {
        self.skip_newlines_and_comments();
        match self.current().cloned() {
            Some(t) if t.kind == kind => {
                self.advance();
                Ok(t)
            }
            _ => Err(self.unexpected(&format!("{:?}", kind))),
        }
    }

    fn last_end(&self, fallback: Span) -> usize {
        self.tokens
            .get(self.pos.saturating_sub(1))
            .map(|t| t.span.end)
            .unwrap_or(fallback.end)
    }

    fn parse_program(&mut self) -> Result<Program, ParseError> {
        let mut program = Program::default();

        loop {
            self.skip_newlines_and_comments();

            let span = self.current().map(|t| t.span).unwrap_or(Span::new(0, 0));
            match self.peek_kind() {
                TokenKind::Eof => break,
                TokenKind::Problem => {
                    if program.heading.is_some() {
                        return Err(ParseError::DuplicateSection { section: "problem", span });
                    }
                    program.heading = Some(self.parse_heading()?);
                }
                TokenKind::Variables => {
                    if program.variables.is_some() {
                        return Err(ParseError::DuplicateSection { section: "variables", span });
                    }
                    program.variables = Some(self.parse_variables()?);
                }
                TokenKind::Maximize | TokenKind::Minimize => {
                    if program.objective.is_some() {
                        return Err(ParseError::DuplicateSection { section: "objective", span });
                    }
                    program.objective = Some(self.parse_objective()?);
                }
                TokenKind::Subject => {
                    if !program.constraints.is_empty() {
                        return Err(ParseError::DuplicateSection { section: "constraints", span });
                    }
                    program.constraints = self.parse_constraints()?;
                }
                _ => {
                    return Err(self.unexpected("problem, variables, maximize, minimize, or subject to"));
                }
            }
        }

        Ok(program)
    }

    fn parse_heading(&mut self) -> Result<Heading, ParseError> {
        let start = self.expect(TokenKind::Problem)?.span;
        let token = self.expect(TokenKind::String)?;
        Ok(Heading {
            span: start.merge(token.span),
            text: unquote(&token.text),
        })
    }

    fn parse_variables(&mut self) -> Result<VariableDecl, ParseError> {
        let start = self.expect(TokenKind::Variables)?.span;
        let mut names = Vec::new();

        loop {
            let token = self.expect(TokenKind::Ident)?;
            names.push(Name {
                span: token.span,
                text: token.text,
            });
            // names continue only after a comma on the same line
            if self.peek_kind() == TokenKind::Comma {
                self.advance();
            } else {
                break;
            }
        }

        Ok(VariableDecl {
            span: Span::new(start.start, self.last_end(start)),
            names,
        })
    }

    fn parse_objective(&mut self) -> Result<ObjectiveDecl, ParseError> {
        self.skip_newlines_and_comments();
        let token = self.advance().cloned().ok_or(ParseError::UnexpectedEof)?;
        let direction = match token.kind {
            TokenKind::Maximize => Direction::Maximize,
            _ => Direction::Minimize,
        };
        let expr = self.parse_linear_expr()?;

        Ok(ObjectiveDecl {
            span: Span::new(token.span.start, self.last_end(token.span)),
            direction,
            expr,
        })
    }

    fn parse_constraints(&mut self) -> Result<Vec<ConstraintDecl>, ParseError> {
        let subject = self.expect(TokenKind::Subject)?;
        if subject.text == "subject" {
            let to = self.expect(TokenKind::Ident)?;
            if to.text != "to" {
                return Err(ParseError::UnexpectedToken {
                    expected: "to".to_string(),
                    found: to.text,
                    span: to.span,
                });
            }
        }
        self.expect(TokenKind::LBrace)?;

        let mut constraints = Vec::new();
        loop {
            self.skip_newlines_and_comments();
            match self.peek_kind() {
                TokenKind::RBrace => break,
                TokenKind::Comma => {
                    self.advance();
                }
                _ => constraints.push(self.parse_constraint()?),
            }
        }
        self.expect(TokenKind::RBrace)?;

        Ok(constraints)
    }

    fn parse_constraint(&mut self) -> Result<ConstraintDecl, ParseError> {
        self.skip_newlines_and_comments();
        let start = self.current().map(|t| t.span).ok_or(ParseError::UnexpectedEof)?;

        // Optional label: `name:` or `"quoted name":`
        let mut name = None;
        if matches!(self.peek_kind(), TokenKind::Ident | TokenKind::String)
            && self.peek_kind_at(1) == TokenKind::Colon
        {
            let token = self.advance().cloned().ok_or(ParseError::UnexpectedEof)?;
            name = Some(match token.kind {
                TokenKind::String => unquote(&token.text),
                _ => token.text,
            });
            self.advance(); // :
        }

        let expr = self.parse_linear_expr()?;

        self.skip_newlines_and_comments();
        let op = match self.peek_kind() {
            TokenKind::Le => ConstraintOp::Le,
            TokenKind::Ge => ConstraintOp::Ge,
            TokenKind::Eq => ConstraintOp::Eq,
            _ => return Err(self.unexpected("<=, = or >=")),
        };
        self.advance();

        let rhs = self.parse_signed_number()?;

        Ok(ConstraintDecl {
            span: Span::new(start.start, self.last_end(start)),
            name,
            expr,
            op,
            rhs,
        })
    }

    fn parse_linear_expr(&mut self) -> Result<LinearExpr, ParseError> {
        self.skip_newlines_and_comments();
        let mut sign = match self.peek_kind() {
            TokenKind::Minus => {
                self.advance();
                -1.0
            }
            TokenKind::Plus => {
                self.advance();
                1.0
            }
            _ => 1.0,
        };

        let mut terms = Vec::new();
        loop {
            terms.push(self.parse_term(sign)?);

            self.skip_newlines_and_comments();
            sign = match self.peek_kind() {
                TokenKind::Plus => 1.0,
                TokenKind::Minus => -1.0,
                _ => break,
            };
            self.advance();
        }

        Ok(LinearExpr { terms })
    }

    /// `3 x`, `3x`, `3 * x`, `x` or a bare `3`
    fn parse_term(&mut self, sign: f64) -> Result<Term, ParseError> {
        self.skip_newlines_and_comments();
        match self.peek_kind() {
            TokenKind::Number => {
                let token = self.advance().cloned().ok_or(ParseError::UnexpectedEof)?;
                let coefficient = sign * parse_number(&token.text)?;

                // implicit multiplication only on the same line
                let variable = match self.peek_kind() {
                    TokenKind::Star => {
                        self.advance();
                        Some(self.expect(TokenKind::Ident)?)
                    }
                    TokenKind::Ident => self.advance().cloned(),
                    _ => None,
                };

                let end = variable.as_ref().map_or(token.span, |v| v.span);
                Ok(Term {
                    span: token.span.merge(end),
                    coefficient,
                    variable: variable.map(|v| v.text),
                })
            }
            TokenKind::Ident => {
                let token = self.advance().cloned().ok_or(ParseError::UnexpectedEof)?;
                Ok(Term {
                    span: token.span,
                    coefficient: sign,
                    variable: Some(token.text),
                })
            }
            _ => Err(self.unexpected("term")),
        }
    }

    fn parse_signed_number(&mut self) -> Result<f64, ParseError> {
        self.skip_newlines_and_comments();
        let sign = match self.peek_kind() {
            TokenKind::Minus => {
                self.advance();
                -1.0
            }
            TokenKind::Plus => {
                self.advance();
                1.0
            }
            _ => 1.0,
        };
        let token = self.expect(TokenKind::Number)?;
        Ok(sign * parse_number(&token.text)?)
    }
}

fn parse_number(text: &str) -> Result<f64, ParseError> {
    text.parse()
        .map_err(|_| ParseError::InvalidNumber(text.to_string()))
}

fn unquote(text: &str) -> String {
    text.trim_start_matches('"').trim_end_matches('"').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PRODUCTION: &str = r#"
        // Two products sharing one machine
        problem "Production Plan"
        variables chairs, tables

        maximize 3 chairs + 2tables

        subject to {
            capacity: chairs + tables <= 4
            "labor hours": 2 * chairs + tables ≤ 6
            chairs - tables >= -2
        }
    "#;

    #[test]
    fn test_parse_program() {
        let program = Parser::parse(PRODUCTION).unwrap();

        assert_eq!(program.heading.unwrap().text, "Production Plan");
        let names: Vec<_> = program
            .variables
            .unwrap()
            .names
            .into_iter()
            .map(|n| n.text)
            .collect();
        assert_eq!(names, vec!["chairs", "tables"]);

        let objective = program.objective.unwrap();
        assert_eq!(objective.direction, Direction::Maximize);
        assert_eq!(objective.expr.terms.len(), 2);
        assert_eq!(objective.expr.terms[1].coefficient, 2.0);
        assert_eq!(objective.expr.terms[1].variable.as_deref(), Some("tables"));

        assert_eq!(program.constraints.len(), 3);
        assert_eq!(program.constraints[0].name.as_deref(), Some("capacity"));
        assert_eq!(program.constraints[1].name.as_deref(), Some("labor hours"));
        assert_eq!(program.constraints[1].op, ConstraintOp::Le);
        assert_eq!(program.constraints[2].name, None);
        assert_eq!(program.constraints[2].op, ConstraintOp::Ge);
        assert_eq!(program.constraints[2].rhs, -2.0);
        assert_eq!(program.constraints[2].expr.terms[1].coefficient, -1.0);
    }

    #[test]
    fn test_leading_minus_and_constant() {
        let program = Parser::parse("variables x\nminimize -0.5 x + 3").unwrap();
        let terms = program.objective.unwrap().expr.terms;
        assert_eq!(terms[0].coefficient, -0.5);
        assert_eq!(terms[1].coefficient, 3.0);
        assert_eq!(terms[1].variable, None);
    }

    #[test]
    fn test_st_alias_and_commas() {
        let program = Parser::parse("vars a, b\nmax a\nst { a <= 1, b = 2 }").unwrap();
        assert_eq!(program.constraints.len(), 2);
        assert_eq!(program.constraints[1].op, ConstraintOp::Eq);
    }

    #[test]
    fn test_missing_operator() {
        let err = Parser::parse("vars a\nmax a\nsubject to { a 4 }").unwrap_err();
        match err {
            ParseError::UnexpectedToken { expected, .. } => assert_eq!(expected, "<=, = or >="),
            other => panic!("Expected unexpected token, got {:?}", other),
        }
    }

    #[test]
    fn test_subject_requires_to() {
        let err = Parser::parse("vars a\nmax a\nsubject at { a <= 4 }").unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedToken { ref found, .. } if found == "at"));
    }

    #[test]
    fn test_duplicate_objective() {
        let err = Parser::parse("vars a\nmax a\nmin a").unwrap_err();
        assert!(matches!(
            err,
            ParseError::DuplicateSection { section: "objective", .. }
        ));
    }

    #[test]
    fn test_unterminated_block() {
        let err = Parser::parse("vars a\nmax a\nst { a <= 1").unwrap_err();
        assert_eq!(err, ParseError::UnexpectedEof);
    }

    #[test]
    fn test_error_span() {
        let source = "vars a\nmax a ?";
        let err = Parser::parse(source).unwrap_err();
        let span = err.span().unwrap();
        assert_eq!(&source[span.start..span.end], "?");
    }
}
