//! Environment marker expressions (PEP 508)
//!
//! Markers are parsed into a small expression tree so that conjunction and
//! parenthesization are structural properties rather than string splicing,
//! and re-rendered with canonical spacing and quoting.

use std::fmt;

use crate::error::ParseError;

/// Comparison operator inside a marker atom
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Ne,
    Le,
    Ge,
    Lt,
    Gt,
    Compatible,
    ArbitraryEq,
    In,
    NotIn,
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CompareOp::Eq => "==",
            CompareOp::Ne => "!=",
            CompareOp::Le => "<=",
            CompareOp::Ge => ">=",
            CompareOp::Lt => "<",
            CompareOp::Gt => ">",
            CompareOp::Compatible => "~=",
            CompareOp::ArbitraryEq => "===",
            CompareOp::In => "in",
            CompareOp::NotIn => "not in",
        };
        f.write_str(s)
    }
}

/// One side of a marker comparison
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkerValue {
    /// Environment variable, e.g. `sys_platform`
    Variable(String),
    /// Quoted string literal
    Literal(String),
}

impl fmt::Display for MarkerValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarkerValue::Variable(name) => f.write_str(name),
            // Literals render double-quoted; fall back to single quotes
            // when the text itself contains a double quote.
            MarkerValue::Literal(text) => {
                if text.contains('"') {
                    write!(f, "'{}'", text)
                } else {
                    write!(f, "\"{}\"", text)
                }
            }
        }
    }
}

/// Marker expression tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkerExpr {
    Atom {
        lhs: MarkerValue,
        op: CompareOp,
        rhs: MarkerValue,
    },
    And(Vec<MarkerExpr>),
    Or(Vec<MarkerExpr>),
}

impl MarkerExpr {
    /// Parse a marker expression from text
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        let err = |reason: &str| ParseError::InvalidMarker {
            marker: input.to_string(),
            reason: reason.to_string(),
        };

        let tokens = tokenize(input).map_err(|reason| err(&reason))?;
        if tokens.is_empty() {
            return Err(err("empty marker"));
        }

        let mut parser = Parser { tokens, pos: 0 };
        let expr = parser.parse_or().map_err(|reason| err(&reason))?;
        if parser.pos != parser.tokens.len() {
            return Err(err("trailing tokens after expression"));
        }
        Ok(expr)
    }

    /// The atom `extra == "<name>"`
    pub fn extra_equals(name: &str) -> Self {
        MarkerExpr::Atom {
            lhs: MarkerValue::Variable("extra".to_string()),
            op: CompareOp::Eq,
            rhs: MarkerValue::Literal(name.to_string()),
        }
    }

    /// Conjoin two markers, flattening nested conjunctions
    pub fn and(self, other: MarkerExpr) -> Self {
        let mut children = match self {
            MarkerExpr::And(children) => children,
            expr => vec![expr],
        };
        match other {
            MarkerExpr::And(more) => children.extend(more),
            expr => children.push(expr),
        }
        MarkerExpr::And(children)
    }
}

impl fmt::Display for MarkerExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarkerExpr::Atom { lhs, op, rhs } => write!(f, "{} {} {}", lhs, op, rhs),
            MarkerExpr::And(children) => {
                for (i, child) in children.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" and ")?;
                    }
                    // `and` binds tighter than `or`, so a disjunction must
                    // keep its parentheses inside a conjunction.
                    if matches!(child, MarkerExpr::Or(_)) {
                        write!(f, "({})", child)?;
                    } else {
                        write!(f, "{}", child)?;
                    }
                }
                Ok(())
            }
            MarkerExpr::Or(children) => {
                for (i, child) in children.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" or ")?;
                    }
                    write!(f, "{}", child)?;
                }
                Ok(())
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    LParen,
    RParen,
    Op(CompareOp),
    Ident(String),
    Str(String),
}

fn tokenize(input: &str) -> Result<Vec<Token>, String> {
    let mut tokens = Vec::new();
    let mut chars = input.char_indices().peekable();

    while let Some(&(pos, c)) = chars.peek() {
        match c {
            c if c.is_whitespace() => {
                chars.next();
            }
            '(' => {
                chars.next();
                tokens.push(Token::LParen);
            }
            ')' => {
                chars.next();
                tokens.push(Token::RParen);
            }
            '"' | '\'' => {
                chars.next();
                let quote = c;
                let start = pos + 1;
                let mut end = None;
                for (i, c) in chars.by_ref() {
                    if c == quote {
                        end = Some(i);
                        break;
                    }
                }
                let end = end.ok_or("unterminated string literal")?;
                tokens.push(Token::Str(input[start..end].to_string()));
            }
            '=' => {
                chars.next();
                if chars.next_if(|&(_, c)| c == '=').is_none() {
                    return Err("expected '==' or '==='".to_string());
                }
                if chars.next_if(|&(_, c)| c == '=').is_some() {
                    tokens.push(Token::Op(CompareOp::ArbitraryEq));
                } else {
                    tokens.push(Token::Op(CompareOp::Eq));
                }
            }
            '!' => {
                chars.next();
                if chars.next_if(|&(_, c)| c == '=').is_none() {
                    return Err("expected '!='".to_string());
                }
                tokens.push(Token::Op(CompareOp::Ne));
            }
            '~' => {
                chars.next();
                if chars.next_if(|&(_, c)| c == '=').is_none() {
                    return Err("expected '~='".to_string());
                }
                tokens.push(Token::Op(CompareOp::Compatible));
            }
            '<' => {
                chars.next();
                if chars.next_if(|&(_, c)| c == '=').is_some() {
                    tokens.push(Token::Op(CompareOp::Le));
                } else {
                    tokens.push(Token::Op(CompareOp::Lt));
                }
            }
            '>' => {
                chars.next();
                if chars.next_if(|&(_, c)| c == '=').is_some() {
                    tokens.push(Token::Op(CompareOp::Ge));
                } else {
                    tokens.push(Token::Op(CompareOp::Gt));
                }
            }
            c if c.is_ascii_alphanumeric() || c == '_' => {
                let start = pos;
                let mut end = input.len();
                while let Some(&(i, c)) = chars.peek() {
                    if c.is_ascii_alphanumeric() || c == '_' || c == '.' || c == '-' {
                        chars.next();
                    } else {
                        end = i;
                        break;
                    }
                }
                tokens.push(Token::Ident(input[start..end].to_string()));
            }
            c => return Err(format!("unexpected character {:?}", c)),
        }
    }

    Ok(tokens)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn eat_keyword(&mut self, keyword: &str) -> bool {
        if matches!(self.peek(), Some(Token::Ident(word)) if word == keyword) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn parse_or(&mut self) -> Result<MarkerExpr, String> {
        let mut children = vec![self.parse_and()?];
        while self.eat_keyword("or") {
            children.push(self.parse_and()?);
        }
        if children.len() == 1 {
            Ok(children.pop().unwrap())
        } else {
            Ok(MarkerExpr::Or(children))
        }
    }

    fn parse_and(&mut self) -> Result<MarkerExpr, String> {
        let mut children = vec![self.parse_primary()?];
        while self.eat_keyword("and") {
            children.push(self.parse_primary()?);
        }
        if children.len() == 1 {
            Ok(children.pop().unwrap())
        } else {
            Ok(MarkerExpr::And(children))
        }
    }

    fn parse_primary(&mut self) -> Result<MarkerExpr, String> {
        if matches!(self.peek(), Some(Token::LParen)) {
            self.pos += 1;
            let expr = self.parse_or()?;
            match self.next() {
                Some(Token::RParen) => return Ok(expr),
                _ => return Err("expected ')'".to_string()),
            }
        }

        let lhs = self.parse_value()?;
        let op = self.parse_op()?;
        let rhs = self.parse_value()?;
        Ok(MarkerExpr::Atom { lhs, op, rhs })
    }

    fn parse_value(&mut self) -> Result<MarkerValue, String> {
        match self.next() {
            Some(Token::Ident(name)) => {
                if name == "and" || name == "or" || name == "in" || name == "not" {
                    Err(format!("unexpected keyword {:?}", name))
                } else {
                    Ok(MarkerValue::Variable(name))
                }
            }
            Some(Token::Str(text)) => Ok(MarkerValue::Literal(text)),
            _ => Err("expected variable or string literal".to_string()),
        }
    }

    fn parse_op(&mut self) -> Result<CompareOp, String> {
        match self.next() {
            Some(Token::Op(op)) => Ok(op),
            Some(Token::Ident(word)) if word == "in" => Ok(CompareOp::In),
            Some(Token::Ident(word)) if word == "not" => {
                if self.eat_keyword("in") {
                    Ok(CompareOp::NotIn)
                } else {
                    Err("expected 'in' after 'not'".to_string())
                }
            }
            _ => Err("expected comparison operator".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_normalizes_whitespace() {
        let marker = MarkerExpr::parse("sys_platform==\"win32\"").unwrap();
        assert_eq!(marker.to_string(), "sys_platform == \"win32\"");
    }

    #[test]
    fn test_parse_single_quotes() {
        let marker = MarkerExpr::parse("os_name == 'posix'").unwrap();
        assert_eq!(marker.to_string(), "os_name == \"posix\"");
    }

    #[test]
    fn test_parse_conjunction() {
        let marker =
            MarkerExpr::parse("python_version >= \"3.8\" and sys_platform != \"win32\"").unwrap();
        assert_eq!(
            marker.to_string(),
            "python_version >= \"3.8\" and sys_platform != \"win32\""
        );
    }

    #[test]
    fn test_parse_not_in() {
        let marker = MarkerExpr::parse("sys_platform not in \"win32 cygwin\"").unwrap();
        assert_eq!(marker.to_string(), "sys_platform not in \"win32 cygwin\"");
    }

    #[test]
    fn test_and_flattens() {
        let a = MarkerExpr::parse("a == \"1\" and b == \"2\"").unwrap();
        let b = MarkerExpr::extra_equals("test");
        let combined = a.and(b);
        assert_eq!(
            combined.to_string(),
            "a == \"1\" and b == \"2\" and extra == \"test\""
        );
    }

    #[test]
    fn test_or_parenthesized_under_and() {
        let disjunction =
            MarkerExpr::parse("sys_platform == \"win32\" or sys_platform == \"cygwin\"").unwrap();
        let combined = disjunction.and(MarkerExpr::extra_equals("native"));
        assert_eq!(
            combined.to_string(),
            "(sys_platform == \"win32\" or sys_platform == \"cygwin\") and extra == \"native\""
        );
    }

    #[test]
    fn test_parenthesized_input_roundtrip() {
        let marker =
            MarkerExpr::parse("(os_name == \"nt\" or os_name == \"posix\") and extra == \"x\"")
                .unwrap();
        assert_eq!(
            marker.to_string(),
            "(os_name == \"nt\" or os_name == \"posix\") and extra == \"x\""
        );
    }

    #[test]
    fn test_parse_errors() {
        assert!(MarkerExpr::parse("").is_err());
        assert!(MarkerExpr::parse("sys_platform =").is_err());
        assert!(MarkerExpr::parse("sys_platform == \"unterminated").is_err());
        assert!(MarkerExpr::parse("sys_platform == \"a\" extra").is_err());
        assert!(MarkerExpr::parse("(os_name == \"nt\"").is_err());
    }
}
