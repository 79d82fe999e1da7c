//! Quality rule expression language.
//!
//! Rules are written in a small, closed grammar: literals, field references,
//! arithmetic, comparisons (chainable, as in `0 < x <= 100`), membership,
//! boolean combinators, and a fixed set of string and numeric helpers.
//!
//! ```text
//! expr       := or
//! or         := and (("or" | "||") and)*
//! and        := not (("and" | "&&") not)*
//! not        := ("not" | "!") not | comparison
//! comparison := additive ((cmp_op | "in" | "not" "in") additive)*
//! additive   := term (("+" | "-") term)*
//! term       := unary (("*" | "/" | "%") unary)*
//! unary      := "-" unary | postfix
//! postfix    := primary ("." method "(" args ")")*
//! primary    := literal | field | function "(" args ")" | "(" expr ")" | "[" args "]"
//! ```
//!
//! Numbers are decimal: `i64` integers, or decimals with a fractional part such
//! as `19.99`. Exponent notation (`1e3`) is not part of the grammar. A leading
//! `-` is the negation operator, so `i64::MIN` cannot be written as a single
//! literal; spell it `-9223372036854775807 - 1`.
//!
//! Parsing happens once per rule. There are no loops, assignments, or
//! user-defined functions. The parsed tree may be at most [`MAX_DEPTH`] levels
//! deep, operator chains such as `a + b + c` included, and regular expressions
//! are compiled up front by the linear-time `regex` engine, so evaluating a
//! parsed expression always terminates within a bounded stack.

use crate::ExpressionError;
use regex::{Regex, RegexBuilder};
use std::collections::BTreeSet;
use std::fmt;
use std::iter::Peekable;
use std::str::CharIndices;

/// Longest accepted expression source, in bytes.
pub const MAX_EXPRESSION_LEN: usize = 4096;

/// Deepest accepted expression tree, counted in edges from the root.
pub const MAX_DEPTH: usize = 64;

const REGEX_SIZE_LIMIT: usize = 1 << 20;

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Int(i64),
    Float(f64),
    Str(String),
    Ident(String),
    And,
    Or,
    Not,
    In,
    True,
    False,
    LParen,
    RParen,
    LBracket,
    RBracket,
    Comma,
    Dot,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    EqEq,
    NotEq,
    Lt,
    Le,
    Gt,
    Ge,
    Eof,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Int(i) => write!(f, "number {}", i),
            Token::Float(x) => write!(f, "number {}", x),
            Token::Str(s) => write!(f, "string {:?}", s),
            Token::Ident(name) => write!(f, "identifier '{}'", name),
            Token::And => f.write_str("'and'"),
            Token::Or => f.write_str("'or'"),
            Token::Not => f.write_str("'not'"),
            Token::In => f.write_str("'in'"),
            Token::True => f.write_str("'true'"),
            Token::False => f.write_str("'false'"),
            Token::LParen => f.write_str("'('"),
            Token::RParen => f.write_str("')'"),
            Token::LBracket => f.write_str("'['"),
            Token::RBracket => f.write_str("']'"),
            Token::Comma => f.write_str("','"),
            Token::Dot => f.write_str("'.'"),
            Token::Plus => f.write_str("'+'"),
            Token::Minus => f.write_str("'-'"),
            Token::Star => f.write_str("'*'"),
            Token::Slash => f.write_str("'/'"),
            Token::Percent => f.write_str("'%'"),
            Token::EqEq => f.write_str("'=='"),
            Token::NotEq => f.write_str("'!='"),
            Token::Lt => f.write_str("'<'"),
            Token::Le => f.write_str("'<='"),
            Token::Gt => f.write_str("'>'"),
            Token::Ge => f.write_str("'>='"),
            Token::Eof => f.write_str("end of expression"),
        }
    }
}

#[derive(Debug, Clone)]
struct Spanned {
    token: Token,
    position: usize,
}

struct Lexer<'a> {
    source: &'a str,
    chars: Peekable<CharIndices<'a>>,
}

impl<'a> Lexer<'a> {
    fn tokenize(source: &'a str) -> Result<Vec<Spanned>, ExpressionError> {
        let mut lexer = Lexer {
            source,
            chars: source.char_indices().peekable(),
        };
        let mut tokens = Vec::new();
        loop {
            let spanned = lexer.next_token()?;
            let done = spanned.token == Token::Eof;
            tokens.push(spanned);
            if done {
                return Ok(tokens);
            }
        }
    }

    fn next_token(&mut self) -> Result<Spanned, ExpressionError> {
        while matches!(self.chars.peek(), Some(&(_, c)) if c.is_whitespace()) {
            self.chars.next();
        }

        let Some(&(position, c)) = self.chars.peek() else {
            return Ok(Spanned {
                token: Token::Eof,
                position: self.source.len(),
            });
        };

        if c.is_ascii_digit() {
            return self.number(position);
        }
        if c == '"' || c == '\'' {
            return self.string(position, c);
        }
        if c.is_alphabetic() || c == '_' {
            return Ok(self.identifier(position));
        }

        self.chars.next();
        let token = match c {
            '(' => Token::LParen,
            ')' => Token::RParen,
            '[' => Token::LBracket,
            ']' => Token::RBracket,
            ',' => Token::Comma,
            '.' => Token::Dot,
            '+' => Token::Plus,
            '-' => Token::Minus,
            '*' => Token::Star,
            '/' => Token::Slash,
            '%' => Token::Percent,
            '=' if self.eat('=') => Token::EqEq,
            '=' => {
                return Err(ExpressionError::new(
                    position,
                    "'=' is not an operator, use '==' for equality",
                ));
            }
            '!' if self.eat('=') => Token::NotEq,
            '!' => Token::Not,
            '<' if self.eat('=') => Token::Le,
            '<' => Token::Lt,
            '>' if self.eat('=') => Token::Ge,
            '>' => Token::Gt,
            '&' if self.eat('&') => Token::And,
            '|' if self.eat('|') => Token::Or,
            other => {
                return Err(ExpressionError::new(
                    position,
                    format!("unexpected character '{}'", other),
                ));
            }
        };

        Ok(Spanned { token, position })
    }

    fn eat(&mut self, expected: char) -> bool {
        if matches!(self.chars.peek(), Some(&(_, c)) if c == expected) {
            self.chars.next();
            true
        } else {
            false
        }
    }

    fn number(&mut self, start: usize) -> Result<Spanned, ExpressionError> {
        let mut end = start;
        let mut is_float = false;

        while let Some(&(index, c)) = self.chars.peek() {
            if c.is_ascii_digit() {
                end = index + 1;
                self.chars.next();
            } else if c == '.' && !is_float && self.digit_follows_dot() {
                is_float = true;
                end = index + 1;
                self.chars.next();
            } else {
                break;
            }
        }

        let text = &self.source[start..end];
        let token = if is_float {
            text.parse::<f64>().map(Token::Float).map_err(|_| {
                ExpressionError::new(start, format!("invalid number literal '{}'", text))
            })?
        } else {
            text.parse::<i64>().map(Token::Int).map_err(|_| {
                ExpressionError::new(start, format!("integer literal '{}' is out of range", text))
            })?
        };

        Ok(Spanned {
            token,
            position: start,
        })
    }

    /// Whether the `.` under the cursor starts a fractional part rather than a method call.
    fn digit_follows_dot(&self) -> bool {
        let mut ahead = self.chars.clone();
        ahead.next();
        matches!(ahead.peek(), Some(&(_, d)) if d.is_ascii_digit())
    }

    fn string(&mut self, start: usize, quote: char) -> Result<Spanned, ExpressionError> {
        self.chars.next();
        let mut value = String::new();

        loop {
            match self.chars.next() {
                None => return Err(ExpressionError::new(start, "unterminated string literal")),
                Some((_, c)) if c == quote => break,
                Some((index, '\\')) => {
                    let escaped = match self.chars.next() {
                        Some((_, 'n')) => '\n',
                        Some((_, 't')) => '\t',
                        Some((_, 'r')) => '\r',
                        Some((_, '\\')) => '\\',
                        Some((_, '\'')) => '\'',
                        Some((_, '"')) => '"',
                        Some((_, other)) => {
                            return Err(ExpressionError::new(
                                index,
                                format!("unknown escape sequence '\\{}'", other),
                            ));
                        }
                        None => {
                            return Err(ExpressionError::new(start, "unterminated string literal"));
                        }
                    };
                    value.push(escaped);
                }
                Some((_, c)) => value.push(c),
            }
        }

        Ok(Spanned {
            token: Token::Str(value),
            position: start,
        })
    }

    fn identifier(&mut self, start: usize) -> Spanned {
        let mut end = start;
        while let Some(&(index, c)) = self.chars.peek() {
            if c.is_alphanumeric() || c == '_' {
                end = index + c.len_utf8();
                self.chars.next();
            } else {
                break;
            }
        }

        let token = match &self.source[start..end] {
            "and" => Token::And,
            "or" => Token::Or,
            "not" => Token::Not,
            "in" => Token::In,
            "true" | "True" => Token::True,
            "false" | "False" => Token::False,
            name => Token::Ident(name.to_string()),
        };

        Spanned {
            token,
            position: start,
        }
    }
}

/// A literal value written in the expression source.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Int(i64),
    Float(f64),
    Str(String),
    Bool(bool),
}

/// Prefix operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Not,
}

/// Arithmetic operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
}

impl BinaryOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Rem => "%",
        }
    }
}

/// Short-circuiting boolean operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOp {
    And,
    Or,
}

impl LogicalOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            LogicalOp::And => "and",
            LogicalOp::Or => "or",
        }
    }
}

/// Comparison and membership operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    NotEq,
    Lt,
    Le,
    Gt,
    Ge,
    In,
    NotIn,
}

impl CompareOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            CompareOp::Eq => "==",
            CompareOp::NotEq => "!=",
            CompareOp::Lt => "<",
            CompareOp::Le => "<=",
            CompareOp::Gt => ">",
            CompareOp::Ge => ">=",
            CompareOp::In => "in",
            CompareOp::NotIn => "not in",
        }
    }
}

/// Builtin helpers callable from a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Function {
    Len,
    Abs,
    Lower,
    Upper,
    Strip,
    StartsWith,
    EndsWith,
    Contains,
}

impl Function {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "len" => Some(Function::Len),
            "abs" => Some(Function::Abs),
            "lower" => Some(Function::Lower),
            "upper" => Some(Function::Upper),
            "strip" => Some(Function::Strip),
            "startswith" => Some(Function::StartsWith),
            "endswith" => Some(Function::EndsWith),
            "contains" => Some(Function::Contains),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Function::Len => "len",
            Function::Abs => "abs",
            Function::Lower => "lower",
            Function::Upper => "upper",
            Function::Strip => "strip",
            Function::StartsWith => "startswith",
            Function::EndsWith => "endswith",
            Function::Contains => "contains",
        }
    }

    pub fn arity(&self) -> usize {
        match self {
            Function::Len | Function::Abs | Function::Lower | Function::Upper | Function::Strip => 1,
            Function::StartsWith | Function::EndsWith | Function::Contains => 2,
        }
    }

    /// Whether the helper may also be written as a method on a string, `s.lower()`.
    fn is_string_method(&self) -> bool {
        !matches!(self, Function::Len | Function::Abs)
    }
}

/// Parsed expression tree.
#[derive(Debug, Clone)]
pub enum Expr {
    Literal(Literal),
    Field(String),
    List(Vec<Expr>),
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Logical {
        op: LogicalOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    /// `first op1 e1 op2 e2 ...`, true iff every adjacent pair holds
    Compare {
        first: Box<Expr>,
        rest: Vec<(CompareOp, Expr)>,
    },
    Call {
        function: Function,
        args: Vec<Expr>,
    },
    /// `matches(subject, "pattern")` with the pattern compiled at parse time
    Matches {
        subject: Box<Expr>,
        pattern: Regex,
    },
}

/// A parsed quality rule expression.
#[derive(Debug, Clone)]
pub struct Expression {
    source: String,
    root: Expr,
    fields: BTreeSet<String>,
}

impl Expression {
    /// Parses an expression.
    ///
    /// # Example
    ///
    /// ```rust
    /// use contracts_validator::Expression;
    ///
    /// let expr = Expression::parse("amount_cents > 0 and currency in ['EUR', 'USD']").unwrap();
    /// let fields: Vec<&str> = expr.fields().collect();
    /// assert_eq!(fields, vec!["amount_cents", "currency"]);
    /// ```
    pub fn parse(source: &str) -> Result<Self, ExpressionError> {
        if source.len() > MAX_EXPRESSION_LEN {
            return Err(ExpressionError::new(
                MAX_EXPRESSION_LEN,
                format!("expression exceeds {} bytes", MAX_EXPRESSION_LEN),
            ));
        }

        let tokens = Lexer::tokenize(source)?;
        let mut parser = Parser {
            tokens,
            pos: 0,
            depth: 0,
            fields: BTreeSet::new(),
        };
        let root = parser.parse_expression()?;
        if parser.peek() != &Token::Eof {
            return Err(ExpressionError::unexpected(
                parser.position(),
                parser.peek(),
                "end of expression",
            ));
        }
        if exceeds_depth(&root) {
            return Err(ExpressionError::new(
                0,
                format!("expression nests deeper than {} levels", MAX_DEPTH),
            ));
        }

        Ok(Self {
            source: source.to_string(),
            root,
            fields: parser.fields,
        })
    }

    /// The original source text.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Root of the expression tree.
    pub fn root(&self) -> &Expr {
        &self.root
    }

    /// Field names referenced anywhere in the expression, sorted.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(String::as_str)
    }
}

struct Parser {
    tokens: Vec<Spanned>,
    pos: usize,
    depth: usize,
    fields: BTreeSet<String>,
}

impl Parser {
    fn peek(&self) -> &Token {
        &self.tokens[self.pos].token
    }

    fn peek_next(&self) -> &Token {
        let index = (self.pos + 1).min(self.tokens.len() - 1);
        &self.tokens[index].token
    }

    fn position(&self) -> usize {
        self.tokens[self.pos].position
    }

    /// Consumes the current token. The trailing `Eof` is never consumed.
    fn advance(&mut self) -> Token {
        let token = self.tokens[self.pos].token.clone();
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        token
    }

    fn eat(&mut self, expected: &Token) -> bool {
        if self.peek() == expected {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, expected: &Token) -> Result<(), ExpressionError> {
        if self.eat(expected) {
            Ok(())
        } else {
            Err(ExpressionError::unexpected(
                self.position(),
                self.peek(),
                &expected.to_string(),
            ))
        }
    }

    fn nested<T>(
        &mut self,
        parse: impl FnOnce(&mut Self) -> Result<T, ExpressionError>,
    ) -> Result<T, ExpressionError> {
        if self.depth >= MAX_DEPTH {
            return Err(ExpressionError::new(
                self.position(),
                format!("expression nests deeper than {} levels", MAX_DEPTH),
            ));
        }
        self.depth += 1;
        let result = parse(self);
        self.depth -= 1;
        result
    }

    fn parse_expression(&mut self) -> Result<Expr, ExpressionError> {
        self.parse_or()
    }

    fn parse_or(&mut self) -> Result<Expr, ExpressionError> {
        let mut left = self.parse_and()?;
        while self.eat(&Token::Or) {
            let right = self.parse_and()?;
            left = Expr::Logical {
                op: LogicalOp::Or,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<Expr, ExpressionError> {
        let mut left = self.parse_not()?;
        while self.eat(&Token::And) {
            let right = self.parse_not()?;
            left = Expr::Logical {
                op: LogicalOp::And,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn parse_not(&mut self) -> Result<Expr, ExpressionError> {
        if self.eat(&Token::Not) {
            let operand = self.nested(|p| p.parse_not())?;
            return Ok(Expr::Unary {
                op: UnaryOp::Not,
                operand: Box::new(operand),
            });
        }
        self.parse_comparison()
    }

    fn parse_comparison(&mut self) -> Result<Expr, ExpressionError> {
        let first = self.parse_additive()?;
        let mut rest = Vec::new();

        loop {
            let op = match self.peek() {
                Token::EqEq => CompareOp::Eq,
                Token::NotEq => CompareOp::NotEq,
                Token::Lt => CompareOp::Lt,
                Token::Le => CompareOp::Le,
                Token::Gt => CompareOp::Gt,
                Token::Ge => CompareOp::Ge,
                Token::In => CompareOp::In,
                Token::Not if self.peek_next() == &Token::In => {
                    self.advance();
                    CompareOp::NotIn
                }
                _ => break,
            };
            self.advance();
            rest.push((op, self.parse_additive()?));
        }

        if rest.is_empty() {
            Ok(first)
        } else {
            Ok(Expr::Compare {
                first: Box::new(first),
                rest,
            })
        }
    }

    fn parse_additive(&mut self) -> Result<Expr, ExpressionError> {
        let mut left = self.parse_term()?;
        loop {
            let op = match self.peek() {
                Token::Plus => BinaryOp::Add,
                Token::Minus => BinaryOp::Sub,
                _ => return Ok(left),
            };
            self.advance();
            let right = self.parse_term()?;
            left = Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
    }

    fn parse_term(&mut self) -> Result<Expr, ExpressionError> {
        let mut left = self.parse_unary()?;
        loop {
            let op = match self.peek() {
                Token::Star => BinaryOp::Mul,
                Token::Slash => BinaryOp::Div,
                Token::Percent => BinaryOp::Rem,
                _ => return Ok(left),
            };
            self.advance();
            let right = self.parse_unary()?;
            left = Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
    }

    fn parse_unary(&mut self) -> Result<Expr, ExpressionError> {
        if self.eat(&Token::Minus) {
            let operand = self.nested(|p| p.parse_unary())?;
            return Ok(Expr::Unary {
                op: UnaryOp::Neg,
                operand: Box::new(operand),
            });
        }
        self.parse_postfix()
    }

    fn parse_postfix(&mut self) -> Result<Expr, ExpressionError> {
        let mut expr = self.parse_primary()?;

        while self.eat(&Token::Dot) {
            let position = self.position();
            let name = match self.advance() {
                Token::Ident(name) => name,
                other => return Err(ExpressionError::unexpected(position, other, "a method name")),
            };
            self.expect(&Token::LParen)?;
            let mut args = vec![expr];
            args.extend(self.parse_args(&Token::RParen)?);

            expr = if name == "matches" {
                build_matches(args, position)?
            } else {
                match Function::from_name(&name) {
                    Some(function) if function.is_string_method() => {
                        build_call(function, args, position)?
                    }
                    _ => {
                        return Err(ExpressionError::new(
                            position,
                            format!("unknown method '{}'", name),
                        ));
                    }
                }
            };
        }

        Ok(expr)
    }

    fn parse_primary(&mut self) -> Result<Expr, ExpressionError> {
        let position = self.position();
        match self.advance() {
            Token::Int(i) => Ok(Expr::Literal(Literal::Int(i))),
            Token::Float(x) => Ok(Expr::Literal(Literal::Float(x))),
            Token::Str(s) => Ok(Expr::Literal(Literal::Str(s))),
            Token::True => Ok(Expr::Literal(Literal::Bool(true))),
            Token::False => Ok(Expr::Literal(Literal::Bool(false))),
            Token::Ident(name) => {
                if !self.eat(&Token::LParen) {
                    self.fields.insert(name.clone());
                    return Ok(Expr::Field(name));
                }
                let args = self.parse_args(&Token::RParen)?;
                if name == "matches" {
                    return build_matches(args, position);
                }
                match Function::from_name(&name) {
                    Some(function) => build_call(function, args, position),
                    None => Err(ExpressionError::new(
                        position,
                        format!("unknown function '{}'", name),
                    )),
                }
            }
            Token::LParen => {
                let inner = self.nested(|p| p.parse_expression())?;
                self.expect(&Token::RParen)?;
                Ok(inner)
            }
            Token::LBracket => Ok(Expr::List(self.parse_args(&Token::RBracket)?)),
            other => Err(ExpressionError::unexpected(position, other, "an operand")),
        }
    }

    /// Parses a comma-separated list up to and including `close`.
    fn parse_args(&mut self, close: &Token) -> Result<Vec<Expr>, ExpressionError> {
        self.nested(|p| {
            let mut items = Vec::new();
            if p.eat(close) {
                return Ok(items);
            }
            loop {
                items.push(p.parse_expression()?);
                if p.eat(&Token::Comma) {
                    if p.eat(close) {
                        return Ok(items);
                    }
                    continue;
                }
                p.expect(close)?;
                return Ok(items);
            }
        })
    }
}

/// Left-associative chains (`a + b + ...`, `p or q or ...`, `s.lower().lower()`)
/// are built by loops, not recursion, so the parser's own guard does not see
/// them. The walk is iterative for the same reason.
fn exceeds_depth(root: &Expr) -> bool {
    let mut stack = vec![(root, 0usize)];
    while let Some((expr, depth)) = stack.pop() {
        if depth > MAX_DEPTH {
            return true;
        }
        let below = depth + 1;
        match expr {
            Expr::Literal(_) | Expr::Field(_) => {}
            Expr::List(items) | Expr::Call { args: items, .. } => {
                stack.extend(items.iter().map(|item| (item, below)));
            }
            Expr::Unary { operand, .. } => stack.push((&**operand, below)),
            Expr::Binary { left, right, .. } | Expr::Logical { left, right, .. } => {
                stack.push((&**left, below));
                stack.push((&**right, below));
            }
            Expr::Compare { first, rest } => {
                stack.push((&**first, below));
                stack.extend(rest.iter().map(|(_, operand)| (operand, below)));
            }
            Expr::Matches { subject, .. } => stack.push((&**subject, below)),
        }
    }
    false
}

fn build_call(function: Function, args: Vec<Expr>, position: usize) -> Result<Expr, ExpressionError> {
    if args.len() != function.arity() {
        return Err(ExpressionError::new(
            position,
            format!(
                "'{}' takes {} argument(s), found {}",
                function.name(),
                function.arity(),
                args.len()
            ),
        ));
    }
    Ok(Expr::Call { function, args })
}

fn build_matches(args: Vec<Expr>, position: usize) -> Result<Expr, ExpressionError> {
    let mut args = args.into_iter();
    let (Some(subject), Some(pattern), None) = (args.next(), args.next(), args.next()) else {
        return Err(ExpressionError::new(
            position,
            "'matches' takes 2 argument(s)",
        ));
    };
    let Expr::Literal(Literal::Str(pattern)) = pattern else {
        return Err(ExpressionError::new(
            position,
            "the pattern of 'matches' must be a string literal",
        ));
    };

    let pattern = RegexBuilder::new(&pattern)
        .size_limit(REGEX_SIZE_LIMIT)
        .build()
        .map_err(|e| ExpressionError::new(position, format!("invalid pattern: {}", e)))?;

    Ok(Expr::Matches {
        subject: Box::new(subject),
        pattern,
    })
}
