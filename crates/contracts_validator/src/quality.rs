//! Quality rule evaluation.
//!
//! Rules are parsed once into an [`Expression`] tree and then interpreted against
//! each record. The interpreter only knows the operators and helpers of the
//! expression language; it has no access to anything outside the record.

use crate::expression::{BinaryOp, CompareOp, Expr, Expression, Function, Literal, LogicalOp, UnaryOp};
use contracts_core::{
    Contract, ContractError, DataValue, Failure, QualityRule, Record, RuleError, RuleErrorCause,
};
use std::borrow::Cow;
use std::cmp::Ordering;
use std::collections::HashSet;
use tracing::debug;

/// A quality rule whose expression has been parsed and checked.
#[derive(Debug, Clone)]
pub struct CompiledRule {
    name: String,
    expression: Expression,
}

impl CompiledRule {
    /// Parses the rule's expression.
    ///
    /// Syntax errors, unknown functions, and invalid patterns are reported as
    /// [`ContractError::InvalidRule`].
    pub fn compile(rule: &QualityRule) -> Result<Self, ContractError> {
        let expression = Expression::parse(&rule.expression)
            .map_err(|e| ContractError::invalid_rule(&rule.name, e.to_string()))?;

        Ok(Self {
            name: rule.name.clone(),
            expression,
        })
    }

    /// Rule name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Expression source as written in the contract.
    pub fn expression(&self) -> &str {
        self.expression.source()
    }

    /// Evaluates the rule against a record.
    ///
    /// Every field the expression mentions must be present, even one that
    /// short-circuiting would never reach.
    pub fn evaluate(&self, record: &Record) -> Result<bool, RuleError> {
        evaluate_expression(&self.expression, record).map_err(|cause| RuleError::new(&self.name, cause))
    }
}

/// Parses and evaluates a rule in one step.
///
/// A malformed expression is reported as a [`RuleError`] with a
/// [`RuleErrorCause::Syntax`] cause rather than a contract error.
///
/// # Example
///
/// ```rust
/// use contracts_core::{DataValue, QualityRule, Record};
/// use contracts_validator::evaluate_rule;
///
/// let rule = QualityRule::new("positive_amount", "amount_cents > 0");
/// let record = Record::from([("amount_cents".to_string(), DataValue::Integer(-5))]);
///
/// assert_eq!(evaluate_rule(&rule, &record), Ok(false));
/// ```
pub fn evaluate_rule(rule: &QualityRule, record: &Record) -> Result<bool, RuleError> {
    let expression = Expression::parse(&rule.expression).map_err(|e| {
        RuleError::new(
            &rule.name,
            RuleErrorCause::Syntax {
                message: e.to_string(),
            },
        )
    })?;

    evaluate_expression(&expression, record).map_err(|cause| RuleError::new(&rule.name, cause))
}

/// Evaluates a contract's quality rules in declaration order.
#[derive(Debug, Clone, Default)]
pub struct QualityValidator {
    rules: Vec<CompiledRule>,
}

impl QualityValidator {
    /// Compiles every quality rule of a contract.
    ///
    /// Rule names must be non-empty and unique. The first invalid rule aborts
    /// compilation.
    pub fn compile(contract: &Contract) -> Result<Self, ContractError> {
        let mut seen = HashSet::new();
        let mut rules = Vec::with_capacity(contract.quality_rules().len());

        for rule in contract.quality_rules() {
            if rule.name.trim().is_empty() {
                return Err(ContractError::EmptyRuleName);
            }
            if !seen.insert(rule.name.as_str()) {
                return Err(ContractError::DuplicateRule(rule.name.clone()));
            }
            rules.push(CompiledRule::compile(rule)?);
        }

        Ok(Self { rules })
    }

    /// Compiled rules, in declaration order.
    pub fn rules(&self) -> &[CompiledRule] {
        &self.rules
    }

    /// Returns the failure of the first rule that is false or cannot be evaluated.
    pub fn first_failure(&self, record: &Record) -> Option<Failure> {
        for rule in &self.rules {
            match rule.evaluate(record) {
                Ok(true) => continue,
                Ok(false) => {
                    debug!(rule = rule.name(), "quality rule evaluated to false");
                    return Some(Failure::rule_false(rule.name(), rule.expression()));
                }
                Err(error) => {
                    debug!(rule = rule.name(), cause = %error.cause, "quality rule could not be evaluated");
                    return Some(Failure::rule_error(error));
                }
            }
        }
        None
    }
}

fn evaluate_expression(expression: &Expression, record: &Record) -> Result<bool, RuleErrorCause> {
    if let Some(missing) = expression.fields().find(|field| !record.contains_key(*field)) {
        return Err(RuleErrorCause::MissingField {
            field: missing.to_string(),
        });
    }

    match eval(expression.root(), record)? {
        Value::Bool(result) => Ok(result),
        other => Err(RuleErrorCause::NonBoolean {
            found: other.kind().to_string(),
        }),
    }
}

/// Runtime value of a sub-expression.
#[derive(Debug, Clone, PartialEq)]
enum Value<'a> {
    Int(i64),
    Float(f64),
    Str(Cow<'a, str>),
    Bool(bool),
    List(Vec<Value<'a>>),
}

impl<'a> Value<'a> {
    fn from_data(value: &'a DataValue) -> Self {
        match value {
            DataValue::Boolean(b) => Value::Bool(*b),
            DataValue::Integer(i) => Value::Int(*i),
            DataValue::Number(f) => Value::Float(*f),
            DataValue::String(s) => Value::Str(Cow::Borrowed(s)),
        }
    }

    fn from_literal(literal: &'a Literal) -> Self {
        match literal {
            Literal::Int(i) => Value::Int(*i),
            Literal::Float(f) => Value::Float(*f),
            Literal::Str(s) => Value::Str(Cow::Borrowed(s)),
            Literal::Bool(b) => Value::Bool(*b),
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Value::Int(_) => "integer",
            Value::Float(_) => "number",
            Value::Str(_) => "string",
            Value::Bool(_) => "boolean",
            Value::List(_) => "list",
        }
    }

    fn as_number(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }
}

fn type_mismatch(operator: &str, left: &Value<'_>, right: &Value<'_>) -> RuleErrorCause {
    RuleErrorCause::TypeMismatch {
        operator: operator.to_string(),
        left: left.kind().to_string(),
        right: right.kind().to_string(),
    }
}

fn unexpected(operator: &str, expected: &str, found: &Value<'_>) -> RuleErrorCause {
    RuleErrorCause::UnexpectedOperand {
        operator: operator.to_string(),
        expected: expected.to_string(),
        found: found.kind().to_string(),
    }
}

fn overflow(operator: &str) -> RuleErrorCause {
    RuleErrorCause::Overflow {
        operator: operator.to_string(),
    }
}

fn expect_bool(value: Value<'_>, operator: &str) -> Result<bool, RuleErrorCause> {
    match value {
        Value::Bool(b) => Ok(b),
        other => Err(unexpected(operator, "boolean", &other)),
    }
}

fn eval<'a>(expr: &'a Expr, record: &'a Record) -> Result<Value<'a>, RuleErrorCause> {
    match expr {
        Expr::Literal(literal) => Ok(Value::from_literal(literal)),
        Expr::Field(name) => record
            .get(name)
            .map(Value::from_data)
            .ok_or_else(|| RuleErrorCause::MissingField { field: name.clone() }),
        Expr::List(items) => items
            .iter()
            .map(|item| eval(item, record))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::List),
        Expr::Unary { op, operand } => {
            let value = eval(operand, record)?;
            match op {
                UnaryOp::Not => Ok(Value::Bool(!expect_bool(value, "not")?)),
                UnaryOp::Neg => match value {
                    Value::Int(i) => i.checked_neg().map(Value::Int).ok_or_else(|| overflow("-")),
                    Value::Float(f) => Ok(Value::Float(-f)),
                    other => Err(unexpected("-", "a number", &other)),
                },
            }
        }
        Expr::Binary { op, left, right } => {
            let left = eval(left, record)?;
            let right = eval(right, record)?;
            arithmetic(*op, left, right)
        }
        Expr::Logical { op, left, right } => {
            let left = expect_bool(eval(left, record)?, op.symbol())?;
            let decided = match op {
                LogicalOp::And => !left,
                LogicalOp::Or => left,
            };
            if decided {
                return Ok(Value::Bool(left));
            }
            Ok(Value::Bool(expect_bool(eval(right, record)?, op.symbol())?))
        }
        Expr::Compare { first, rest } => {
            let mut left = eval(first, record)?;
            for (op, next) in rest {
                let right = eval(next, record)?;
                if !compare(*op, &left, &right)? {
                    return Ok(Value::Bool(false));
                }
                left = right;
            }
            Ok(Value::Bool(true))
        }
        Expr::Call { function, args } => {
            let args = args
                .iter()
                .map(|arg| eval(arg, record))
                .collect::<Result<Vec<_>, _>>()?;
            call(*function, &args)
        }
        Expr::Matches { subject, pattern } => match eval(subject, record)? {
            Value::Str(s) => Ok(Value::Bool(pattern.is_match(&s))),
            other => Err(unexpected("matches", "a string", &other)),
        },
    }
}

fn arithmetic<'a>(op: BinaryOp, left: Value<'a>, right: Value<'a>) -> Result<Value<'a>, RuleErrorCause> {
    match (op, left, right) {
        (BinaryOp::Add, Value::Str(a), Value::Str(b)) => Ok(Value::Str(Cow::Owned(format!("{}{}", a, b)))),
        (op, Value::Int(a), Value::Int(b)) => int_arithmetic(op, a, b),
        (op, left, right) => match (left.as_number(), right.as_number()) {
            (Some(a), Some(b)) => float_arithmetic(op, a, b),
            _ => Err(type_mismatch(op.symbol(), &left, &right)),
        },
    }
}

fn int_arithmetic<'a>(op: BinaryOp, a: i64, b: i64) -> Result<Value<'a>, RuleErrorCause> {
    let result = match op {
        BinaryOp::Add => a.checked_add(b),
        BinaryOp::Sub => a.checked_sub(b),
        BinaryOp::Mul => a.checked_mul(b),
        BinaryOp::Div => {
            if b == 0 {
                return Err(RuleErrorCause::DivisionByZero);
            }
            return Ok(Value::Float(a as f64 / b as f64));
        }
        BinaryOp::Rem => {
            if b == 0 {
                return Err(RuleErrorCause::DivisionByZero);
            }
            // floor semantics: the result takes the sign of the divisor
            a.checked_rem(b)
                .map(|r| if r != 0 && (r < 0) != (b < 0) { r + b } else { r })
        }
    };
    result.map(Value::Int).ok_or_else(|| overflow(op.symbol()))
}

fn float_arithmetic<'a>(op: BinaryOp, a: f64, b: f64) -> Result<Value<'a>, RuleErrorCause> {
    let result = match op {
        BinaryOp::Add => a + b,
        BinaryOp::Sub => a - b,
        BinaryOp::Mul => a * b,
        BinaryOp::Div | BinaryOp::Rem if b == 0.0 => return Err(RuleErrorCause::DivisionByZero),
        BinaryOp::Div => a / b,
        BinaryOp::Rem => a - b * (a / b).floor(),
    };
    Ok(Value::Float(result))
}

fn values_equal(left: &Value<'_>, right: &Value<'_>) -> bool {
    match (left, right) {
        (Value::Int(a), Value::Int(b)) => a == b,
        (Value::Str(a), Value::Str(b)) => a == b,
        (Value::Bool(a), Value::Bool(b)) => a == b,
        (Value::List(a), Value::List(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(x, y)| values_equal(x, y))
        }
        (Value::Int(a), Value::Float(b)) | (Value::Float(b), Value::Int(a)) => {
            compare_int_float(*a, *b) == Some(Ordering::Equal)
        }
        _ => match (left.as_number(), right.as_number()) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        },
    }
}

fn ordering(op: CompareOp, left: &Value<'_>, right: &Value<'_>) -> Result<Option<Ordering>, RuleErrorCause> {
    match (left, right) {
        (Value::Int(a), Value::Int(b)) => Ok(Some(a.cmp(b))),
        (Value::Str(a), Value::Str(b)) => Ok(Some(a.cmp(b))),
        (Value::Int(a), Value::Float(b)) => Ok(compare_int_float(*a, *b)),
        (Value::Float(a), Value::Int(b)) => Ok(compare_int_float(*b, *a).map(Ordering::reverse)),
        _ => match (left.as_number(), right.as_number()) {
            (Some(a), Some(b)) => Ok(a.partial_cmp(&b)),
            _ => Err(type_mismatch(op.symbol(), left, right)),
        },
    }
}

/// Orders an integer against a float without rounding the integer first, so
/// `9007199254740993 > 9007199254740992.0` holds. `None` for NaN.
fn compare_int_float(int: i64, float: f64) -> Option<Ordering> {
    // 2^63, the first float above i64::MAX
    const BOUND: f64 = 9_223_372_036_854_775_808.0;

    if float.is_nan() {
        return None;
    }
    if float >= BOUND {
        return Some(Ordering::Less);
    }
    if float < -BOUND {
        return Some(Ordering::Greater);
    }
    let whole = float.trunc();
    match int.cmp(&(whole as i64)) {
        Ordering::Equal => whole.partial_cmp(&float),
        unequal => Some(unequal),
    }
}

fn contains(op: CompareOp, needle: &Value<'_>, haystack: &Value<'_>) -> Result<bool, RuleErrorCause> {
    match (needle, haystack) {
        (_, Value::List(items)) => Ok(items.iter().any(|item| values_equal(needle, item))),
        (Value::Str(n), Value::Str(h)) => Ok(h.contains(&**n)),
        _ => Err(type_mismatch(op.symbol(), needle, haystack)),
    }
}

fn compare(op: CompareOp, left: &Value<'_>, right: &Value<'_>) -> Result<bool, RuleErrorCause> {
    match op {
        CompareOp::Eq => Ok(values_equal(left, right)),
        CompareOp::NotEq => Ok(!values_equal(left, right)),
        CompareOp::In => contains(op, left, right),
        CompareOp::NotIn => contains(op, left, right).map(|found| !found),
        CompareOp::Lt => Ok(ordering(op, left, right)?.is_some_and(Ordering::is_lt)),
        CompareOp::Le => Ok(ordering(op, left, right)?.is_some_and(Ordering::is_le)),
        CompareOp::Gt => Ok(ordering(op, left, right)?.is_some_and(Ordering::is_gt)),
        CompareOp::Ge => Ok(ordering(op, left, right)?.is_some_and(Ordering::is_ge)),
    }
}

fn call<'a>(function: Function, args: &[Value<'a>]) -> Result<Value<'a>, RuleErrorCause> {
    let name = function.name();
    match (function, args) {
        (Function::Len, [Value::Str(s)]) => Ok(Value::Int(s.chars().count() as i64)),
        (Function::Len, [Value::List(items)]) => Ok(Value::Int(items.len() as i64)),
        (Function::Len, [other]) => Err(unexpected(name, "a string or list", other)),
        (Function::Abs, [Value::Int(i)]) => i.checked_abs().map(Value::Int).ok_or_else(|| overflow(name)),
        (Function::Abs, [Value::Float(f)]) => Ok(Value::Float(f.abs())),
        (Function::Abs, [other]) => Err(unexpected(name, "a number", other)),
        (Function::Lower, [Value::Str(s)]) => Ok(Value::Str(Cow::Owned(s.to_lowercase()))),
        (Function::Upper, [Value::Str(s)]) => Ok(Value::Str(Cow::Owned(s.to_uppercase()))),
        (Function::Strip, [Value::Str(s)]) => Ok(Value::Str(Cow::Owned(s.trim().to_string()))),
        (Function::StartsWith, [Value::Str(s), Value::Str(p)]) => Ok(Value::Bool(s.starts_with(&**p))),
        (Function::EndsWith, [Value::Str(s), Value::Str(p)]) => Ok(Value::Bool(s.ends_with(&**p))),
        (Function::Contains, [Value::Str(s), Value::Str(p)]) => Ok(Value::Bool(s.contains(&**p))),
        (_, [other]) => Err(unexpected(name, "a string", other)),
        (_, [left, right]) => Err(type_mismatch(name, left, right)),
        (_, _) => Err(RuleErrorCause::UnexpectedOperand {
            operator: name.to_string(),
            expected: format!("{} argument(s)", function.arity()),
            found: args.len().to_string(),
        }),
    }
}
