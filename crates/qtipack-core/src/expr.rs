//! Dialect-agnostic response-processing algebra.
//!
//! Declarations, expressions, and conditional rules that make up the scoring
//! tree of an item, plus an evaluator implementing the usual QTI semantics.
//! Only the textual rendering differs between output dialects.

use std::collections::{BTreeSet, HashMap};
use std::fmt;

/// Name of the response variable of every item.
pub const RESPONSE: &str = "RESPONSE";
/// Name of the score outcome.
pub const SCORE: &str = "SCORE";
/// Name of the feedback marker outcome.
pub const FEEDBACK: &str = "FEEDBACK";

/// How many values a variable holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cardinality {
    Single,
    Multiple,
}

impl Cardinality {
    pub fn as_str(self) -> &'static str {
        match self {
            Cardinality::Single => "single",
            Cardinality::Multiple => "multiple",
        }
    }
}

impl fmt::Display for Cardinality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Value type of a variable or literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BaseType {
    Identifier,
    String,
    Float,
    Boolean,
    File,
    DirectedPair,
}

impl BaseType {
    pub fn as_str(self) -> &'static str {
        match self {
            BaseType::Identifier => "identifier",
            BaseType::String => "string",
            BaseType::Float => "float",
            BaseType::Boolean => "boolean",
            BaseType::File => "file",
            BaseType::DirectedPair => "directedPair",
        }
    }
}

impl fmt::Display for BaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Declares the shape of the expected response.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseDeclaration {
    pub identifier: String,
    pub cardinality: Cardinality,
    pub base_type: BaseType,
    /// Canonical correct response, empty for manually graded items.
    pub correct_response: Vec<String>,
}

impl ResponseDeclaration {
    /// The declared correct response as a runtime value, if one is declared.
    pub fn correct_value(&self) -> Option<Value> {
        if self.correct_response.is_empty() {
            return None;
        }
        let mut values = self
            .correct_response
            .iter()
            .map(|v| Value::parse(self.base_type, v));
        match self.cardinality {
            Cardinality::Single => values.next(),
            Cardinality::Multiple => Some(Value::Multiple(
                values.flat_map(Value::into_scalars).collect(),
            )),
        }
    }
}

/// Declares an outcome variable.
#[derive(Debug, Clone, PartialEq)]
pub struct OutcomeDeclaration {
    pub identifier: String,
    pub cardinality: Cardinality,
    pub base_type: BaseType,
    pub default_value: Option<String>,
}

impl OutcomeDeclaration {
    /// `SCORE`: single float defaulting to zero.
    pub fn score() -> Self {
        Self {
            identifier: SCORE.into(),
            cardinality: Cardinality::Single,
            base_type: BaseType::Float,
            default_value: Some("0".into()),
        }
    }

    /// `FEEDBACK`: multiple identifiers, no default.
    pub fn feedback() -> Self {
        Self {
            identifier: FEEDBACK.into(),
            cardinality: Cardinality::Multiple,
            base_type: BaseType::Identifier,
            default_value: None,
        }
    }
}

/// An expression node.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Reference to a declared variable.
    Variable(String),
    /// Literal value.
    BaseValue { base_type: BaseType, value: String },
    /// Equality of two values of the same cardinality.
    Match(Box<Expr>, Box<Expr>),
    /// Whether the first (single) value occurs in the second container.
    Member(Box<Expr>, Box<Expr>),
    And(Vec<Expr>),
    Or(Vec<Expr>),
    Not(Box<Expr>),
    Gte(Box<Expr>, Box<Expr>),
    Lte(Box<Expr>, Box<Expr>),
    /// Multi-valued container built from its operands.
    Multiple(Vec<Expr>),
    Sum(Vec<Expr>),
    /// Test-level reference to one variable across all items.
    TestVariables(String),
}

impl Expr {
    pub fn variable(identifier: &str) -> Self {
        Expr::Variable(identifier.to_string())
    }

    pub fn literal(base_type: BaseType, value: impl Into<String>) -> Self {
        Expr::BaseValue {
            base_type,
            value: value.into(),
        }
    }

    pub fn identifier(value: impl Into<String>) -> Self {
        Self::literal(BaseType::Identifier, value)
    }

    pub fn float(value: f64) -> Self {
        Self::literal(BaseType::Float, format_float(value))
    }

    pub fn boolean(value: bool) -> Self {
        Self::literal(BaseType::Boolean, if value { "true" } else { "false" })
    }

    pub fn matches(left: Expr, right: Expr) -> Self {
        Expr::Match(Box::new(left), Box::new(right))
    }

    pub fn member(value: Expr, container: Expr) -> Self {
        Expr::Member(Box::new(value), Box::new(container))
    }

    pub fn not(inner: Expr) -> Self {
        Expr::Not(Box::new(inner))
    }

    pub fn gte(left: Expr, right: Expr) -> Self {
        Expr::Gte(Box::new(left), Box::new(right))
    }

    pub fn lte(left: Expr, right: Expr) -> Self {
        Expr::Lte(Box::new(left), Box::new(right))
    }

    /// `And` of the operands, collapsed when there is only one.
    pub fn all(mut operands: Vec<Expr>) -> Self {
        if operands.len() == 1 {
            operands.remove(0)
        } else {
            Expr::And(operands)
        }
    }

    /// Disjunction; a single operand is returned unchanged.
    pub fn any(mut operands: Vec<Expr>) -> Self {
        if operands.len() == 1 {
            operands.remove(0)
        } else {
            Expr::Or(operands)
        }
    }

    /// Every literal in the tree, in traversal order.
    pub fn literals(&self) -> Vec<(BaseType, &str)> {
        let mut out = Vec::new();
        self.collect_literals(&mut out);
        out
    }

    fn collect_literals<'a>(&'a self, out: &mut Vec<(BaseType, &'a str)>) {
        match self {
            Expr::Variable(_) | Expr::TestVariables(_) => {}
            Expr::BaseValue { base_type, value } => out.push((*base_type, value)),
            Expr::Match(a, b)
            | Expr::Member(a, b)
            | Expr::Gte(a, b)
            | Expr::Lte(a, b) => {
                a.collect_literals(out);
                b.collect_literals(out);
            }
            Expr::Not(inner) => inner.collect_literals(out),
            Expr::And(items) | Expr::Or(items) | Expr::Multiple(items) | Expr::Sum(items) => {
                for item in items {
                    item.collect_literals(out);
                }
            }
        }
    }
}

/// Assigns an expression's value to an outcome variable.
#[derive(Debug, Clone, PartialEq)]
pub struct SetOutcomeValue {
    pub identifier: String,
    pub value: Expr,
}

impl SetOutcomeValue {
    pub fn new(identifier: &str, value: Expr) -> Self {
        Self {
            identifier: identifier.to_string(),
            value,
        }
    }
}

/// A guarded list of actions.
#[derive(Debug, Clone, PartialEq)]
pub struct Branch {
    pub condition: Expr,
    pub actions: Vec<SetOutcomeValue>,
}

/// if / else-if / else.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseCondition {
    pub if_branch: Branch,
    pub else_ifs: Vec<Branch>,
    pub otherwise: Option<Vec<SetOutcomeValue>>,
}

impl ResponseCondition {
    /// The `if` branch followed by every `else-if` branch.
    pub fn branches(&self) -> impl Iterator<Item = &Branch> {
        std::iter::once(&self.if_branch).chain(self.else_ifs.iter())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ResponseRule {
    Condition(ResponseCondition),
    SetOutcome(SetOutcomeValue),
}

/// The scoring tree of one item: rules executed in order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResponseProcessing {
    pub rules: Vec<ResponseRule>,
}

impl ResponseProcessing {
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// All actions of the tree, across every branch.
    pub fn actions(&self) -> Vec<&SetOutcomeValue> {
        let mut out = Vec::new();
        for rule in &self.rules {
            match rule {
                ResponseRule::SetOutcome(set) => out.push(set),
                ResponseRule::Condition(cond) => {
                    for branch in cond.branches() {
                        out.extend(branch.actions.iter());
                    }
                    if let Some(otherwise) = &cond.otherwise {
                        out.extend(otherwise.iter());
                    }
                }
            }
        }
        out
    }

    /// Feedback marker identifiers the tree can assign.
    pub fn feedback_markers(&self) -> BTreeSet<String> {
        self.actions()
            .into_iter()
            .filter(|a| a.identifier == FEEDBACK)
            .flat_map(|a| a.value.literals())
            .filter(|(t, _)| *t == BaseType::Identifier)
            .map(|(_, v)| v.to_string())
            .collect()
    }
}

/// Canonical text form of a float literal.
pub fn format_float(value: f64) -> String {
    format!("{value}")
}

// ---------------------------------------------------------------------------
// Evaluation
// ---------------------------------------------------------------------------

/// A single runtime value.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Identifier(String),
    Str(String),
    Float(f64),
    Boolean(bool),
    File(String),
    Pair(String, String),
}

/// A runtime variable value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Single(Scalar),
    Multiple(Vec<Scalar>),
}

impl Value {
    pub fn identifier(v: &str) -> Self {
        Value::Single(Scalar::Identifier(v.to_string()))
    }

    pub fn identifiers<'a>(vs: impl IntoIterator<Item = &'a str>) -> Self {
        Value::Multiple(
            vs.into_iter()
                .map(|v| Scalar::Identifier(v.to_string()))
                .collect(),
        )
    }

    pub fn string(v: &str) -> Self {
        Value::Single(Scalar::Str(v.to_string()))
    }

    pub fn float(v: f64) -> Self {
        Value::Single(Scalar::Float(v))
    }

    pub fn pairs<'a>(vs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        Value::Multiple(
            vs.into_iter()
                .map(|(a, b)| Scalar::Pair(a.to_string(), b.to_string()))
                .collect(),
        )
    }

    /// Parse a literal of the given base type. Unparseable numbers yield NULL.
    pub fn parse(base_type: BaseType, text: &str) -> Self {
        let scalar = match base_type {
            BaseType::Identifier => Scalar::Identifier(text.to_string()),
            BaseType::String => Scalar::Str(text.to_string()),
            BaseType::File => Scalar::File(text.to_string()),
            BaseType::Float => match text.trim().parse::<f64>() {
                Ok(v) => Scalar::Float(v),
                Err(_) => return Value::Null,
            },
            BaseType::Boolean => Scalar::Boolean(text.trim() == "true"),
            BaseType::DirectedPair => {
                let mut parts = text.split_whitespace();
                match (parts.next(), parts.next(), parts.next()) {
                    (Some(a), Some(b), None) => Scalar::Pair(a.to_string(), b.to_string()),
                    _ => return Value::Null,
                }
            }
        };
        Value::Single(scalar)
    }

    fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Single(Scalar::Boolean(b)) => Some(*b),
            _ => None,
        }
    }

    fn as_float(&self) -> Option<f64> {
        match self {
            Value::Single(Scalar::Float(v)) => Some(*v),
            _ => None,
        }
    }

    fn into_scalars(self) -> Vec<Scalar> {
        match self {
            Value::Null => Vec::new(),
            Value::Single(s) => vec![s],
            Value::Multiple(v) => v,
        }
    }
}

/// Outcome values after response processing.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcomes {
    pub score: f64,
    pub feedback: BTreeSet<String>,
}

/// Run a scoring tree against a submitted response.
pub fn evaluate(processing: &ResponseProcessing, response: Value) -> Outcomes {
    let mut env: HashMap<String, Value> = HashMap::new();
    env.insert(RESPONSE.into(), response);
    env.insert(SCORE.into(), Value::float(0.0));
    env.insert(FEEDBACK.into(), Value::Null);

    for rule in &processing.rules {
        match rule {
            ResponseRule::SetOutcome(set) => apply(&mut env, std::slice::from_ref(set)),
            ResponseRule::Condition(cond) => {
                let taken = cond
                    .branches()
                    .find(|b| eval(&b.condition, &env).as_bool() == Some(true));
                match (taken, &cond.otherwise) {
                    (Some(branch), _) => apply(&mut env, &branch.actions),
                    (None, Some(otherwise)) => apply(&mut env, otherwise),
                    (None, None) => {}
                }
            }
        }
    }

    let score = env.get(SCORE).and_then(Value::as_float).unwrap_or(0.0);
    let feedback = env
        .remove(FEEDBACK)
        .map(Value::into_scalars)
        .unwrap_or_default()
        .into_iter()
        .filter_map(|s| match s {
            Scalar::Identifier(id) => Some(id),
            _ => None,
        })
        .collect();

    Outcomes { score, feedback }
}

fn apply(env: &mut HashMap<String, Value>, actions: &[SetOutcomeValue]) {
    for action in actions {
        let value = eval(&action.value, env);
        env.insert(action.identifier.clone(), value);
    }
}

fn eval(expr: &Expr, env: &HashMap<String, Value>) -> Value {
    let boolean = |b: bool| Value::Single(Scalar::Boolean(b));
    match expr {
        Expr::Variable(id) => env.get(id).cloned().unwrap_or(Value::Null),
        Expr::TestVariables(_) => Value::Null,
        Expr::BaseValue { base_type, value } => Value::parse(*base_type, value),
        Expr::Match(a, b) => match (eval(a, env), eval(b, env)) {
            (Value::Null, _) | (_, Value::Null) => Value::Null,
            (Value::Single(x), Value::Single(y)) => boolean(x == y),
            (Value::Multiple(x), Value::Multiple(y)) => boolean(same_members(&x, &y)),
            _ => boolean(false),
        },
        Expr::Member(v, c) => match (eval(v, env), eval(c, env)) {
            (Value::Null, _) | (_, Value::Null) => Value::Null,
            (Value::Single(x), container) => boolean(container.into_scalars().contains(&x)),
            _ => Value::Null,
        },
        Expr::And(items) => {
            let values: Vec<Option<bool>> = items.iter().map(|e| eval(e, env).as_bool()).collect();
            if values.contains(&Some(false)) {
                boolean(false)
            } else if values.contains(&None) {
                Value::Null
            } else {
                boolean(true)
            }
        }
        Expr::Or(items) => {
            let values: Vec<Option<bool>> = items.iter().map(|e| eval(e, env).as_bool()).collect();
            if values.contains(&Some(true)) {
                boolean(true)
            } else if values.contains(&None) {
                Value::Null
            } else {
                boolean(false)
            }
        }
        Expr::Not(inner) => match eval(inner, env).as_bool() {
            Some(b) => boolean(!b),
            None => Value::Null,
        },
        Expr::Gte(a, b) => compare(eval(a, env), eval(b, env), |x, y| x >= y),
        Expr::Lte(a, b) => compare(eval(a, env), eval(b, env), |x, y| x <= y),
        Expr::Multiple(items) => {
            let scalars: Vec<Scalar> = items
                .iter()
                .flat_map(|e| eval(e, env).into_scalars())
                .collect();
            if scalars.is_empty() {
                Value::Null
            } else {
                Value::Multiple(scalars)
            }
        }
        Expr::Sum(items) => {
            let mut total = 0.0;
            for item in items {
                match eval(item, env).as_float() {
                    Some(v) => total += v,
                    None => return Value::Null,
                }
            }
            Value::float(total)
        }
    }
}

fn compare(a: Value, b: Value, op: impl Fn(f64, f64) -> bool) -> Value {
    match (a.as_float(), b.as_float()) {
        (Some(x), Some(y)) => Value::Single(Scalar::Boolean(op(x, y))),
        _ => Value::Null,
    }
}

fn same_members(a: &[Scalar], b: &[Scalar]) -> bool {
    a.len() == b.len() && a.iter().all(|x| b.contains(x)) && b.iter().all(|y| a.contains(y))
}
