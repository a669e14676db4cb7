//! Module: filter
//! Responsibility: the filter predicate tree attached to a datasource, its
//! parameter binding, and the structural "does this deny everything" checks.
//! Does not own: predicate execution (the load service evaluates filters).


use crate::{model::PropertyPath, value::Value};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Named query parameters supplied to `refresh_with`.
pub type Params = BTreeMap<String, Value>;

///
/// CompareOp
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Lte,
    Gt,
    Gte,
    Contains,
    StartsWith,
    IsNull,
    NotNull,
}

impl CompareOp {
    /// Unary operators ignore their operand.
    #[must_use]
    pub const fn is_unary(self) -> bool {
        matches!(self, Self::IsNull | Self::NotNull)
    }
}

///
/// Operand
///
/// Right-hand side of a leaf comparison: a literal, or a named parameter
/// resolved at refresh time.
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub enum Operand {
    Literal(Value),
    Param(String),
}

///
/// Condition
///
/// Composite filter condition. `Deny` is the "always deny" leaf: a filter
/// that can match nothing, letting the datasource skip the backend.
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub enum Condition {
    And(Vec<Self>),
    Or(Vec<Self>),
    Compare {
        property: PropertyPath,
        op: CompareOp,
        operand: Operand,
    },
    Deny,
}

impl Condition {
    ///
    /// CONSTRUCTORS
    ///

    #[must_use]
    pub fn compare(property: impl Into<PropertyPath>, op: CompareOp, value: impl Into<Value>) -> Self {
        Self::Compare {
            property: property.into(),
            op,
            operand: Operand::Literal(value.into()),
        }
    }

    #[must_use]
    pub fn equals(property: impl Into<PropertyPath>, value: impl Into<Value>) -> Self {
        Self::compare(property, CompareOp::Eq, value)
    }

    /// Compare against a named parameter bound at refresh time.
    #[must_use]
    pub fn param(property: impl Into<PropertyPath>, op: CompareOp, name: impl Into<String>) -> Self {
        Self::Compare {
            property: property.into(),
            op,
            operand: Operand::Param(name.into()),
        }
    }

    #[must_use]
    pub fn is_null(property: impl Into<PropertyPath>) -> Self {
        Self::compare(property, CompareOp::IsNull, Value::Null)
    }

    ///
    /// INSPECTION
    ///

    /// Recursive denial check over a (bound) tree.
    ///
    /// `And` denies when any child denies; `Or` denies when every child does.
    #[must_use]
    pub fn denies_all(&self) -> bool {
        match self {
            Self::Deny => true,
            Self::And(children) => children.iter().any(Self::denies_all),
            Self::Or(children) => !children.is_empty() && children.iter().all(Self::denies_all),
            Self::Compare { .. } => false,
        }
    }

    /// Parameter names referenced anywhere in the tree.
    #[must_use]
    pub fn parameters(&self) -> BTreeSet<String> {
        let mut names = BTreeSet::new();
        self.collect_parameters(&mut names);

        names
    }

    fn collect_parameters(&self, names: &mut BTreeSet<String>) {
        match self {
            Self::And(children) | Self::Or(children) => {
                for child in children {
                    child.collect_parameters(names);
                }
            }
            Self::Compare {
                operand: Operand::Param(name),
                ..
            } => {
                names.insert(name.clone());
            }
            Self::Compare { .. } | Self::Deny => {}
        }
    }

    ///
    /// BINDING
    ///

    /// Substitute parameters, dropping leaves whose parameter is absent.
    ///
    /// Groups left without children disappear; single-child groups collapse
    /// into their child. Returns `None` when nothing is left to filter on.
    #[must_use]
    pub fn bind(&self, params: &Params) -> Option<Self> {
        match self {
            Self::Deny => Some(Self::Deny),
            Self::Compare {
                property,
                op,
                operand,
            } => {
                let operand = match operand {
                    Operand::Literal(value) => Operand::Literal(value.clone()),
                    Operand::Param(_) if op.is_unary() => Operand::Literal(Value::Null),
                    Operand::Param(name) => Operand::Literal(params.get(name)?.clone()),
                };

                Some(Self::Compare {
                    property: property.clone(),
                    op: *op,
                    operand,
                })
            }
            Self::And(children) => Self::bind_group(children, params, Self::And),
            Self::Or(children) => Self::bind_group(children, params, Self::Or),
        }
    }

    fn bind_group(
        children: &[Self],
        params: &Params,
        rebuild: impl FnOnce(Vec<Self>) -> Self,
    ) -> Option<Self> {
        let mut bound: Vec<Self> = children.iter().filter_map(|c| c.bind(params)).collect();

        match bound.len() {
            0 => None,
            1 => bound.pop(),
            _ => Some(rebuild(bound)),
        }
    }
}

///
/// Filter
///
/// Filter attached to a datasource. Kept unbound; parameters are applied per
/// load by the query context builder.
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Filter {
    root: Condition,
}

impl Filter {
    #[must_use]
    pub const fn new(root: Condition) -> Self {
        Self { root }
    }

    /// A filter that matches nothing.
    #[must_use]
    pub const fn deny() -> Self {
        Self::new(Condition::Deny)
    }

    #[must_use]
    pub const fn root(&self) -> &Condition {
        &self.root
    }

    /// Structural "needs loading" check on the unbound tree: the root is a
    /// `Deny` leaf, or an `And` with a direct `Deny` child.
    #[must_use]
    pub fn is_denying(&self) -> bool {
        match &self.root {
            Condition::Deny => true,
            Condition::And(children) => children.iter().any(|c| matches!(c, Condition::Deny)),
            _ => false,
        }
    }

    /// Bind parameters into a condition ready to ship with a load request.
    #[must_use]
    pub fn bind(&self, params: &Params) -> Option<Condition> {
        self.root.bind(params)
    }
}

impl From<Condition> for Filter {
    fn from(root: Condition) -> Self {
        Self::new(root)
    }
}
