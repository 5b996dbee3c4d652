//! Scan filters.
//!
//! A [`ScanFilter`] is a conjunction of string comparisons on attribute paths.
//! It renders to a DynamoDB filter expression for the real store and can be
//! evaluated directly against an item for the in-memory store.

use std::collections::HashMap;

use aws_sdk_dynamodb::types::AttributeValue;

use super::Item;

/// Comparison applied by a [`Condition`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonOp {
    Eq,
    Ne,
}

impl ComparisonOp {
    fn as_expression(&self) -> &'static str {
        match self {
            ComparisonOp::Eq => "=",
            ComparisonOp::Ne => "<>",
        }
    }
}

/// A single comparison between the string at `path` and `value`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition {
    /// Attribute names from the top of the item down, e.g. `["Name", "FirstName"]`.
    pub path: Vec<String>,
    pub op: ComparisonOp,
    pub value: String,
}

/// Conditions that must all hold for an item to match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanFilter {
    conditions: Vec<Condition>,
}

/// A rendered filter: the expression plus its placeholder maps.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterExpression {
    pub expression: String,
    pub names: HashMap<String, String>,
    pub values: HashMap<String, AttributeValue>,
}

impl ScanFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `path = value`.
    pub fn eq<P, S>(self, path: P, value: impl Into<String>) -> Self
    where
        P: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.with_condition(path, ComparisonOp::Eq, value)
    }

    /// Adds `path <> value`.
    pub fn ne<P, S>(self, path: P, value: impl Into<String>) -> Self
    where
        P: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.with_condition(path, ComparisonOp::Ne, value)
    }

    fn with_condition<P, S>(mut self, path: P, op: ComparisonOp, value: impl Into<String>) -> Self
    where
        P: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.conditions.push(Condition {
            path: path.into_iter().map(Into::into).collect(),
            op,
            value: value.into(),
        });
        self
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Render as a DynamoDB filter expression.
    ///
    /// Every path segment goes through an expression attribute name so that
    /// reserved words such as `Name` are safe. Identical segments share a
    /// placeholder.
    pub fn to_expression(&self) -> FilterExpression {
        let mut names: HashMap<String, String> = HashMap::new();
        let mut placeholders: HashMap<String, String> = HashMap::new();
        let mut values = HashMap::new();
        let mut clauses = Vec::with_capacity(self.conditions.len());

        for (index, condition) in self.conditions.iter().enumerate() {
            let path = condition
                .path
                .iter()
                .map(|segment| {
                    let next = placeholders.len();
                    placeholders
                        .entry(segment.clone())
                        .or_insert_with(|| {
                            let placeholder = format!("#f{next}");
                            names.insert(placeholder.clone(), segment.clone());
                            placeholder
                        })
                        .clone()
                })
                .collect::<Vec<_>>()
                .join(".");

            let value_placeholder = format!(":v{index}");
            values.insert(
                value_placeholder.clone(),
                AttributeValue::S(condition.value.clone()),
            );
            clauses.push(format!(
                "{path} {} {value_placeholder}",
                condition.op.as_expression()
            ));
        }

        FilterExpression {
            expression: clauses.join(" AND "),
            names,
            values,
        }
    }

    /// Evaluate the filter against an item.
    ///
    /// A condition on a missing or non-string attribute is false for `Eq` and
    /// true for `Ne`.
    pub fn matches(&self, item: &Item) -> bool {
        self.conditions.iter().all(|condition| {
            let actual = lookup_string(item, &condition.path);
            match condition.op {
                ComparisonOp::Eq => actual == Some(condition.value.as_str()),
                ComparisonOp::Ne => actual != Some(condition.value.as_str()),
            }
        })
    }
}

fn lookup_string<'a>(item: &'a Item, path: &[String]) -> Option<&'a str> {
    let (last, parents) = path.split_last()?;
    let mut current = item;
    for segment in parents {
        current = current.get(segment)?.as_m().ok()?;
    }
    current.get(last)?.as_s().ok().map(|s| s.as_str())
}
