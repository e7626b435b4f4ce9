//! Result records produced from a model reply.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{CoreError, CoreResult};

/// One answer emitted by the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRecord {
    /// The expression, variable name, or drawing explanation.
    pub expr: String,
    /// The computed value or concept label, in the type the model emitted.
    pub result: Value,
    /// Whether this record binds `expr` as a variable.
    #[serde(default)]
    pub assign: bool,
}

impl ResultRecord {
    /// Create a record.
    #[must_use]
    pub fn new(expr: impl Into<String>, result: impl Into<Value>, assign: bool) -> Self {
        Self {
            expr: expr.into(),
            result: result.into(),
            assign,
        }
    }

    /// Validate one parsed element of a reply.
    ///
    /// `assign` is `true` only for the literal boolean `true`; anything else,
    /// including a missing key or the string `"true"`, is `false`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Schema`] if the element is not an object or lacks
    /// `expr` or `result`.
    pub fn from_value(value: &Value) -> CoreResult<Self> {
        let Value::Object(fields) = value else {
            return Err(CoreError::Schema(format!("expected an object, got {value}")));
        };

        let expr = match fields.get("expr") {
            Some(Value::String(text)) => text.clone(),
            Some(other) => other.to_string(),
            None => return Err(CoreError::Schema("record is missing \"expr\"".to_string())),
        };
        let result = fields
            .get("result")
            .cloned()
            .ok_or_else(|| CoreError::Schema("record is missing \"result\"".to_string()))?;
        let assign = matches!(fields.get("assign"), Some(Value::Bool(true)));

        Ok(Self {
            expr,
            result,
            assign,
        })
    }

    /// The result as display text.
    ///
    /// Strings are shown verbatim, everything else as its JSON text.
    #[must_use]
    pub fn result_text(&self) -> String {
        match &self.result {
            Value::String(text) => text.clone(),
            other => other.to_string(),
        }
    }
}

/// Records in the order the model emitted them.
///
/// Empty means nothing usable was found.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResultCollection(Vec<ResultRecord>);

impl ResultCollection {
    /// An empty collection.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Validate a parsed reply document.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Schema`] if the document is not an array or any
    /// element fails [`ResultRecord::from_value`].
    pub fn from_value(value: &Value) -> CoreResult<Self> {
        let Value::Array(items) = value else {
            return Err(CoreError::Schema(format!(
                "expected an array of records, got {}",
                kind_name(value)
            )));
        };
        items
            .iter()
            .map(ResultRecord::from_value)
            .collect::<CoreResult<Vec<_>>>()
            .map(Self)
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether nothing usable was found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over the records.
    pub fn iter(&self) -> std::slice::Iter<'_, ResultRecord> {
        self.0.iter()
    }

    /// Records that bind a variable.
    pub fn assignments(&self) -> impl Iterator<Item = &ResultRecord> {
        self.0.iter().filter(|record| record.assign)
    }

    /// Borrow the records as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[ResultRecord] {
        &self.0
    }
}

impl From<Vec<ResultRecord>> for ResultCollection {
    fn from(records: Vec<ResultRecord>) -> Self {
        Self(records)
    }
}

impl IntoIterator for ResultCollection {
    type Item = ResultRecord;
    type IntoIter = std::vec::IntoIter<ResultRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a ResultCollection {
    type Item = &'a ResultRecord;
    type IntoIter = std::slice::Iter<'a, ResultRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn assign_defaults_to_false() {
        let record = ResultRecord::from_value(&json!({"expr": "2+2", "result": 4})).expect("ok");
        assert!(!record.assign);
    }

    #[test]
    fn only_literal_true_assigns() {
        let yes = json!({"expr": "x", "result": 2, "assign": true});
        let text = json!({"expr": "x", "result": 2, "assign": "true"});
        let one = json!({"expr": "x", "result": 2, "assign": 1});
        assert!(ResultRecord::from_value(&yes).expect("ok").assign);
        assert!(!ResultRecord::from_value(&text).expect("ok").assign);
        assert!(!ResultRecord::from_value(&one).expect("ok").assign);
    }

    #[test]
    fn missing_fields_are_schema_errors() {
        assert!(ResultRecord::from_value(&json!({"result": 1})).is_err());
        assert!(ResultRecord::from_value(&json!({"expr": "1"})).is_err());
        assert!(ResultRecord::from_value(&json!([1, 2])).is_err());
    }

    #[test]
    fn non_string_expr_is_rendered() {
        let record = ResultRecord::from_value(&json!({"expr": 12, "result": "twelve"})).expect("ok");
        assert_eq!(record.expr, "12");
    }

    #[test]
    fn result_text_coerces_values() {
        assert_eq!(ResultRecord::new("a", 4, false).result_text(), "4");
        assert_eq!(ResultRecord::new("a", 2.5, false).result_text(), "2.5");
        assert_eq!(ResultRecord::new("a", "love", false).result_text(), "love");
        assert_eq!(ResultRecord::new("a", true, false).result_text(), "true");
    }

    #[test]
    fn collection_requires_array() {
        assert!(ResultCollection::from_value(&json!({"expr": "x", "result": 1})).is_err());
        let collection = ResultCollection::from_value(&json!([])).expect("empty ok");
        assert!(collection.is_empty());
    }

    #[test]
    fn assignments_filters_bindings() {
        let collection = ResultCollection::from(vec![
            ResultRecord::new("x", 2, true),
            ResultRecord::new("2+2", 4, false),
            ResultRecord::new("y", 5, true),
        ]);
        let names: Vec<_> = collection.assignments().map(|r| r.expr.as_str()).collect();
        assert_eq!(names, ["x", "y"]);
    }
}
