//! Generation results and the narrative adapter
//!
//! A generation collaborator runs two tasks per symbol (performance review,
//! then recommendation) and reports them either as a typed [`CrewOutput`]
//! or as a loose JSON mapping. [`Narratives::try_from`] is the only place
//! that knows about both shapes.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::SymbolError;

const TASKS_OUTPUT_KEY: &str = "tasks_output";
const RAW_KEY: &str = "raw";

/// Output of one generation task
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskOutput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub raw: String,
}

impl TaskOutput {
    pub fn new(raw: impl Into<String>) -> Self {
        Self {
            name: None,
            raw: raw.into(),
        }
    }
}

/// Typed result of a generation run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrewOutput {
    /// Final answer of the run (usually the last task's text)
    #[serde(default)]
    pub raw: String,
    #[serde(default)]
    pub tasks_output: Vec<TaskOutput>,
}

impl CrewOutput {
    pub fn from_tasks(tasks: impl IntoIterator<Item = TaskOutput>) -> Self {
        let tasks_output: Vec<TaskOutput> = tasks.into_iter().collect();
        let raw = tasks_output
            .last()
            .map(|t| t.raw.clone())
            .unwrap_or_default();
        Self { raw, tasks_output }
    }

    /// Mapping form of this output
    pub fn model_dump(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

/// What a generation collaborator returns, in either supported shape
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationResult {
    /// Typed output exposing `tasks_output` directly
    Output(CrewOutput),
    /// Key-based mapping, e.g. a decoded JSON response body
    Mapping(Value),
}

impl From<CrewOutput> for GenerationResult {
    fn from(output: CrewOutput) -> Self {
        Self::Output(output)
    }
}

impl From<Value> for GenerationResult {
    fn from(value: Value) -> Self {
        Self::Mapping(value)
    }
}

/// The two narratives produced for one symbol
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Narratives {
    pub performance: String,
    pub recommendation: String,
}

impl TryFrom<GenerationResult> for Narratives {
    type Error = SymbolError;

    fn try_from(result: GenerationResult) -> Result<Self, Self::Error> {
        let texts: Vec<String> = match result {
            GenerationResult::Output(output) => {
                output.tasks_output.into_iter().map(|t| t.raw).collect()
            }
            GenerationResult::Mapping(value) => mapping_texts(value)?,
        };

        if texts.len() < 2 {
            return Err(SymbolError::ShapeMismatch {
                reason: format!("expected 2 task outputs, found {}", texts.len()),
            });
        }

        let mut texts = texts.into_iter();
        Ok(Self {
            performance: texts.next().unwrap_or_default(),
            recommendation: texts.next().unwrap_or_default(),
        })
    }
}

fn mapping_texts(value: Value) -> Result<Vec<String>, SymbolError> {
    let Value::Object(mut map) = value else {
        return Err(SymbolError::ShapeMismatch {
            reason: format!("unrecognized result type: {}", json_type(&value)),
        });
    };

    match map.remove(TASKS_OUTPUT_KEY) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(tasks)) => Ok(tasks.into_iter().map(task_text).collect()),
        Some(other) => Err(SymbolError::ShapeMismatch {
            reason: format!("'{TASKS_OUTPUT_KEY}' is {}, not a list", json_type(&other)),
        }),
    }
}

/// Text of one task entry; entries without a `raw` string read as empty
fn task_text(task: Value) -> String {
    match task {
        Value::String(text) => text,
        Value::Object(mut fields) => match fields.remove(RAW_KEY) {
            Some(Value::String(text)) => text,
            _ => String::new(),
        },
        _ => String::new(),
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_typed_output() {
        let output = CrewOutput::from_tasks([
            TaskOutput::new("Price is 10 USD"),
            TaskOutput::new("Hold"),
            TaskOutput::new("extra"),
        ]);
        assert_eq!(output.raw, "extra");

        let narratives = Narratives::try_from(GenerationResult::from(output)).unwrap();
        assert_eq!(narratives.performance, "Price is 10 USD");
        assert_eq!(narratives.recommendation, "Hold");
    }

    #[test]
    fn test_mapping_output() {
        let value = json!({
            "raw": "final",
            "tasks_output": [
                {"raw": "Performance text", "agent": "analyst"},
                {"raw": "Buy"}
            ]
        });

        let narratives = Narratives::try_from(GenerationResult::from(value)).unwrap();
        assert_eq!(narratives.performance, "Performance text");
        assert_eq!(narratives.recommendation, "Buy");
    }

    #[test]
    fn test_both_shapes_normalize_identically() {
        let output = CrewOutput::from_tasks([TaskOutput::new("a"), TaskOutput::new("b")]);
        let from_typed = Narratives::try_from(GenerationResult::Output(output.clone())).unwrap();
        let from_dump = Narratives::try_from(GenerationResult::Mapping(output.model_dump())).unwrap();
        assert_eq!(from_typed, from_dump);
    }

    #[test]
    fn test_single_output_is_shape_mismatch() {
        let output = CrewOutput::from_tasks([TaskOutput::new("only one")]);
        let err = Narratives::try_from(GenerationResult::from(output)).unwrap_err();
        assert!(matches!(err, SymbolError::ShapeMismatch { .. }));
        assert!(err.to_string().contains("found 1"));
    }

    #[test]
    fn test_unrecognized_mapping_shapes() {
        for value in [
            json!("just text"),
            json!([1, 2]),
            json!(null),
            json!({"tasks_output": "nope"}),
            json!({"something_else": []}),
        ] {
            let result = Narratives::try_from(GenerationResult::Mapping(value.clone()));
            assert!(
                matches!(result, Err(SymbolError::ShapeMismatch { .. })),
                "{value} should be rejected"
            );
        }
    }

    #[test]
    fn test_entries_without_raw_read_as_empty() {
        let value = json!({"tasks_output": ["plain text", {"summary": "no raw"}]});
        let narratives = Narratives::try_from(GenerationResult::Mapping(value)).unwrap();
        assert_eq!(narratives.performance, "plain text");
        assert_eq!(narratives.recommendation, "");
    }
}
