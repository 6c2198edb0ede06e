use super::ExtractError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Expected JSON type of an extracted field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldKind {
    Boolean,
    /// An integer; `sentinel` is the value meaning "unknown".
    ///
    /// A negative sentinel marks the field as a count: other negative
    /// values are rejected.
    Integer { sentinel: Option<i64> },
    /// A JSON array of strings
    TextList,
    Text,
}

impl FieldKind {
    fn type_name(&self) -> &'static str {
        match self {
            FieldKind::Boolean => "boolean",
            FieldKind::Integer { .. } => "integer",
            FieldKind::TextList => "array of strings",
            FieldKind::Text => "string",
        }
    }

    fn accepts(&self, value: &Value) -> bool {
        match self {
            FieldKind::Boolean => value.is_boolean(),
            FieldKind::Integer { sentinel } => match (value.as_i64(), sentinel) {
                (Some(n), Some(s)) if *s < 0 => n >= 0 || n == *s,
                (Some(_), _) => true,
                (None, _) => value.is_u64(),
            },
            FieldKind::TextList => value
                .as_array()
                .is_some_and(|items| items.iter().all(Value::is_string)),
            FieldKind::Text => value.is_string(),
        }
    }
}

/// One field to extract
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    pub instruction: String,
    pub kind: FieldKind,
}

/// The fields to pull out of a document, in order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionSchema {
    fields: Vec<FieldSpec>,
}

impl ExtractionSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field; a field with the same name is replaced
    pub fn field(mut self, name: impl Into<String>, kind: FieldKind, instruction: impl Into<String>) -> Self {
        let spec = FieldSpec {
            name: name.into(),
            instruction: instruction.into(),
            kind,
        };
        match self.fields.iter_mut().find(|f| f.name == spec.name) {
            Some(existing) => *existing = spec,
            None => self.fields.push(spec),
        }
        self
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn keys(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }

    /// Field → instruction listing, as embedded in the prompt
    pub fn describe(&self) -> String {
        self.fields
            .iter()
            .map(|f| format!("{}: {}", f.name, f.instruction))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Type requirements for each key, as embedded in the prompt
    pub fn format_instructions(&self) -> String {
        let mut out = String::from("Return a JSON object with exactly these keys:\n");
        for f in &self.fields {
            out.push_str(&format!("- \"{}\": {}", f.name, f.kind.type_name()));
            if let FieldKind::Integer { sentinel: Some(sentinel) } = f.kind {
                out.push_str(&format!(" ({} when unknown)", sentinel));
            }
            out.push('\n');
        }
        out
    }

    /// Check `value` against the schema and keep exactly the schema's keys
    pub fn validate(&self, value: Value, raw: &str) -> Result<Map<String, Value>, ExtractError> {
        let malformed = |message: String| ExtractError::MalformedOutput {
            message,
            raw: raw.to_string(),
        };

        let Value::Object(mut object) = value else {
            return Err(malformed("completion is not a JSON object".to_string()));
        };

        let mut record = Map::new();
        for f in &self.fields {
            let value = object
                .remove(&f.name)
                .ok_or_else(|| malformed(format!("missing key '{}'", f.name)))?;
            if !f.kind.accepts(&value) {
                return Err(malformed(format!(
                    "key '{}' should be {}, got {}",
                    f.name,
                    f.kind.type_name(),
                    value
                )));
            }
            record.insert(f.name.clone(), value);
        }
        Ok(record)
    }
}
