//! Text templates with `{name}` placeholders

use super::error::PromptError;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Variable(String),
}

/// Ordered name → value bindings for rendering templates
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PromptValues {
    values: Vec<(String, String)>,
}

impl PromptValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind (or rebind) a variable
    pub fn set(mut self, name: impl Into<String>, value: impl fmt::Display) -> Self {
        self.insert(name, value);
        self
    }

    /// Bind (or rebind) a variable in place
    pub fn insert(&mut self, name: impl Into<String>, value: impl fmt::Display) {
        let name = name.into();
        let value = value.to_string();
        match self.values.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.values.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: Into<String>, V: fmt::Display> FromIterator<(K, V)> for PromptValues {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut values = PromptValues::new();
        for (k, v) in iter {
            values.insert(k, v);
        }
        values
    }
}

/// A text template. `{name}` is a placeholder, `{{` and `}}` are literal braces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    source: String,
    segments: Vec<Segment>,
}

impl PromptTemplate {
    /// Parse a template
    pub fn new(source: impl Into<String>) -> Result<Self, PromptError> {
        let source = source.into();
        let segments = parse(&source)?;
        Ok(Self { source, segments })
    }

    /// A template rendered verbatim, braces included
    pub fn literal(text: impl Into<String>) -> Self {
        let source = text.into();
        let segments = if source.is_empty() {
            Vec::new()
        } else {
            vec![Segment::Literal(source.clone())]
        };
        Self { source, segments }
    }

    /// A template that is exactly one placeholder
    pub fn variable(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            source: format!("{{{}}}", name),
            segments: vec![Segment::Variable(name)],
        }
    }

    /// The raw template text
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Placeholder names in first-seen order, without duplicates
    pub fn input_variables(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for segment in &self.segments {
            if let Segment::Variable(name) = segment {
                if !names.contains(&name.as_str()) {
                    names.push(name);
                }
            }
        }
        names
    }

    /// Render the template. Every placeholder must have a value; extra
    /// values are ignored.
    pub fn format(&self, values: &PromptValues) -> Result<String, PromptError> {
        let mut out = String::with_capacity(self.source.len());
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Variable(name) => {
                    let value = values.get(name).ok_or_else(|| PromptError::MissingVariable {
                        name: name.clone(),
                    })?;
                    out.push_str(value);
                }
            }
        }
        Ok(out)
    }
}

fn parse(source: &str) -> Result<Vec<Segment>, PromptError> {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut chars = source.char_indices().peekable();

    while let Some((position, c)) = chars.next() {
        match c {
            '{' if chars.peek().map(|(_, n)| *n) == Some('{') => {
                chars.next();
                literal.push('{');
            }
            '}' if chars.peek().map(|(_, n)| *n) == Some('}') => {
                chars.next();
                literal.push('}');
            }
            '{' => {
                let mut name = String::new();
                let mut closed = false;
                for (_, n) in chars.by_ref() {
                    if n == '}' {
                        closed = true;
                        break;
                    }
                    name.push(n);
                }
                if !closed {
                    return Err(PromptError::UnbalancedBrace { position });
                }
                let name = name.trim();
                if name.is_empty() || !name.chars().all(|ch| ch.is_alphanumeric() || ch == '_') {
                    return Err(PromptError::InvalidPlaceholder {
                        placeholder: name.to_string(),
                    });
                }
                if !literal.is_empty() {
                    segments.push(Segment::Literal(std::mem::take(&mut literal)));
                }
                segments.push(Segment::Variable(name.to_string()));
            }
            '}' => return Err(PromptError::UnbalancedBrace { position }),
            other => literal.push(other),
        }
    }

    if !literal.is_empty() {
        segments.push(Segment::Literal(literal));
    }
    Ok(segments)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_format_with_placeholders() {
        let template =
            PromptTemplate::new("Translate ```{text}``` into a style that is {style}.").unwrap();
        assert_eq!(template.input_variables(), vec!["text", "style"]);

        let values = PromptValues::new()
            .set("style", "a polite pirate")
            .set("text", "Tough luck!");
        assert_eq!(
            template.format(&values).unwrap(),
            "Translate ```Tough luck!``` into a style that is a polite pirate."
        );
    }

    #[test]
    fn test_escaped_braces_and_repeats() {
        let template = PromptTemplate::new(r#"{{"answer": "{x}"}} / {x}"#).unwrap();
        assert_eq!(template.input_variables(), vec!["x"]);
        let out = template.format(&PromptValues::new().set("x", 1)).unwrap();
        assert_eq!(out, r#"{"answer": "1"} / 1"#);
    }

    #[test]
    fn test_missing_variable() {
        let template = PromptTemplate::new("Hello {name}").unwrap();
        let err = template.format(&PromptValues::new()).unwrap_err();
        assert_eq!(err, PromptError::MissingVariable { name: "name".into() });
    }

    #[test]
    fn test_malformed_templates() {
        assert_eq!(
            PromptTemplate::new("oops {name").unwrap_err(),
            PromptError::UnbalancedBrace { position: 5 }
        );
        assert_eq!(
            PromptTemplate::new("oops }").unwrap_err(),
            PromptError::UnbalancedBrace { position: 5 }
        );
        assert!(matches!(
            PromptTemplate::new("{not valid}").unwrap_err(),
            PromptError::InvalidPlaceholder { .. }
        ));
    }

    #[test]
    fn test_literal_keeps_braces() {
        let template = PromptTemplate::literal("Reply as {\"a\": 1}");
        assert!(template.input_variables().is_empty());
        assert_eq!(template.format(&PromptValues::new()).unwrap(), "Reply as {\"a\": 1}");
    }

    #[test]
    fn test_values_rebind() {
        let values = PromptValues::new().set("a", "1").set("a", "2");
        assert_eq!(values.len(), 1);
        assert_eq!(values.get("a"), Some("2"));
    }

    proptest! {
        #[test]
        fn brace_free_text_renders_unchanged(text in "[^{}]*") {
            let template = PromptTemplate::new(text.clone()).unwrap();
            prop_assert!(template.input_variables().is_empty());
            prop_assert_eq!(template.format(&PromptValues::new()).unwrap(), text);
        }
    }
}
