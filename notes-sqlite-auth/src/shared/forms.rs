use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};

/// Field name used for errors that do not belong to a single input.
pub const NON_FIELD_ERRORS: &str = "__all__";

/// Validation messages keyed by form field, in the order they were raised.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(transparent)]
pub struct FormErrors(IndexMap<String, Vec<String>>);

impl FormErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0.entry(field.to_string()).or_default().push(message.into());
    }

    pub fn with(mut self, field: &str, message: impl Into<String>) -> Self {
        self.add(field, message);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn field(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

/// Browsers submit untouched inputs as empty strings. Values come back trimmed.
pub fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Form {
        #[serde(default, deserialize_with = "empty_string_as_none")]
        slug: Option<String>,
    }

    #[test]
    fn blank_inputs_are_none() {
        let form: Form = serde_json::from_str(r#"{"slug": "  "}"#).unwrap();
        assert_eq!(form.slug, None);

        let form: Form = serde_json::from_str(r#"{}"#).unwrap();
        assert_eq!(form.slug, None);

        let form: Form = serde_json::from_str(r#"{"slug": "note"}"#).unwrap();
        assert_eq!(form.slug, Some("note".into()));

        let form: Form = serde_json::from_str(r#"{"slug": " note "}"#).unwrap();
        assert_eq!(form.slug, Some("note".into()));
    }

    #[test]
    fn errors_keep_field_order() {
        let errors = FormErrors::new().with("title", "required").with("slug", "taken").with("title", "too long");

        assert_eq!(errors.field("title"), ["required", "too long"]);
        assert_eq!(errors.field("slug"), ["taken"]);
        assert!(errors.field("text").is_empty());
        assert_eq!(
            serde_json::to_value(&errors).unwrap(),
            serde_json::json!({ "title": ["required", "too long"], "slug": ["taken"] })
        );
    }
}
