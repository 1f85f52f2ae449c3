use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    shared::forms::{empty_string_as_none, FormErrors},
    users::UserId,
};

use super::slug::{is_valid_slug, MAX_SLUG_LENGTH};

pub const MAX_TITLE_LENGTH: usize = 100;

/// Appended to a taken slug in the slug field error.
pub const WARNING: &str = " - этот slug уже существует, придумайте уникальное значение!";

const REQUIRED: &str = "This field is required.";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Note {
    pub id: Uuid,
    pub title: String,
    pub text: String,
    pub slug: String,
    pub author: UserId,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Submitted note fields, shared by the add and edit forms.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NoteForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub text: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub slug: Option<String>,
}

impl NoteForm {
    pub fn validate(&self) -> Result<(), FormErrors> {
        let mut errors = FormErrors::new();

        if self.title.trim().is_empty() {
            errors.add("title", REQUIRED);
        } else if self.title.chars().count() > MAX_TITLE_LENGTH {
            errors.add(
                "title",
                format!("Ensure this value has at most {MAX_TITLE_LENGTH} characters."),
            );
        }

        if self.text.trim().is_empty() {
            errors.add("text", REQUIRED);
        }

        if let Some(slug) = &self.slug {
            if slug.chars().count() > MAX_SLUG_LENGTH {
                errors.add(
                    "slug",
                    format!("Ensure this value has at most {MAX_SLUG_LENGTH} characters."),
                );
            } else if !is_valid_slug(slug) {
                errors.add(
                    "slug",
                    "Enter a valid slug consisting of letters, numbers, underscores or hyphens.",
                );
            }
        }

        errors.into_result()
    }
}

impl From<&Note> for NoteForm {
    fn from(note: &Note) -> Self {
        Self {
            title: note.title.clone(),
            text: note.text.clone(),
            slug: Some(note.slug.clone()),
        }
    }
}

#[derive(Debug)]
pub struct NewNote {
    pub title: String,
    pub text: String,
    pub slug: String,
    pub author: UserId,
}

#[derive(Debug)]
pub struct NoteChanges {
    pub title: String,
    pub text: String,
    pub slug: String,
}

pub fn slug_taken(slug: &str) -> FormErrors {
    FormErrors::new().with("slug", format!("{slug}{WARNING}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(title: &str, text: &str, slug: Option<&str>) -> NoteForm {
        NoteForm {
            title: title.into(),
            text: text.into(),
            slug: slug.map(Into::into),
        }
    }

    #[test]
    fn valid_forms() {
        assert!(form("Title", "Текст заметки", Some("slug")).validate().is_ok());
        assert!(form("Title", "Текст заметки", None).validate().is_ok());
    }

    #[test]
    fn required_fields() {
        let errors = form(" ", "", None).validate().unwrap_err();

        assert_eq!(errors.field("title"), [REQUIRED]);
        assert_eq!(errors.field("text"), [REQUIRED]);
        assert!(errors.field("slug").is_empty());
    }

    #[test]
    fn slug_rules() {
        let errors = form("Title", "text", Some("no spaces")).validate().unwrap_err();
        assert_eq!(errors.field("slug").len(), 1);

        let long = "s".repeat(MAX_SLUG_LENGTH + 1);
        let errors = form("Title", "text", Some(&long)).validate().unwrap_err();
        assert_eq!(errors.field("slug").len(), 1);
    }

    #[test]
    fn padded_slug_is_accepted() {
        let form: NoteForm =
            serde_json::from_value(serde_json::json!({ "title": "Title", "text": "text", "slug": " slug " })).unwrap();

        assert_eq!(form.slug.as_deref(), Some("slug"));
        assert!(form.validate().is_ok());
    }

    #[test]
    fn taken_slug_message() {
        assert_eq!(
            slug_taken("slug").field("slug"),
            ["slug - этот slug уже существует, придумайте уникальное значение!"]
        );
    }
}
