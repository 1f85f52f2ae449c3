//! Note persistence. The `UNIQUE` index on `notes.slug` is what keeps slugs
//! unique; callers get `db::Error::UniqueViolation` when they lose a race.

use rusqlite::{named_params, params, OptionalExtension, Row};
use uuid::Uuid;

use crate::{
    db::{self, DB},
    users::UserId,
};

use super::{NewNote, Note, NoteChanges};

const NOTE_COLUMNS: &str = "id, title, text, slug, author, created_at, updated_at";

impl<'a> TryFrom<&Row<'a>> for Note {
    type Error = rusqlite::Error;

    fn try_from(row: &Row<'a>) -> std::result::Result<Self, Self::Error> {
        Ok(Self {
            id: row.get(0)?,
            title: row.get(1)?,
            text: row.get(2)?,
            slug: row.get(3)?,
            author: row.get(4)?,
            created_at: row.get(5)?,
            updated_at: row.get(6)?,
        })
    }
}

pub async fn insert(db: &DB, note: NewNote) -> db::Result<Note> {
    db.call(move |conn| {
        conn.query_row(
            &format!(
                "INSERT INTO notes (title, text, slug, author) VALUES (:title, :text, :slug, :author) RETURNING {NOTE_COLUMNS}"
            ),
            named_params! {
                ":title": note.title,
                ":text": note.text,
                ":slug": note.slug,
                ":author": note.author,
            },
            |row| Note::try_from(row),
        )
        .map_err(|e| e.into())
    })
    .await
    .map_err(db::Error::from)
}

/// Notes of one author, oldest first.
pub async fn find_by_author(db: &DB, author: UserId) -> db::Result<Vec<Note>> {
    db.call(move |conn| {
        let notes = conn
            .prepare(&format!("SELECT {NOTE_COLUMNS} FROM notes WHERE author = ? ORDER BY rowid"))?
            .query_map(params![author], |row| Note::try_from(row))?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(notes)
    })
    .await
    .map_err(db::Error::from)
}

pub async fn find_by_slug(db: &DB, slug: &str) -> db::Result<Note> {
    let slug = slug.to_owned();
    db.call(move |conn| {
        conn.query_row(
            &format!("SELECT {NOTE_COLUMNS} FROM notes WHERE slug = ?"),
            params![slug],
            |row| Note::try_from(row),
        )
        .map_err(|e| e.into())
    })
    .await
    .map_err(db::Error::from)
    .map_err(|e| e.not_found_message("Note not found"))
}

/// Whether any note other than `except` already uses `slug`.
pub async fn slug_exists(db: &DB, slug: &str, except: Option<Uuid>) -> db::Result<bool> {
    let slug = slug.to_owned();
    db.call(move |conn| {
        let found = conn
            .query_row(
                "SELECT id FROM notes WHERE slug = ? AND (? IS NULL OR id != ?)",
                params![slug, except, except],
                |row| row.get::<_, Uuid>(0),
            )
            .optional()?;
        Ok(found.is_some())
    })
    .await
    .map_err(db::Error::from)
}

pub async fn update(db: &DB, note_id: Uuid, changes: NoteChanges) -> db::Result<Note> {
    db.call(move |conn| {
        conn.query_row(
            &format!(
                r#"UPDATE notes SET title = :title, text = :text, slug = :slug, updated_at = :updated_at
                WHERE id = :id
                RETURNING {NOTE_COLUMNS}"#
            ),
            named_params! {
                ":title": changes.title,
                ":text": changes.text,
                ":slug": changes.slug,
                ":updated_at": chrono::Utc::now(),
                ":id": note_id,
            },
            |row| Note::try_from(row),
        )
        .map_err(|e| e.into())
    })
    .await
    .map_err(db::Error::from)
    .map_err(|e| e.not_found_message("Note not found"))
}

pub async fn delete(db: &DB, note_id: Uuid) -> db::Result<Note> {
    db.call(move |conn| {
        conn.query_row(
            &format!("DELETE FROM notes WHERE id = ? RETURNING {NOTE_COLUMNS}"),
            params![note_id],
            |row| Note::try_from(row),
        )
        .map_err(|e| e.into())
    })
    .await
    .map_err(db::Error::from)
    .map_err(|e| e.not_found_message("Note not found"))
}
