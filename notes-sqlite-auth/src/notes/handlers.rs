//! Ownership and slug rules for notes.
//!
//! Every operation needs a logged in user. Notes of other users are
//! reported as missing, never as forbidden.

use crate::{ctx::BaseParams, db, shared::forms::FormErrors, Error, Result};

use super::{slug::slugify, slug_taken, store, NewNote, Note, NoteChanges, NoteForm};

const SLUG_FROM_TITLE_FAILED: &str = "Could not derive a slug from the title, please provide one.";

fn resolve_slug(form: &NoteForm) -> Result<String> {
    let slug = match &form.slug {
        Some(slug) => slug.clone(),
        None => slugify(&form.title),
    };

    if slug.is_empty() {
        return Err(Error::Validation(FormErrors::new().with("slug", SLUG_FROM_TITLE_FAILED)));
    }
    Ok(slug)
}

fn map_unique_violation(slug: &str) -> impl FnOnce(db::Error) -> Error + '_ {
    move |error| match error {
        db::Error::UniqueViolation(_) => Error::Validation(slug_taken(slug)),
        error => Error::from(error),
    }
}

pub async fn find_notes(BaseParams { db, ctx }: BaseParams) -> Result<Vec<Note>> {
    let user = ctx.require_user()?;

    store::find_by_author(&db, user.id).await.map_err(Error::from)
}

pub async fn create_note(form: NoteForm, BaseParams { db, ctx }: BaseParams) -> Result<Note> {
    let user = ctx.require_user()?;

    form.validate().map_err(Error::Validation)?;
    let slug = resolve_slug(&form)?;

    if store::slug_exists(&db, &slug, None).await? {
        return Err(Error::Validation(slug_taken(&slug)));
    }

    let note = store::insert(
        &db,
        NewNote {
            title: form.title,
            text: form.text,
            slug: slug.clone(),
            author: user.id,
        },
    )
    .await
    .map_err(map_unique_violation(&slug))?;

    tracing::info!("{} created note {}", user.username, note.slug);

    Ok(note)
}

/// The note behind `slug` if the acting user wrote it.
pub async fn get_note(slug: &str, BaseParams { db, ctx }: BaseParams) -> Result<Note> {
    let user = ctx.require_user()?;

    let note = store::find_by_slug(&db, slug).await?;
    if note.author != user.id {
        tracing::debug!("{} asked for note {} of another author", user.username, slug);
        return Err(Error::NotFound("Note not found".into()));
    }

    Ok(note)
}

pub async fn update_note(slug: &str, form: NoteForm, base: BaseParams) -> Result<Note> {
    let note = get_note(slug, base.clone()).await?;

    form.validate().map_err(Error::Validation)?;
    let new_slug = resolve_slug(&form)?;

    if new_slug != note.slug && store::slug_exists(&base.db, &new_slug, Some(note.id)).await? {
        return Err(Error::Validation(slug_taken(&new_slug)));
    }

    let updated = store::update(
        &base.db,
        note.id,
        NoteChanges {
            title: form.title,
            text: form.text,
            slug: new_slug.clone(),
        },
    )
    .await
    .map_err(map_unique_violation(&new_slug))?;

    tracing::info!("note {} updated (now {})", note.slug, updated.slug);

    Ok(updated)
}

pub async fn delete_note(slug: &str, base: BaseParams) -> Result<Note> {
    let note = get_note(slug, base.clone()).await?;

    let deleted = store::delete(&base.db, note.id).await?;

    tracing::info!("note {} deleted", deleted.slug);

    Ok(deleted)
}
