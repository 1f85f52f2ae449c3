use axum::{
    extract::Path,
    middleware,
    response::{IntoResponse, Response},
    routing::get,
    Form, Router,
};
use minijinja::context;

use crate::{
    auth,
    ctx::BaseParams,
    state::AppState,
    views::{found, Views},
    Error, Result,
};

use super::{handlers, NoteForm};

pub const SUCCESS_URL: &str = "/done";

async fn home(view: Views) -> impl IntoResponse {
    view.response("home.html", context! {})
}

async fn notes_view(view: Views, base: BaseParams) -> Result<Response> {
    let notes = handlers::find_notes(base).await?;

    Ok(view.response("notes/list.html", context! { notes => notes }))
}

async fn add_view(view: Views) -> impl IntoResponse {
    view.response("notes/form.html", context! { form => NoteForm::default(), action => "/add" })
}

async fn create_note(view: Views, base: BaseParams, Form(form): Form<NoteForm>) -> Result<Response> {
    match handlers::create_note(form.clone(), base).await {
        Ok(_) => Ok(found(SUCCESS_URL)),
        Err(Error::Validation(errors)) => Ok(view.response(
            "notes/form.html",
            context! { form => form, errors => errors, action => "/add" },
        )),
        Err(err) => Err(err),
    }
}

async fn success_view(view: Views) -> impl IntoResponse {
    view.response("notes/success.html", context! {})
}

async fn note_view(Path(slug): Path<String>, view: Views, base: BaseParams) -> Result<Response> {
    let note = handlers::get_note(&slug, base).await?;

    Ok(view.response("notes/detail.html", context! { note => note }))
}

async fn edit_view(Path(slug): Path<String>, view: Views, base: BaseParams) -> Result<Response> {
    let note = handlers::get_note(&slug, base).await?;
    let action = format!("/edit/{}", note.slug);

    Ok(view.response(
        "notes/form.html",
        context! { form => NoteForm::from(&note), note => note, action => action, editing => true },
    ))
}

async fn update_note(
    Path(slug): Path<String>,
    view: Views,
    base: BaseParams,
    Form(form): Form<NoteForm>,
) -> Result<Response> {
    match handlers::update_note(&slug, form.clone(), base).await {
        Ok(_) => Ok(found(SUCCESS_URL)),
        Err(Error::Validation(errors)) => {
            let action = format!("/edit/{slug}");
            Ok(view.response(
                "notes/form.html",
                context! { form => form, errors => errors, action => action, editing => true },
            ))
        }
        Err(err) => Err(err),
    }
}

async fn delete_view(Path(slug): Path<String>, view: Views, base: BaseParams) -> Result<Response> {
    let note = handlers::get_note(&slug, base).await?;

    Ok(view.response("notes/delete.html", context! { note => note }))
}

async fn delete_note(Path(slug): Path<String>, base: BaseParams) -> Result<Response> {
    handlers::delete_note(&slug, base).await?;

    Ok(found(SUCCESS_URL))
}

pub fn router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/notes", get(notes_view))
        .route("/add", get(add_view).post(create_note))
        .route("/done", get(success_view))
        .route("/note/{slug}", get(note_view))
        .route("/edit/{slug}", get(edit_view).post(update_note))
        .route("/delete/{slug}", get(delete_view).post(delete_note).delete(delete_note))
        .route_layer(middleware::from_fn(auth::middleware::protected_view));

    Router::new().route("/", get(home)).merge(protected).with_state(state)
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::json;

    use crate::{
        db::{init_test_db, DB},
        notes::{slug::slugify, WARNING},
        tests::{count_notes, create_test_note, create_test_user, login_as, test_server},
        users::auth::User,
        Result,
    };

    const NOTE_TITLE: &str = "Title";
    const NOTE_TEXT: &str = "Текст заметки";
    const NOTE_SLUG: &str = "slug";

    /// An author with one note, and clients for the author, another user and an anonymous visitor.
    struct Fixture {
        db: DB,
        author: TestServer,
        reader: TestServer,
        anonymous: TestServer,
    }

    async fn fixture() -> Result<Fixture> {
        let db = init_test_db().await?;
        let author_user = create_test_user(&db, "Автор заметки").await;
        let reader_user = create_test_user(&db, "Читатель простой").await;
        create_test_note(&db, &author_user, "Заголовок", NOTE_TEXT, NOTE_SLUG).await;

        Ok(Fixture {
            author: logged_in(&db, &author_user).await?,
            reader: logged_in(&db, &reader_user).await?,
            anonymous: test_server(db.clone()).await?,
            db,
        })
    }

    async fn logged_in(db: &DB, user: &User) -> Result<TestServer> {
        let server = test_server(db.clone()).await?;
        login_as(&server, user).await;
        Ok(server)
    }

    async fn note_text(db: &DB, slug: &'static str) -> String {
        db.call(move |conn| {
            conn.query_row("SELECT text FROM notes WHERE slug = ?", [slug], |r| r.get(0))
                .map_err(|e| e.into())
        })
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn home_is_public() -> Result<()> {
        let Fixture { anonymous, .. } = fixture().await?;

        let response = anonymous.get("/").await;

        assert_eq!(response.status_code(), StatusCode::OK);
        Ok(())
    }

    #[tokio::test]
    async fn author_pages_availability() -> Result<()> {
        let Fixture { author, reader, .. } = fixture().await?;

        for (server, status) in [(&author, StatusCode::OK), (&reader, StatusCode::NOT_FOUND)] {
            for url in ["/note/slug", "/edit/slug", "/delete/slug"] {
                let response = server.get(url).await;
                assert_eq!(response.status_code(), status, "{url}");
            }
        }

        for url in ["/notes", "/add", "/done"] {
            assert_eq!(reader.get(url).await.status_code(), StatusCode::OK, "{url}");
        }
        Ok(())
    }

    #[tokio::test]
    async fn redirect_for_anonymous_client() -> Result<()> {
        let Fixture { anonymous, .. } = fixture().await?;

        for url in ["/notes", "/add", "/done", "/note/slug", "/edit/slug", "/delete/slug"] {
            let response = anonymous.get(url).await;

            assert_eq!(response.status_code(), StatusCode::FOUND, "{url}");
            assert_eq!(response.header("location"), format!("/auth/login?next={url}"));
        }
        Ok(())
    }

    #[tokio::test]
    async fn list_contains_only_own_notes() -> Result<()> {
        let Fixture { author, reader, .. } = fixture().await?;

        let response = author.get("/notes").await;
        assert!(response.text().contains("Заголовок"));

        let response = reader.get("/notes").await;
        assert!(!response.text().contains("Заголовок"));
        Ok(())
    }

    #[tokio::test]
    async fn add_and_edit_pages_contain_form() -> Result<()> {
        let Fixture { author, .. } = fixture().await?;

        for url in ["/add", "/edit/slug"] {
            let text = author.get(url).await.text();
            assert!(text.contains("<form"), "{url}");
            assert!(text.contains("name=\"slug\""), "{url}");
        }
        Ok(())
    }

    #[tokio::test]
    async fn anonymous_user_cant_create_note() -> Result<()> {
        let Fixture { db, anonymous, .. } = fixture().await?;

        let response = anonymous
            .post("/add")
            .form(&json!({ "title": NOTE_TITLE, "text": NOTE_TEXT, "slug": "new-slug" }))
            .await;

        assert_eq!(response.status_code(), StatusCode::FOUND);
        assert_eq!(response.header("location"), "/auth/login?next=/add");
        assert_eq!(count_notes(&db).await, 1);
        Ok(())
    }

    #[tokio::test]
    async fn auth_user_can_create_note() -> Result<()> {
        let db = init_test_db().await?;
        let user = create_test_user(&db, "Username").await;
        let server = logged_in(&db, &user).await?;

        let response = server
            .post("/add")
            .form(&json!({ "title": NOTE_TITLE, "text": NOTE_TEXT, "slug": NOTE_SLUG }))
            .await;

        assert_eq!(response.status_code(), StatusCode::FOUND);
        assert_eq!(response.header("location"), "/done");
        assert_eq!(count_notes(&db).await, 1);

        let (title, text, slug, author) = db
            .call(|conn| {
                conn.query_row("SELECT title, text, slug, author FROM notes", [], |r| {
                    Ok((
                        r.get::<_, String>(0)?,
                        r.get::<_, String>(1)?,
                        r.get::<_, String>(2)?,
                        r.get::<_, uuid::Uuid>(3)?,
                    ))
                })
                .map_err(|e| e.into())
            })
            .await
            .unwrap();

        assert_eq!(title, NOTE_TITLE);
        assert_eq!(text, NOTE_TEXT);
        assert_eq!(slug, NOTE_SLUG);
        assert_eq!(author, user.id);
        Ok(())
    }

    #[tokio::test]
    async fn not_unique_slug() -> Result<()> {
        let db = init_test_db().await?;
        let user = create_test_user(&db, "Username").await;
        let server = logged_in(&db, &user).await?;
        let form = json!({ "title": NOTE_TITLE, "text": NOTE_TEXT, "slug": NOTE_SLUG });

        server.post("/add").form(&form).await;
        assert_eq!(count_notes(&db).await, 1);

        let response = server.post("/add").form(&form).await;

        assert_eq!(response.status_code(), StatusCode::OK);
        assert!(response.text().contains(&format!("{NOTE_SLUG}{WARNING}")));
        assert_eq!(count_notes(&db).await, 1);
        Ok(())
    }

    #[tokio::test]
    async fn empty_slug() -> Result<()> {
        let db = init_test_db().await?;
        let user = create_test_user(&db, "Username").await;
        let server = logged_in(&db, &user).await?;

        server
            .post("/add")
            .form(&json!({ "title": NOTE_TITLE, "text": NOTE_TEXT, "slug": "" }))
            .await;

        assert_eq!(count_notes(&db).await, 1);
        let slug = db
            .call(|conn| {
                conn.query_row("SELECT slug FROM notes", [], |r| r.get::<_, String>(0))
                    .map_err(|e| e.into())
            })
            .await
            .unwrap();
        assert_eq!(slug, slugify(NOTE_TITLE));
        Ok(())
    }

    #[tokio::test]
    async fn author_can_edit_note() -> Result<()> {
        let Fixture { db, author, .. } = fixture().await?;

        let response = author
            .post("/edit/slug")
            .form(&json!({
                "title": "Обновленный заголовок",
                "text": "Обновлённый текст заметки",
                "slug": NOTE_SLUG,
            }))
            .await;

        assert_eq!(response.status_code(), StatusCode::FOUND);
        assert_eq!(response.header("location"), "/done");
        assert_eq!(note_text(&db, NOTE_SLUG).await, "Обновлённый текст заметки");
        Ok(())
    }

    #[tokio::test]
    async fn invalid_edit_keeps_edit_form() -> Result<()> {
        let Fixture { db, author, .. } = fixture().await?;

        let response = author
            .post("/edit/slug")
            .form(&json!({ "title": "", "text": "Новый текст", "slug": NOTE_SLUG }))
            .await;

        assert_eq!(response.status_code(), StatusCode::OK);
        let text = response.text();
        assert!(text.contains("<h1>Edit note</h1>"));
        assert_eq!(note_text(&db, NOTE_SLUG).await, NOTE_TEXT);

        let text = author.get("/add").await.text();
        assert!(text.contains("<h1>New note</h1>"));
        Ok(())
    }

    #[tokio::test]
    async fn user_cant_edit_note_of_another_user() -> Result<()> {
        let Fixture { db, reader, .. } = fixture().await?;

        let response = reader
            .post("/edit/slug")
            .form(&json!({ "title": "Взлом", "text": "Взлом", "slug": NOTE_SLUG }))
            .await;

        assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(note_text(&db, NOTE_SLUG).await, NOTE_TEXT);
        Ok(())
    }

    #[tokio::test]
    async fn author_can_delete_note() -> Result<()> {
        let Fixture { db, author, .. } = fixture().await?;

        let response = author.delete("/delete/slug").await;

        assert_eq!(response.status_code(), StatusCode::FOUND);
        assert_eq!(response.header("location"), "/done");
        assert_eq!(count_notes(&db).await, 0);
        Ok(())
    }

    #[tokio::test]
    async fn author_can_delete_note_with_form() -> Result<()> {
        let Fixture { db, author, .. } = fixture().await?;

        let response = author.post("/delete/slug").await;

        assert_eq!(response.status_code(), StatusCode::FOUND);
        assert_eq!(count_notes(&db).await, 0);
        Ok(())
    }

    #[tokio::test]
    async fn user_cant_delete_note_of_another_user() -> Result<()> {
        let Fixture { db, reader, .. } = fixture().await?;

        let response = reader.delete("/delete/slug").await;

        assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(count_notes(&db).await, 1);
        Ok(())
    }
}
