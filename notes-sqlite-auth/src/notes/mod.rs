mod handlers;
mod model;
mod routes;
pub mod slug;
pub(crate) mod store;

pub use model::*;
pub use routes::router;

use minijinja::Environment;

pub fn add_templates(env: &mut Environment<'static>) -> Result<(), minijinja::Error> {
    env.add_template("notes/list.html", include_str!("../templates/notes/list.html"))?;
    env.add_template("notes/detail.html", include_str!("../templates/notes/detail.html"))?;
    env.add_template("notes/form.html", include_str!("../templates/notes/form.html"))?;
    env.add_template("notes/delete.html", include_str!("../templates/notes/delete.html"))?;
    env.add_template("notes/success.html", include_str!("../templates/notes/success.html"))?;
    Ok(())
}
