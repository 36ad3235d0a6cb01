mod assets;
mod page;
mod routes;

pub use page::{generate_static_html, index_page};
pub use routes::{AppState, router, serve};
