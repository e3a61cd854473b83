//! `GET /`: the analysis form.

use axum::response::Html;

const HOME_PAGE: &str = include_str!("../../../resources/templates/home.html");

pub async fn page() -> Html<&'static str> {
    Html(HOME_PAGE)
}
