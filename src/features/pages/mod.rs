pub mod form;
pub mod route;

use crate::AppState;
use crate::domain::Page;
use axum::{
    Router,
    extract::State,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use form::SaveBody;
use http::{StatusCode, header};
use route::PageTitle;

// every path under these prefixes reaches the title validator, anything
// deeper or malformed is turned into a 404 there, whatever the method
pub fn pages_router() -> Router<AppState> {
    Router::new()
        .route("/view/{*path}", get(view_handler).fallback(read_only))
        .route("/edit/{*path}", get(edit_handler).fallback(read_only))
        .route("/save/{*path}", post(save_handler).fallback(post_only))
}

async fn view_handler(State(state): State<AppState>, PageTitle(title): PageTitle) -> Response {
    let page = match state.store.load(&title).await {
        Ok(page) => page,
        Err(e) => {
            tracing::debug!(error = %e, "page missing, redirecting to editor");
            return found(&format!("/edit/{}", title));
        }
    };

    render(&state, "view", &page)
}

async fn edit_handler(State(state): State<AppState>, PageTitle(title): PageTitle) -> Response {
    let page = match state.store.load(&title).await {
        Ok(page) => page,
        Err(e) => {
            tracing::debug!(error = %e, "page missing, editing a blank page");
            Page::blank(title)
        }
    };

    render(&state, "edit", &page)
}

async fn save_handler(
    State(state): State<AppState>,
    PageTitle(title): PageTitle,
    SaveBody(body): SaveBody,
) -> Response {
    let page = Page::new(title, body);
    match state.store.save(&page).await {
        Ok(()) => found(&format!("/view/{}", page.title)),
        Err(e) => e.into_response_for(state.config.expose_errors),
    }
}

// the title is still validated, so a bad path stays a 404 under any method
async fn read_only(PageTitle(_): PageTitle) -> Response {
    method_not_allowed("GET, HEAD")
}

async fn post_only(PageTitle(_): PageTitle) -> Response {
    method_not_allowed("POST")
}

fn method_not_allowed(allow: &'static str) -> Response {
    (StatusCode::METHOD_NOT_ALLOWED, [(header::ALLOW, allow)]).into_response()
}

fn render(state: &AppState, template: &str, page: &Page) -> Response {
    match state.templates.render(template, page) {
        Ok(html) => Html(html).into_response(),
        Err(e) => e.into_response_for(state.config.expose_errors),
    }
}

// 302, axum's Redirect only offers 303/307/308
fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location.to_string())]).into_response()
}
