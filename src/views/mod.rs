pub mod analytics;
pub mod calendar;
pub mod fixtures;
pub mod history;
pub mod home;
pub mod layout;
pub mod ranks;
pub mod roster;

use crate::error::ApiError;
use axum::response::{Html, IntoResponse, Response};
use maud::{html, Markup};

/// Unwrap an API result for rendering. On failure the error is logged,
/// its notice queued for the page, and an empty value rendered instead.
pub fn or_notice<T: Default>(result: Result<T, ApiError>, notices: &mut Vec<String>) -> T {
    match result {
        Ok(value) => value,
        Err(e) => {
            tracing::error!("{}", e);
            notices.push(e.notice());
            T::default()
        }
    }
}

/// Fragment response that leaves the swap target untouched. The banners
/// are appended to the layout's `#notices` out of band.
pub fn keep_fragment(banners: Markup) -> Response {
    (
        [("hx-reswap", "none")],
        Html(
            html! {
                div hx-swap-oob="beforeend:#notices" { (banners) }
            }
            .into_string(),
        ),
    )
        .into_response()
}

/// Log a failed fragment fetch and keep the current fragment
pub fn failed_fragment(e: &ApiError) -> Response {
    tracing::error!("{}", e);
    keep_fragment(layout::notice(&e.notice()))
}
