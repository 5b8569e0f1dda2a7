use crate::api::ApiClient;
use crate::models::{NewPlayer, Player};
use crate::views::layout::{base, notice, notices, success};
use crate::views::{failed_fragment, keep_fragment, or_notice};
use crate::AppState;
use axum::{
    extract::{Query, State},
    response::{Html, IntoResponse, Response},
    Form,
};
use maud::{html, Markup};
use serde::Deserialize;
use std::sync::Arc;

const ROLES: &[&str] = &["Member", "Captain", "Coach", "Committee"];

/// Roster page - player cards, search and add form
pub async fn page(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let mut errors = Vec::new();
    let players = or_notice(state.api.players(None).await, &mut errors);

    let content = html! {
        h2 { "Players" }

        input
            type="search"
            name="q"
            placeholder="Search players..."
            hx-get="/roster/search"
            hx-trigger="input changed delay:300ms, search"
            hx-target="#player-list";

        details {
            summary { "Add Player" }
            form hx-post="/roster/players" hx-target="#player-list" hx-on--after-request="if(event.detail.successful) this.reset()" {
                div class="grid" {
                    input type="text" name="name" placeholder="Player name" required;
                    select name="role" required {
                        @for role in ROLES {
                            option value=(role) { (role) }
                        }
                    }
                }
                button type="submit" { "Add Player" }
            }
        }

        hr;

        div id="player-list" {
            (notices(&errors))
            (render_player_list(&players, &state.api))
        }
    };

    Html(base("Players", "roster", &state.config.club_name, content).into_string())
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    q: String,
}

/// Search players by name (htmx endpoint)
pub async fn search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Response {
    match state.api.players(Some(&params.q)).await {
        Ok(players) => Html(render_player_list(&players, &state.api).into_string()).into_response(),
        Err(e) => failed_fragment(&e),
    }
}

/// Form data for adding a player
#[derive(Debug, Deserialize)]
pub struct NewPlayerForm {
    name: String,
    role: String,
}

/// Add a player (htmx endpoint)
pub async fn create_player(
    State(state): State<Arc<AppState>>,
    Form(form): Form<NewPlayerForm>,
) -> Response {
    let name = form.name.trim();
    let role = form.role.trim();

    if name.is_empty() || role.is_empty() {
        return keep_fragment(notice("Name and role are required"));
    }

    let new_player = NewPlayer {
        name: name.to_string(),
        role: role.to_string(),
    };
    let banner = match state.api.create_player(&new_player).await {
        Ok(created) => {
            tracing::info!("Added player {} ({})", created.player.name, created.player.id);
            success(&format!("Added {}!", created.player.name))
        }
        Err(e) => return failed_fragment(&e),
    };

    match state.api.players(None).await {
        Ok(players) => Html(
            html! {
                (banner)
                (render_player_list(&players, &state.api))
            }
            .into_string(),
        )
        .into_response(),
        Err(e) => {
            tracing::error!("{}", e);
            keep_fragment(html! {
                (banner)
                (notice(&e.notice()))
            })
        }
    }
}

/// Render the player cards (used for full page and htmx updates)
fn render_player_list(players: &[Player], api: &ApiClient) -> Markup {
    if players.is_empty() {
        return html! {
            p { "No players found." }
        };
    }

    html! {
        p class="secondary" { (players.len()) " players" }
        div class="card-grid" {
            @for player in players {
                article id=(format!("player-{}", player.player_id)) {
                    header {
                        (render_avatar(player, api))
                    }
                    strong { (player.name) }
                    br;
                    small class="secondary" { (player.role.as_deref().unwrap_or("Member")) }
                }
            }
        }
    }
}

/// Avatar image, or the player's initials when none is set
fn render_avatar(player: &Player, api: &ApiClient) -> Markup {
    match player.avatar_url.as_deref().filter(|url| !url.is_empty()) {
        Some(url) => html! {
            img class="avatar" src=(api.resolve(url)) alt=(player.name);
        },
        None => html! {
            span class="initials" { (player.initials()) }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn api() -> ApiClient {
        ApiClient::new("http://club.local:5000", Duration::from_secs(1)).unwrap()
    }

    fn make_player(id: i64, name: &str, avatar: Option<&str>) -> Player {
        Player {
            player_id: id,
            name: name.to_string(),
            avatar_url: avatar.map(str::to_string),
            role: Some("Captain".to_string()),
        }
    }

    #[test]
    fn test_avatar_resolved_against_api() {
        let html = render_avatar(&make_player(1, "Ann Lee", Some("/static/avatars/ann.png")), &api())
            .into_string();
        assert!(html.contains(r#"src="http://club.local:5000/static/avatars/ann.png""#));
    }

    #[test]
    fn test_initials_without_avatar() {
        let html = render_avatar(&make_player(1, "Ann Lee", Some("")), &api()).into_string();
        assert!(html.contains(">AL</span>"));
    }

    #[test]
    fn test_empty_roster_message() {
        let html = render_player_list(&[], &api()).into_string();
        assert!(html.contains("No players found."));
    }

    #[tokio::test]
    async fn test_failed_search_keeps_current_list() {
        let state = crate::views::test_support::failing_state().await;
        let response = search(State(state), Query(SearchParams { q: "ann".to_string() })).await;
        let body = crate::views::test_support::kept_body(response).await;
        assert!(body.contains("Request failed: could not fetch players"));
        assert!(!body.contains("No players found."));
    }

    #[tokio::test]
    async fn test_failed_create_keeps_current_list() {
        let state = crate::views::test_support::failing_state().await;
        let form = NewPlayerForm {
            name: "Ann".to_string(),
            role: "Member".to_string(),
        };
        let body = crate::views::test_support::kept_body(create_player(State(state), Form(form)).await).await;
        assert!(body.contains("Request failed: could not add player"));
    }

    #[test]
    fn test_player_cards() {
        let players = vec![make_player(1, "Ann", None), make_player(2, "Ben", None)];
        let html = render_player_list(&players, &api()).into_string();
        assert!(html.contains("2 players"));
        assert!(html.contains(r#"id="player-2""#));
        assert!(html.contains("Captain"));
    }
}
