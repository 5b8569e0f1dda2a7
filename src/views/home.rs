use crate::views::layout::base;
use crate::AppState;
use axum::{
    extract::State,
    response::{Html, IntoResponse},
};
use maud::{html, Markup};
use std::sync::Arc;

/// Feature cards: (href, title, blurb)
const FEATURES: &[(&str, &str, &str)] = &[
    ("/roster", "Player Profiles", "Browse the club roster and add new members."),
    ("/history", "Match History", "Every recorded match, newest first, with winners highlighted."),
    ("/fixtures", "Fixtures", "Generate a round schedule for tonight's players and record scores as you go."),
    ("/analytics", "Analytics", "Ratings, win rates and rating history for every player."),
    ("/ranks", "Ranks", "See which tier each player currently sits in."),
    ("/calendar", "Calendar", "Upcoming matches, tournaments and practice sessions."),
];

/// Home page
pub async fn page(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Html(base("Home", "home", &state.config.club_name, render_home(&state.config.club_name)).into_string())
}

fn render_home(club_name: &str) -> Markup {
    html! {
        hgroup {
            h2 { "Welcome to " (club_name) }
            p { "Manage fixtures, track stats, and keep up with the club." }
        }

        div class="card-grid" {
            @for (href, title, blurb) in FEATURES {
                article {
                    header {
                        a href=(href) { strong { (title) } }
                    }
                    p { (blurb) }
                }
            }
        }
    }
}
