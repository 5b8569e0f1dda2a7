use crate::ranks::{divisions, Division};
use crate::views::layout::{base, notices};
use crate::views::or_notice;
use crate::AppState;
use axum::{
    extract::State,
    response::{Html, IntoResponse},
};
use maud::{html, Markup};
use std::sync::Arc;

/// Ranks page - one card per tier with its players
pub async fn page(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let mut errors = Vec::new();
    let players = or_notice(state.api.player_stats().await, &mut errors);

    let content = html! {
        h2 { "Ranks" }
        (notices(&errors))

        div class="card-grid" {
            @for division in divisions(&players) {
                (render_division(&division))
            }
        }
    };

    Html(base("Ranks", "ranks", &state.config.club_name, content).into_string())
}

fn render_division(division: &Division<'_>) -> Markup {
    let tier = division.tier;

    html! {
        article {
            header class="rank-banner" style=(format!("background-image: url('{}');", tier.background())) {
                img class="rank-icon" src=(tier.icon()) alt=(format!("{} rank", tier.name()));
                strong { (tier.name()) }
                br;
                small { "Rating: " (tier.range_label()) }
            }
            @if division.players.is_empty() {
                p class="secondary" { "No players in this rank" }
            } @else {
                ul class="player-list" {
                    @for player in &division.players {
                        li {
                            (player.name)
                            span style="float: right;" { (format!("{:.1}", player.current_rating)) }
                        }
                    }
                }
            }
        }
    }
}
