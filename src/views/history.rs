use crate::leaderboard::aggregate;
use crate::models::{sort_history, MatchRecord, MatchRow, Outcome};
use crate::views::fixtures::render_leaderboard;
use crate::views::layout::{base, notices};
use crate::views::{failed_fragment, or_notice};
use crate::AppState;
use axum::{
    extract::{Query, State},
    response::{Html, IntoResponse, Response},
};
use chrono::{Datelike, NaiveDate};
use maud::{html, Markup};
use serde::Deserialize;
use std::sync::Arc;

/// History page - every recorded match, newest first
pub async fn page(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let mut errors = Vec::new();
    let mut matches = or_notice(state.api.matches().await, &mut errors);
    sort_history(&mut matches);
    let records: Vec<MatchRecord> = matches.iter().map(MatchRow::to_record).collect();

    let content = html! {
        h2 { "Match History" }

        details {
            summary { "All-time standings" }
            (render_leaderboard(&aggregate(&records)))
        }

        input
            type="search"
            name="q"
            placeholder="Search matches..."
            hx-get="/history/search"
            hx-trigger="input changed delay:300ms, search"
            hx-target="#match-list";

        div id="match-list" {
            (notices(&errors))
            (render_match_list(&matches))
        }
    };

    Html(base("Match History", "history", &state.config.club_name, content).into_string())
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    q: String,
}

/// Filter history by player name (htmx endpoint)
pub async fn search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Response {
    let mut matches = match state.api.matches().await {
        Ok(matches) => matches,
        Err(e) => return failed_fragment(&e),
    };
    sort_history(&mut matches);

    let query = params.q.trim();
    let filtered: Vec<MatchRow> = if query.is_empty() {
        matches
    } else {
        matches.into_iter().filter(|m| m.involves(query)).collect()
    };

    Html(render_match_list(&filtered).into_string()).into_response()
}

fn render_match_list(matches: &[MatchRow]) -> Markup {
    if matches.is_empty() {
        return html! {
            p { "No matches found." }
        };
    }

    html! {
        div class="card-grid" {
            @for m in matches {
                (render_match(m))
            }
        }
    }
}

/// Render a single match card with the winning side highlighted
fn render_match(m: &MatchRow) -> Markup {
    let [p1, p2, p3, p4] = m.names();
    let (team1_score, team2_score) = m.team_scores();
    let outcome = m.score().map(|s| s.outcome());

    let (class1, class2) = match outcome {
        Some(Outcome::Team1) => ("winner", "loser"),
        Some(Outcome::Team2) => ("loser", "winner"),
        _ => ("", ""),
    };

    html! {
        article {
            header {
                strong { "Match" }
                @if let Some(kind) = &m.match_type {
                    " · " (kind)
                }
                @if let Some(mode) = &m.game_mode_type {
                    " · " (mode)
                }
            }
            div class="grid" {
                div class=(class1) { (p1) br; (p2) }
                div class=(class1) style="text-align: right;" {
                    @if outcome == Some(Outcome::Team1) { "● " }
                    @if outcome == Some(Outcome::Draw) { "◐ " }
                    (team1_score)
                }
            }
            div class="grid" {
                div class=(class2) { (p3) br; (p4) }
                div class=(class2) style="text-align: right;" {
                    @if outcome == Some(Outcome::Team2) { "● " }
                    @if outcome == Some(Outcome::Draw) { "◐ " }
                    (team2_score)
                }
            }
            footer {
                small {
                    @match m.date() {
                        Some(date) => {
                            (long_date(date))
                        },
                        None => {
                            @if m.match_date.trim().is_empty() { "No date available" } @else { "Date unavailable" }
                        },
                    }
                }
            }
        }
    }
}

/// "Saturday, 9th March, 2024"
pub fn long_date(date: NaiveDate) -> String {
    let day = date.day();
    let suffix = match (day % 10, day % 100) {
        (1, n) if n != 11 => "st",
        (2, n) if n != 12 => "nd",
        (3, n) if n != 13 => "rd",
        _ => "th",
    };
    format!(
        "{}, {}{} {}, {}",
        date.format("%A"),
        day,
        suffix,
        date.format("%B"),
        date.year()
    )
}
