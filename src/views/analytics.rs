use crate::models::{PlayerProfile, RatingPoint, RecentMatch, RECENT_MATCH_LIMIT};
use crate::ranks::{classify, standing_position, Tier};
use crate::views::layout::{base, notice, notices, render_tier, success};
use crate::views::{failed_fragment, keep_fragment, or_notice};
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    response::{Html, IntoResponse, Response},
};
use maud::{html, Markup, PreEscaped};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

/// Analytics page - tier legend, player stats table and details panel
pub async fn page(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let mut errors = Vec::new();
    let players = or_notice(state.api.player_stats().await, &mut errors);

    let content = html! {
        h2 { "Analytics" }

        (render_legend())

        div class="header-row" {
            input
                type="search"
                name="q"
                placeholder="Search players..."
                style="margin: 0; flex: 1;"
                hx-get="/analytics/search"
                hx-trigger="input changed delay:300ms, search"
                hx-target="#stats-table";
            button
                class="secondary"
                hx-post="/analytics/refresh"
                hx-target="#stats-table"
                hx-indicator="#refresh-spinner"
            {
                "Refresh Stats"
                span id="refresh-spinner" class="htmx-indicator spinner" {}
            }
        }

        div id="stats-table" {
            (notices(&errors))
            (render_stats_table(&players, &players))
        }

        div id="player-details" {}

        script src="https://cdn.jsdelivr.net/npm/chart.js" {}
    };

    Html(base("Analytics", "analytics", &state.config.club_name, content).into_string())
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    q: String,
}

/// Filter the stats table by name, keeping global positions (htmx endpoint)
pub async fn search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Response {
    match state.api.player_stats().await {
        Ok(players) => {
            let shown = filter_by_name(&players, &params.q);
            Html(render_stats_table(&shown, &players).into_string()).into_response()
        }
        Err(e) => failed_fragment(&e),
    }
}

/// Ask the API to recompute stats, then reload the table (htmx endpoint)
pub async fn refresh(State(state): State<Arc<AppState>>) -> Response {
    if let Err(e) = state.api.refresh_stats().await {
        return failed_fragment(&e);
    }
    tracing::info!("Player stats refreshed");

    match state.api.player_stats().await {
        Ok(players) => Html(
            html! {
                (success("Stats updated"))
                (render_stats_table(&players, &players))
            }
            .into_string(),
        )
        .into_response(),
        Err(e) => {
            tracing::error!("{}", e);
            keep_fragment(html! {
                (success("Stats updated"))
                (notice(&e.notice()))
            })
        }
    }
}

/// Details panel for one player (htmx endpoint)
pub async fn player_details(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Response {
    let (stats, history, recent) = tokio::join!(
        state.api.player_stats(),
        state.api.rating_history(id),
        state.api.recent_matches(id),
    );

    let players = match stats {
        Ok(players) => players,
        Err(e) => return failed_fragment(&e),
    };

    let Some(player) = players.iter().find(|p| p.id == id) else {
        return Html(notice("Player not found").into_string()).into_response();
    };

    let mut errors = Vec::new();
    let history = or_notice(history, &mut errors);
    let recent = or_notice(recent, &mut errors);
    let position = standing_position(&players, id);
    let avatar = player
        .avatar_url
        .as_deref()
        .filter(|url| !url.is_empty())
        .map(|url| state.api.resolve(url));

    Html(
        html! {
            (notices(&errors))
            (render_details(player, position, players.len(), &history, &recent, avatar.as_deref()))
        }
        .into_string(),
    )
    .into_response()
}

fn filter_by_name(players: &[PlayerProfile], query: &str) -> Vec<PlayerProfile> {
    let query = query.trim().to_lowercase();
    players
        .iter()
        .filter(|p| query.is_empty() || p.name.to_lowercase().contains(&query))
        .cloned()
        .collect()
}

fn render_legend() -> Markup {
    html! {
        details {
            summary { "Rank tiers" }
            div class="card-grid" {
                @for tier in Tier::ALL {
                    div {
                        (render_tier(*tier))
                        br;
                        small class="secondary" { (tier.range_label()) }
                    }
                }
            }
        }
    }
}

/// Stats table; `shown` is the visible subset, `all` decides positions
fn render_stats_table(shown: &[PlayerProfile], all: &[PlayerProfile]) -> Markup {
    if shown.is_empty() {
        return html! {
            p { "No players found." }
        };
    }

    html! {
        figure {
            table class="striped" {
                thead {
                    tr {
                        th { "#" }
                        th { "Player" }
                        th { "Rank" }
                        th { "Rating" }
                        th { "Played" }
                        th { "W/L" }
                        th { "Win %" }
                    }
                }
                tbody {
                    @for player in shown {
                        tr
                            style="cursor: pointer;"
                            hx-get=(format!("/analytics/players/{}", player.id))
                            hx-target="#player-details"
                        {
                            td { @if let Some(pos) = standing_position(all, player.id) { (pos) } }
                            td { (player.name) }
                            td { (render_tier(classify(player.current_rating))) }
                            td { (format!("{:.1}", player.current_rating)) }
                            td { (player.matches_played) }
                            td { (player.wins) "/" (player.losses) }
                            td { (format!("{:.1}%", player.win_rate)) }
                        }
                    }
                }
            }
        }
    }
}

fn render_details(
    player: &PlayerProfile,
    position: Option<usize>,
    total: usize,
    history: &[RatingPoint],
    recent: &[RecentMatch],
    avatar: Option<&str>,
) -> Markup {
    let tier = classify(player.current_rating);
    let one_decimal = |value: Option<f64>| value.map(|v| format!("{:.1}", v)).unwrap_or_else(|| "N/A".to_string());

    html! {
        article {
            div class="rank-banner" style=(format!("background-image: url('{}');", tier.background())) {
                @if let Some(url) = avatar {
                    img class="avatar" src=(url) alt=(player.name);
                }
                h3 style="color: inherit; margin: 0;" { (player.name) }
                (render_tier(tier))
                @if let Some(pos) = position {
                    p style="margin: 0;" { "Position " (pos) " of " (total) }
                }
            }

            div class="grid" {
                div { small { "Rating" } br; strong { (format!("{:.1}", player.current_rating)) } " ± " (format!("{:.1}", player.rating_deviation)) }
                div { small { "Played" } br; strong { (player.matches_played) } }
                div { small { "Wins / Losses" } br; strong { (player.wins) " / " (player.losses) } }
                div { small { "Win rate" } br; strong { (format!("{:.1}%", player.win_rate)) } }
                div { small { "Avg. margin of victory" } br; strong { (one_decimal(player.average_mov)) } }
                div { small { "Avg. margin of loss" } br; strong { (one_decimal(player.average_mol)) } }
                div { small { "Win streak" } br; strong { (player.win_streak) } }
            }

            h4 { "Rating History" }
            (render_rating_chart(history))

            h4 { "Recent Matches" }
            (render_recent(recent))
        }
    }
}

fn render_rating_chart(history: &[RatingPoint]) -> Markup {
    if history.is_empty() {
        return html! {
            p class="secondary" { "No rating history yet." }
        };
    }

    let chart_data = json!({
        "labels": history.iter().map(|p| p.date.as_str()).collect::<Vec<_>>(),
        "datasets": [{
            "label": "Rating",
            "data": history.iter().map(|p| p.rating).collect::<Vec<_>>(),
            "borderColor": "#3498db",
            "backgroundColor": "#3498db",
            "fill": false,
            "tension": 0.1
        }]
    });
    // Labels come from the API; keep `</script>` from closing the block
    let chart_data_json = serde_json::to_string(&chart_data)
        .unwrap_or_else(|_| "{}".to_string())
        .replace('<', "\\u003c");

    html! {
        div class="chart-container" {
            canvas id="rating-chart" {}
        }
        script {
            (PreEscaped(format!(r#"
                (function() {{
                    const chartData = {chart_data};
                    if (window.ratingChart) {{ window.ratingChart.destroy(); }}
                    const ctx = document.getElementById('rating-chart').getContext('2d');
                    window.ratingChart = new Chart(ctx, {{
                        type: 'line',
                        data: chartData,
                        options: {{
                            responsive: true,
                            maintainAspectRatio: false,
                            plugins: {{ legend: {{ display: false }} }}
                        }}
                    }});
                }})();
            "#, chart_data = chart_data_json)))
        }
    }
}

fn render_recent(recent: &[RecentMatch]) -> Markup {
    if recent.is_empty() {
        return html! {
            p class="secondary" { "No matches played yet." }
        };
    }

    html! {
        ul class="player-list" {
            @for m in recent.iter().take(RECENT_MATCH_LIMIT) {
                li {
                    @if m.won() {
                        strong class="winner" { "W " }
                    } @else {
                        span class="loser" { "L " }
                    }
                    (m.player1_name) " & " (m.player2_name)
                    " " (m.team1_score) " - " (m.team2_score) " "
                    (m.player3_name) " & " (m.player4_name)
                    br;
                    small class="secondary" { (m.match_date) }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Side;

    fn make_profile(id: i64, name: &str, rating: f64) -> PlayerProfile {
        PlayerProfile {
            id,
            name: name.to_string(),
            role: None,
            avatar_url: None,
            current_rating: rating,
            rating_deviation: 2.5,
            matches_played: 10,
            wins: 6,
            losses: 4,
            win_rate: 60.0,
            average_mov: Some(4.34),
            average_mol: None,
            win_streak: 2,
        }
    }

    fn make_recent(team1_score: u32, team2_score: u32, side: Side) -> RecentMatch {
        RecentMatch {
            match_date: "01/02/2024".to_string(),
            player1_name: "Ann".to_string(),
            player2_name: "Ben".to_string(),
            player3_name: "Cai".to_string(),
            player4_name: "Dee".to_string(),
            team1_score,
            team2_score,
            player_team: side,
        }
    }

    #[test]
    fn test_search_keeps_global_position() {
        let all = vec![
            make_profile(1, "Ann", 30.0),
            make_profile(2, "Ben", 45.0),
            make_profile(3, "Cai", 12.0),
        ];
        let shown = filter_by_name(&all, "  ann ");
        assert_eq!(shown.len(), 1);

        let html = render_stats_table(&shown, &all).into_string();
        assert!(html.contains("<td>2</td>"));
        assert!(html.contains(r#"hx-get="/analytics/players/1""#));
        assert!(html.contains("Diamond"));
    }

    #[test]
    fn test_empty_search() {
        let all = vec![make_profile(1, "Ann", 30.0)];
        assert_eq!(filter_by_name(&all, "").len(), 1);
        assert!(filter_by_name(&all, "zed").is_empty());
        assert!(render_stats_table(&[], &all).into_string().contains("No players found."));
    }

    #[test]
    fn test_details_show_tier_and_stats() {
        let player = make_profile(1, "Ann", 52.0);
        let html = render_details(&player, Some(1), 3, &[], &[], None).into_string();
        assert!(html.contains("/assets/ranks/champion_bg.png"));
        assert!(html.contains("Position 1 of 3"));
        assert!(html.contains("60.0%"));
        assert!(html.contains("4.3"));
        assert!(html.contains("N/A"));
        assert!(html.contains("No rating history yet."));
    }

    #[test]
    fn test_rating_chart_embeds_points() {
        let history = vec![
            RatingPoint { date: "2024-01-01".to_string(), rating: 25.0 },
            RatingPoint { date: "2024-02-01".to_string(), rating: 27.5 },
        ];
        let html = render_rating_chart(&history).into_string();
        assert!(html.contains(r#"canvas id="rating-chart""#));
        assert!(html.contains(r#""labels":["2024-01-01","2024-02-01"]"#));
        assert!(html.contains("27.5"));
    }

    #[test]
    fn test_rating_chart_labels_cannot_close_script() {
        let history = vec![RatingPoint {
            date: "</script><script>alert(1)</script>".to_string(),
            rating: 25.0,
        }];
        let html = render_rating_chart(&history).into_string();
        assert_eq!(html.matches("</script>").count(), 1);
        assert!(html.contains(r#"\u003c/script>\u003cscript>alert(1)"#));
    }

    #[tokio::test]
    async fn test_failed_search_keeps_current_table() {
        let state = crate::views::test_support::failing_state().await;
        let response = search(State(state), Query(SearchParams { q: String::new() })).await;
        let body = crate::views::test_support::kept_body(response).await;
        assert!(body.contains("Request failed: could not fetch player statistics"));
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_current_table() {
        let state = crate::views::test_support::failing_state().await;
        let body = crate::views::test_support::kept_body(refresh(State(state)).await).await;
        assert!(body.contains("Request failed: could not update player statistics"));
        assert!(!body.contains("No players found."));
    }

    #[test]
    fn test_recent_matches_limited_and_marked() {
        let recent: Vec<RecentMatch> = (0..7)
            .map(|i| {
                if i % 2 == 0 {
                    make_recent(21, 15, Side::Team1)
                } else {
                    make_recent(21, 15, Side::Team2)
                }
            })
            .collect();
        let html = render_recent(&recent).into_string();
        assert_eq!(html.matches("<li>").count(), RECENT_MATCH_LIMIT);
        assert!(html.contains(r#"<strong class="winner">W </strong>"#));
        assert!(html.contains(r#"<span class="loser">L </span>"#));
    }
}
