use crate::fixtures::{self, by_round, decode_sheet, encode_sheet, Fixture, SheetSettings};
use crate::leaderboard::{aggregate, Standing};
use crate::models::{GameMode, MatchType, ScheduleRequest, Score};
use crate::views::layout::{base, notice, notices, signed, success};
use crate::views::{failed_fragment, or_notice};
use crate::AppState;
use axum::{
    extract::State,
    response::{Html, IntoResponse, Response},
};
use axum_extra::extract::Form;
use chrono::NaiveDate;
use maud::{html, Markup};
use serde::Deserialize;
use std::sync::Arc;

const MIN_PLAYERS: usize = 2;
const DEFAULT_COURTS: u32 = 2;
/// Highest score accepted for one team in one match
const MAX_SCORE: u32 = 99;

/// Fixtures page - generation form, fixture sheet and live leaderboard
pub async fn page(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let mut errors = Vec::new();
    let players = or_notice(state.api.players(None).await, &mut errors);
    let today = chrono::Local::now().date_naive();

    let content = html! {
        h2 { "Generate Fixtures" }
        (notices(&errors))

        form id="fixture-form" {
            div class="grid" {
                label {
                    "Date"
                    input type="date" name="date" value=(today.format("%Y-%m-%d")) required;
                }
                label {
                    "Game Mode"
                    select name="game_mode" {
                        @for mode in GameMode::ALL {
                            option value=(mode) { (mode) }
                        }
                    }
                }
                label {
                    "Match Type"
                    select name="match_type" {
                        @for kind in MatchType::ALL {
                            option value=(kind) { (kind) }
                        }
                    }
                }
            }

            fieldset {
                legend { "Select Players" }
                @if players.is_empty() {
                    p { "No players available. Add players on the Players page." }
                } @else {
                    div class="checkbox-grid" {
                        @for player in &players {
                            label {
                                input type="checkbox" name="players" value=(player.name) class="player-checkbox";
                                (player.name)
                            }
                        }
                    }
                }
            }

            div class="grid" {
                label {
                    "Available Courts"
                    input id="courts" type="number" name="courts" min="1" value=(DEFAULT_COURTS);
                }
                div
                    id="round-select"
                    hx-post="/fixtures/rounds"
                    hx-include="#fixture-form"
                    hx-trigger="change from:.player-checkbox, input changed delay:300ms from:#courts"
                {
                    (render_round_select(&[], false))
                }
            }

            button
                type="button"
                hx-post="/fixtures/generate"
                hx-include="#fixture-form, #sheet-state"
                hx-target="#sheet"
                hx-indicator="#generate-spinner"
            {
                "Generate Match"
                span id="generate-spinner" class="htmx-indicator spinner" {}
            }
        }

        hr;

        div id="sheet" {
            (render_sheet(&[], html! {}))
        }
    };

    Html(base("Generate Fixtures", "fixtures", &state.config.club_name, content).into_string())
}

/// Form data for the round picker
#[derive(Debug, Deserialize)]
pub struct RoundsForm {
    #[serde(default)]
    players: Vec<String>,
    #[serde(default)]
    courts: String,
}

/// Feasible round counts for the current selection (htmx endpoint)
pub async fn feasible_rounds(
    State(state): State<Arc<AppState>>,
    Form(form): Form<RoundsForm>,
) -> Response {
    let courts = parse_count(&form.courts).filter(|c| *c > 0);
    let selected = form.players.len() as u32;

    let Some(courts) = courts.filter(|_| selected > 0) else {
        return Html(render_round_select(&[], false).into_string()).into_response();
    };

    match state.api.feasible_rounds(courts, selected).await {
        Ok(rounds) => Html(render_round_select(&rounds, true).into_string()).into_response(),
        Err(e) => failed_fragment(&e),
    }
}

/// Form data for fixture generation
#[derive(Debug, Deserialize)]
pub struct GenerateForm {
    #[serde(default)]
    date: String,
    #[serde(default)]
    game_mode: GameMode,
    #[serde(default)]
    match_type: MatchType,
    #[serde(default)]
    players: Vec<String>,
    #[serde(default)]
    courts: String,
    #[serde(default)]
    rounds: String,
    #[serde(default)]
    sheet: String,
}

/// Generate fixtures and append them to the sheet (htmx endpoint)
pub async fn generate(
    State(state): State<Arc<AppState>>,
    Form(form): Form<GenerateForm>,
) -> impl IntoResponse {
    let mut sheet = match decode_sheet(&form.sheet) {
        Ok(sheet) => sheet,
        Err(e) => {
            tracing::warn!("Discarding unreadable fixture sheet: {}", e);
            Vec::new()
        }
    };

    let (request, date) = match validate_generate(&form) {
        Ok(valid) => valid,
        Err(message) => return Html(render_sheet(&sheet, notice(message)).into_string()),
    };

    tracing::info!(
        "Generating fixtures: {} players, {} courts, {} rounds",
        request.num_players,
        request.num_courts,
        request.num_rounds
    );

    let banner = match state.api.schedule(request).await {
        Ok(rounds) => {
            let settings = SheetSettings {
                date,
                game_mode: form.game_mode,
                match_type: form.match_type,
            };
            let generated = fixtures::build_sheet(&rounds, &form.players, settings);
            let added = generated.len();
            sheet.extend(generated);
            success(&format!("Added {} matches to the schedule", added))
        }
        Err(e) => {
            tracing::error!("{}", e);
            notice(&e.notice())
        }
    };

    Html(render_sheet(&sheet, banner).into_string())
}

fn validate_generate(form: &GenerateForm) -> Result<(ScheduleRequest, NaiveDate), &'static str> {
    let date = NaiveDate::parse_from_str(form.date.trim(), "%Y-%m-%d")
        .map_err(|_| "Please choose a match date")?;
    if form.players.len() < MIN_PLAYERS {
        return Err("Please select at least 2 players");
    }
    let num_courts = parse_count(&form.courts)
        .filter(|c| *c > 0)
        .ok_or("Enter at least one available court")?;
    let num_rounds = parse_count(&form.rounds)
        .filter(|r| *r > 0)
        .ok_or("Choose the number of rounds")?;

    let request = ScheduleRequest {
        num_courts,
        num_players: form.players.len() as u32,
        num_rounds,
    };
    Ok((request, date))
}

/// Form data for a single score update
#[derive(Debug, Deserialize)]
pub struct ScoreForm {
    index: usize,
    #[serde(default)]
    sheet: String,
    #[serde(default)]
    team1_score: String,
    #[serde(default)]
    team2_score: String,
}

/// Submit one fixture's score to the club API (htmx endpoint)
pub async fn submit_score(
    State(state): State<Arc<AppState>>,
    Form(form): Form<ScoreForm>,
) -> impl IntoResponse {
    let mut sheet = match decode_sheet(&form.sheet) {
        Ok(sheet) => sheet,
        Err(e) => {
            tracing::warn!("Unreadable fixture sheet: {}", e);
            return Html(render_sheet(&[], notice("The fixture sheet could not be read")).into_string());
        }
    };

    let (Some(team1), Some(team2)) = (parse_count(&form.team1_score), parse_count(&form.team2_score)) else {
        return Html(render_sheet(&sheet, notice("Please enter scores for both teams")).into_string());
    };
    if team1 > MAX_SCORE || team2 > MAX_SCORE {
        return Html(render_sheet(&sheet, notice("Scores must be between 0 and 99")).into_string());
    }
    let score = Score::new(team1, team2);

    let submission = match sheet.get(form.index) {
        Some(fixture) if !fixture.is_played() => fixture.submission(score),
        Some(_) => {
            return Html(render_sheet(&sheet, notice("This match already has a score")).into_string());
        }
        None => {
            return Html(render_sheet(&sheet, notice("Unknown match")).into_string());
        }
    };

    let banner = match state.api.submit_scores(&submission).await {
        Ok(_) => {
            fixtures::record_score(&mut sheet, form.index, score);
            success("Match scores have been saved")
        }
        Err(e) => {
            tracing::error!("{}", e);
            notice(&e.notice())
        }
    };

    Html(render_sheet(&sheet, banner).into_string())
}

fn parse_count(raw: &str) -> Option<u32> {
    raw.trim().parse().ok()
}

fn render_round_select(rounds: &[u32], ready: bool) -> Markup {
    html! {
        label {
            "Number of Rounds"
            select name="rounds" disabled[rounds.is_empty()] {
                @for round in rounds {
                    option value=(round) {
                        (round) @if *round == 1 { " Round" } @else { " Rounds" }
                    }
                }
            }
        }
        @if !ready {
            small class="secondary" { "Select courts and players first" }
        } @else if rounds.is_empty() {
            small class="secondary" { "No schedule exists for this many players and courts" }
        }
    }
}

/// Fixture sheet with score forms, plus the leaderboard computed from it
fn render_sheet(sheet: &[Fixture], banner: Markup) -> Markup {
    let encoded = encode_sheet(sheet);
    let standings = aggregate(&fixtures::records(sheet));

    html! {
        (banner)
        input type="hidden" id="sheet-state" name="sheet" value=(encoded);

        div class="grid" {
            div {
                h3 { "Match Schedule" }
                @if sheet.is_empty() {
                    p class="secondary" { "Select players and click 'Generate Match'" }
                }
                @for (round, entries) in by_round(sheet) {
                    h4 { "Round " (round + 1) }
                    @for (index, fixture) in entries {
                        (render_fixture(index, fixture, &encoded))
                    }
                }
            }
            div {
                (render_leaderboard(&standings))
            }
        }
    }
}

fn render_fixture(index: usize, fixture: &Fixture, encoded: &str) -> Markup {
    let slot = |name: &str| if name.is_empty() { "-".to_string() } else { name.to_string() };
    let [a, b] = fixture.team1();
    let [c, d] = fixture.team2();

    html! {
        article {
            header {
                small { "Court " (fixture.court) " · " (fixture.game_mode) " · " (fixture.match_type) " · " (fixture.date.format("%d/%m/%Y")) }
            }
            @match fixture.score {
                Some(score) => {
                    p {
                        (slot(a)) " & " (slot(b))
                        strong { " " (score.team1) " - " (score.team2) " " }
                        (slot(c)) " & " (slot(d))
                    }
                },
                None => {
                    form hx-post="/fixtures/score" hx-target="#sheet" {
                        input type="hidden" name="index" value=(index);
                        input type="hidden" name="sheet" value=(encoded);
                        div class="grid" style="align-items: center;" {
                            span { (slot(a)) " & " (slot(b)) }
                            input type="number" name="team1_score" min="0" placeholder="Score" required;
                            input type="number" name="team2_score" min="0" placeholder="Score" required;
                            span { (slot(c)) " & " (slot(d)) }
                            button type="submit" { "Update" }
                        }
                    }
                },
            }
        }
    }
}

/// Leaderboard table for a set of standings
pub fn render_leaderboard(standings: &[Standing]) -> Markup {
    html! {
        article {
            header {
                strong { "Leaderboard" }
                br;
                small class="secondary" { "Player rankings and statistics" }
            }
            @if standings.is_empty() {
                p class="secondary" { "No results yet." }
            } @else {
                table {
                    thead {
                        tr {
                            th { "#" }
                            th { "Player" }
                            th { "P" }
                            th { "W/L" }
                            th { "+/-" }
                        }
                    }
                    tbody {
                        @for (i, standing) in standings.iter().enumerate() {
                            tr {
                                td { (position_marker(i + 1)) (i + 1) }
                                td { (standing.name) }
                                td { (standing.played()) }
                                td {
                                    (standing.wins) "/" (standing.losses)
                                    @if standing.draws > 0 {
                                        " (" (standing.draws) " D)"
                                    }
                                }
                                td { (signed(standing.point_diff())) }
                            }
                        }
                    }
                }
            }
        }
    }
}

fn position_marker(position: usize) -> &'static str {
    match position {
        1 => "🏆 ",
        2 => "🥈 ",
        3 => "🥉 ",
        _ => "",
    }
}
