use crate::ranks::Tier;
use maud::{html, Markup, DOCTYPE};

/// Navigation entries: (page key, href, label)
const NAV: &[(&str, &str, &str)] = &[
    ("home", "/", "Home"),
    ("roster", "/roster", "Players"),
    ("history", "/history", "Match History"),
    ("fixtures", "/fixtures", "Generate Fixtures"),
    ("analytics", "/analytics", "Analytics"),
    ("ranks", "/ranks", "Ranks"),
    ("calendar", "/calendar", "Calendar"),
];

/// Base layout wrapper for all pages
pub fn base(title: &str, current_page: &str, club_name: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) " - " (club_name) }
                // PicoCSS
                link rel="stylesheet" href="https://cdn.jsdelivr.net/npm/@picocss/pico@2/css/pico.min.css";
                // htmx
                script src="https://unpkg.com/htmx.org@2.0.4" {}
                // Custom styles
                style {
                    r#"
                    .nav-buttons { display: flex; gap: 0.5rem; flex-wrap: wrap; margin-bottom: 1rem; }
                    .nav-buttons a { flex: 1; text-align: center; min-width: 120px; }
                    .team-grid { display: grid; grid-template-columns: 1fr 1fr; gap: 1rem; }
                    .card-grid { display: grid; grid-template-columns: repeat(auto-fill, minmax(220px, 1fr)); gap: 1rem; }
                    .player-list { list-style: none; padding: 0; }
                    .player-list li { padding: 0.5rem; border-bottom: 1px solid var(--pico-muted-border-color); }
                    .checkbox-grid { display: grid; grid-template-columns: repeat(auto-fill, minmax(200px, 1fr)); gap: 0.5rem; }
                    .header-row { display: flex; justify-content: space-between; align-items: center; flex-wrap: wrap; gap: 1rem; margin-bottom: 1rem; }
                    .notice { padding: 0.75rem 1rem; border-radius: 4px; background: var(--pico-del-color); color: #fff; }
                    .notice.success { background: var(--pico-ins-color); }
                    .winner { font-weight: bold; }
                    .loser { color: var(--pico-muted-color); }
                    .rank-icon { width: 2rem; height: 2rem; vertical-align: middle; margin-right: 0.5rem; }
                    .avatar { width: 3rem; height: 3rem; border-radius: 50%; object-fit: cover; object-position: 50% 25%; }
                    .initials { display: inline-flex; width: 3rem; height: 3rem; border-radius: 50%; align-items: center; justify-content: center; background: var(--pico-secondary-background); color: var(--pico-secondary-inverse); }
                    .rank-banner { background-size: cover; background-position: center; padding: 2rem; color: #fff; border-radius: 4px; }
                    .week-grid { display: grid; grid-template-columns: repeat(7, 1fr); gap: 0.5rem; }
                    .week-grid .today { outline: 2px solid var(--pico-primary); }
                    .has-event { background: rgb(187, 247, 208); font-weight: bold; }
                    .chart-container { position: relative; height: 240px; }
                    "#
                }
            }
            body {
                main class="container" {
                    div class="header-row" {
                        h1 style="margin: 0;" { (club_name) }
                    }

                    // Navigation
                    nav class="nav-buttons" {
                        @for (key, href, label) in NAV {
                            a href=(href) role="button" class=(if current_page == *key { "primary" } else { "secondary outline" }) {
                                (label)
                            }
                        }
                    }

                    hr;

                    // Transient notifications land here
                    div id="notices" {}

                    // Page content
                    (content)
                }
            }
        }
    }
}

/// Failure banner shown in place of, or above, stale content
pub fn notice(message: &str) -> Markup {
    html! {
        p class="notice" role="alert" { (message) }
    }
}

pub fn success(message: &str) -> Markup {
    html! {
        p class="notice success" role="status" { (message) }
    }
}

/// Banner for an optional failure
pub fn notices(messages: &[String]) -> Markup {
    html! {
        @for message in messages {
            (notice(message))
        }
    }
}

/// Rank tier icon with its name
pub fn render_tier(tier: Tier) -> Markup {
    html! {
        span class="tier" {
            img class="rank-icon" src=(tier.icon()) alt=(format!("{} rank", tier));
            (tier)
        }
    }
}

/// Format a signed difference with an explicit plus sign
pub fn signed(value: i64) -> String {
    if value > 0 {
        format!("+{}", value)
    } else {
        value.to_string()
    }
}
