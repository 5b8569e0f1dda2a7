use crate::models::{Event, NewEvent};
use crate::views::layout::{base, notice, notices, success};
use crate::views::{failed_fragment, keep_fragment, or_notice};
use crate::AppState;
use axum::{
    extract::{Query, State},
    response::{Html, IntoResponse, Response},
    Form,
};
use chrono::{Datelike, Days, NaiveDate};
use maud::{html, Markup};
use serde::Deserialize;
use std::sync::Arc;

const EVENT_TYPES: &[&str] = &["Match", "Tournament", "Practice", "Friendly", "Social"];

#[derive(Debug, Deserialize)]
pub struct CalendarParams {
    #[serde(default)]
    date: Option<String>,
}

/// Calendar page - the week around the selected date plus an add-event form
pub async fn page(
    State(state): State<Arc<AppState>>,
    Query(params): Query<CalendarParams>,
) -> impl IntoResponse {
    let today = chrono::Local::now().date_naive();
    let selected = params
        .date
        .as_deref()
        .and_then(parse_day)
        .unwrap_or(today);

    let mut errors = Vec::new();
    let events = or_notice(state.api.events().await, &mut errors);

    let content = html! {
        h2 { "Calendar" }

        details {
            summary { "Add Event" }
            form hx-post="/calendar/events" hx-target="#calendar" hx-on--after-request="if(event.detail.successful) this.reset()" {
                div class="grid" {
                    input type="text" name="title" placeholder="Event title" required;
                    input type="text" name="location" placeholder="Location" required;
                }
                div class="grid" {
                    select name="kind" {
                        @for kind in EVENT_TYPES {
                            option value=(kind) { (kind) }
                        }
                    }
                    input type="date" name="date" value=(selected.format("%Y-%m-%d")) required;
                }
                textarea name="description" placeholder="Description (optional)" {}
                button type="submit" { "Add Event" }
            }
        }

        div id="calendar" {
            (notices(&errors))
            (render_week(selected, today, &events))
        }
    };

    Html(base("Calendar", "calendar", &state.config.club_name, content).into_string())
}

/// Form data for a new event
#[derive(Debug, Deserialize)]
pub struct NewEventForm {
    #[serde(default)]
    title: String,
    #[serde(default)]
    location: String,
    #[serde(default)]
    kind: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    date: String,
}

/// Create an event and re-render its week (htmx endpoint)
pub async fn add_event(
    State(state): State<Arc<AppState>>,
    Form(form): Form<NewEventForm>,
) -> Response {
    let new_event = match validate_event(&form) {
        Ok(new_event) => new_event,
        Err(message) => return keep_fragment(notice(message)),
    };

    if let Err(e) = state.api.create_event(&new_event).await {
        return failed_fragment(&e);
    }
    tracing::info!("Added event {} on {}", new_event.title, new_event.date);
    let banner = success(&format!("Added {}", new_event.title));

    match state.api.events().await {
        Ok(events) => {
            let today = chrono::Local::now().date_naive();
            Html(
                html! {
                    (banner)
                    (render_week(new_event.date, today, &events))
                }
                .into_string(),
            )
            .into_response()
        }
        Err(e) => {
            tracing::error!("{}", e);
            keep_fragment(html! {
                (banner)
                (notice(&e.notice()))
            })
        }
    }
}

fn validate_event(form: &NewEventForm) -> Result<NewEvent, &'static str> {
    let title = form.title.trim();
    let location = form.location.trim();
    let date = parse_day(&form.date);

    match date {
        Some(date) if !title.is_empty() && !location.is_empty() => Ok(NewEvent {
            title: title.to_string(),
            location: location.to_string(),
            kind: form.kind.trim().to_string(),
            description: form.description.trim().to_string(),
            date,
        }),
        _ => Err("Please fill in title, location and date"),
    }
}

fn parse_day(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
}

/// The Monday-to-Sunday week containing `date`, clamped at the ends of the
/// representable calendar
pub fn week_of(date: NaiveDate) -> [NaiveDate; 7] {
    let monday = date
        .checked_sub_days(Days::new(u64::from(date.weekday().num_days_from_monday())))
        .unwrap_or(NaiveDate::MIN);
    std::array::from_fn(|i| {
        monday
            .checked_add_days(Days::new(i as u64))
            .unwrap_or(NaiveDate::MAX)
    })
}

/// Events falling on `day`; events with unreadable dates are skipped
pub fn events_on(events: &[Event], day: NaiveDate) -> Vec<&Event> {
    events.iter().filter(|e| e.day() == Some(day)).collect()
}

fn render_week(selected: NaiveDate, today: NaiveDate, events: &[Event]) -> Markup {
    let week = week_of(selected);
    let prev = selected.checked_sub_days(Days::new(7));
    let next = selected.checked_add_days(Days::new(7));

    html! {
        div class="header-row" {
            @if let Some(prev) = prev {
                a href=(format!("/calendar?date={}", prev.format("%Y-%m-%d"))) role="button" class="secondary outline" { "← Previous" }
            } @else {
                span {}
            }
            strong { (week[0].format("%-d %b")) " – " (week[6].format("%-d %b %Y")) }
            @if let Some(next) = next {
                a href=(format!("/calendar?date={}", next.format("%Y-%m-%d"))) role="button" class="secondary outline" { "Next →" }
            } @else {
                span {}
            }
        }

        div class="week-grid" {
            @for day in week {
                @let day_events = events_on(events, day);
                article class=(day_class(day == today, !day_events.is_empty())) {
                    header {
                        small { (day.format("%a")) }
                        br;
                        strong { (day.format("%-d")) }
                    }
                    @for event in day_events {
                        p {
                            strong { (event.title) }
                            @if let Some(location) = &event.location {
                                br;
                                small {
                                    @if let Some(kind) = event.kind.as_deref().filter(|k| !k.is_empty()) {
                                        (kind) " • "
                                    }
                                    (location)
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

fn day_class(is_today: bool, has_event: bool) -> &'static str {
    match (is_today, has_event) {
        (true, true) => "today has-event",
        (true, false) => "today",
        (false, true) => "has-event",
        (false, false) => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn make_event(title: &str, date: &str) -> Event {
        Event {
            id: 1,
            title: title.to_string(),
            location: Some("Sports Hall".to_string()),
            kind: Some("Practice".to_string()),
            description: None,
            date: date.to_string(),
        }
    }

    fn make_form(title: &str, location: &str, date: &str) -> NewEventForm {
        NewEventForm {
            title: title.to_string(),
            location: location.to_string(),
            kind: "Match".to_string(),
            description: String::new(),
            date: date.to_string(),
        }
    }

    #[test]
    fn test_week_starts_on_monday() {
        // Saturday
        let week = week_of(d(2024, 3, 9));
        assert_eq!(week[0], d(2024, 3, 4));
        assert_eq!(week[6], d(2024, 3, 10));

        // Sunday stays in the week that began the previous Monday
        assert_eq!(week_of(d(2024, 3, 10))[0], d(2024, 3, 4));
        assert_eq!(week_of(d(2024, 3, 4))[0], d(2024, 3, 4));
    }

    #[test]
    fn test_week_crosses_month() {
        let week = week_of(d(2024, 3, 1));
        assert_eq!(week[0], d(2024, 2, 26));
        assert_eq!(week[3], d(2024, 2, 29));
    }

    #[test]
    fn test_events_on_day() {
        let events = vec![
            make_event("Club night", "2024-03-06"),
            make_event("Friendly", "2024-03-06T19:00:00Z"),
            make_event("Cup", "2024-03-09"),
            make_event("Broken", "soon"),
        ];
        let titles: Vec<&str> = events_on(&events, d(2024, 3, 6))
            .iter()
            .map(|e| e.title.as_str())
            .collect();
        assert_eq!(titles, vec!["Club night", "Friendly"]);
        assert!(events_on(&events, d(2024, 3, 7)).is_empty());
    }

    #[test]
    fn test_event_validation() {
        assert!(validate_event(&make_form("", "Hall", "2024-03-06")).is_err());
        assert!(validate_event(&make_form("Cup", "  ", "2024-03-06")).is_err());
        assert!(validate_event(&make_form("Cup", "Hall", "")).is_err());

        let event = validate_event(&make_form(" Cup ", "Hall", "2024-03-06")).unwrap();
        assert_eq!(event.title, "Cup");
        assert_eq!(event.date, d(2024, 3, 6));
    }

    #[test]
    fn test_calendar_edges_do_not_overflow() {
        let last = parse_day("+262142-12-31").unwrap();
        assert_eq!(last, NaiveDate::MAX);
        let week = week_of(last);
        assert_eq!(week[6], NaiveDate::MAX);
        let html = render_week(last, d(2024, 3, 9), &[]).into_string();
        assert!(html.contains("← Previous"));
        assert!(!html.contains("Next →"));

        let week = week_of(NaiveDate::MIN);
        assert_eq!(week[0], NaiveDate::MIN);
        let html = render_week(NaiveDate::MIN, d(2024, 3, 9), &[]).into_string();
        assert!(!html.contains("← Previous"));
        assert!(html.contains("Next →"));
    }

    #[tokio::test]
    async fn test_failed_add_keeps_current_week() {
        let state = crate::views::test_support::failing_state().await;
        let body = crate::views::test_support::kept_body(
            add_event(State(state), Form(make_form("Cup", "Hall", "2024-03-06"))).await,
        )
        .await;
        assert!(body.contains("Request failed: could not add event"));
        assert!(!body.contains("week-grid"));
    }

    #[tokio::test]
    async fn test_invalid_event_keeps_current_week() {
        let state = crate::views::test_support::failing_state().await;
        let body = crate::views::test_support::kept_body(
            add_event(State(state), Form(make_form("", "Hall", "2024-03-06"))).await,
        )
        .await;
        assert!(body.contains("Please fill in title, location and date"));
    }

    #[test]
    fn test_week_highlights_event_days() {
        let events = vec![make_event("Club night", "2024-03-06")];
        let html = render_week(d(2024, 3, 9), d(2024, 3, 9), &events).into_string();
        assert_eq!(html.matches(r#"class="has-event""#).count(), 1);
        assert!(html.contains(r#"class="today""#));
        assert!(html.contains("Practice • Sports Hall"));
        assert!(html.contains("/calendar?date=2024-03-02"));
        assert!(html.contains("/calendar?date=2024-03-16"));
    }
}
