use crate::error::ApiError;
use crate::models::{
    ApiMessage, Event, FeasibleRound, MatchRow, NewEvent, NewPlayer, Player, PlayerCreated,
    PlayerProfile, RatingPoint, RecentMatch, ScheduleCreated, ScheduleRequest, ScheduleRound,
    ScoreSubmission,
};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use std::time::Duration;

const USER_AGENT: &str = concat!("club-dashboard/", env!("CARGO_PKG_VERSION"));

/// Typed client for the club REST API.
///
/// Requests are independent: no retries, no caching. Cloning is cheap and
/// shares the underlying connection pool.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for an API-relative path such as an avatar
    pub fn resolve(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else {
            format!("{}/{}", self.base_url, path.trim_start_matches('/'))
        }
    }

    // --- Players ---

    /// All players, or up to ten whose name contains `search`
    pub async fn players(&self, search: Option<&str>) -> Result<Vec<Player>, ApiError> {
        let mut request = self.client.get(self.resolve("/api/players"));
        if let Some(q) = search.map(str::trim).filter(|q| !q.is_empty()) {
            request = request.query(&[("search", q)]);
        }
        self.fetch("fetch players", request).await
    }

    pub async fn create_player(&self, player: &NewPlayer) -> Result<PlayerCreated, ApiError> {
        let request = self.client.post(self.resolve("/api/players")).json(player);
        self.fetch("add player", request).await
    }

    pub async fn player_stats(&self) -> Result<Vec<PlayerProfile>, ApiError> {
        let request = self.client.get(self.resolve("/api/players/stats"));
        self.fetch("fetch player statistics", request).await
    }

    /// Ask the API to recompute and persist player statistics
    pub async fn refresh_stats(&self) -> Result<ApiMessage, ApiError> {
        let request = self.client.post(self.resolve("/api/stats/update"));
        self.acknowledge("update player statistics", request).await
    }

    pub async fn rating_history(&self, player_id: i64) -> Result<Vec<RatingPoint>, ApiError> {
        let path = format!("/api/players/{}/rating-history", player_id);
        let request = self.client.get(self.resolve(&path));
        self.fetch("fetch rating history", request).await
    }

    pub async fn recent_matches(&self, player_id: i64) -> Result<Vec<RecentMatch>, ApiError> {
        let path = format!("/api/players/{}/recent-matches", player_id);
        let request = self.client.get(self.resolve(&path));
        self.fetch("fetch recent matches", request).await
    }

    // --- Matches ---

    pub async fn matches(&self) -> Result<Vec<MatchRow>, ApiError> {
        let request = self.client.get(self.resolve("/api/matches"));
        self.fetch("fetch matches", request).await
    }

    pub async fn submit_scores(&self, submission: &ScoreSubmission) -> Result<ApiMessage, ApiError> {
        let request = self
            .client
            .post(self.resolve("/api/update-scores"))
            .form(submission);
        self.acknowledge("save match scores", request).await
    }

    // --- Fixtures ---

    pub async fn feasible_rounds(&self, courts: u32, players: u32) -> Result<Vec<u32>, ApiError> {
        let request = self
            .client
            .get(self.resolve("/api/feasible-rounds"))
            .query(&[("courts", courts), ("players", players)]);
        let rounds: Vec<FeasibleRound> = self.fetch("fetch feasible rounds", request).await?;
        Ok(rounds.into_iter().map(|r| r.round).collect())
    }

    pub async fn create_schedule(&self, schedule: ScheduleRequest) -> Result<ScheduleCreated, ApiError> {
        let request = self.client.post(self.resolve("/api/schedules")).json(&schedule);
        self.fetch("find a schedule", request).await
    }

    pub async fn schedule_rounds(&self, schedule_id: i64) -> Result<Vec<ScheduleRound>, ApiError> {
        let path = format!("/api/schedule-rounds/{}", schedule_id);
        let request = self.client.get(self.resolve(&path));
        self.fetch("fetch schedule rounds", request).await
    }

    /// Look up a schedule and fetch its rounds
    pub async fn schedule(&self, schedule: ScheduleRequest) -> Result<Vec<ScheduleRound>, ApiError> {
        let created = self.create_schedule(schedule).await?;
        self.schedule_rounds(created.schedule_id).await
    }

    // --- Calendar ---

    pub async fn events(&self) -> Result<Vec<Event>, ApiError> {
        let request = self.client.get(self.resolve("/api/events"));
        self.fetch("fetch events", request).await
    }

    pub async fn create_event(&self, event: &NewEvent) -> Result<ApiMessage, ApiError> {
        let request = self.client.post(self.resolve("/api/events")).json(event);
        self.acknowledge("add event", request).await
    }

    // --- Helpers ---

    async fn fetch<T: DeserializeOwned>(
        &self,
        what: &'static str,
        request: RequestBuilder,
    ) -> Result<T, ApiError> {
        tracing::debug!("club API request: {}", what);

        let response = request
            .send()
            .await
            .map_err(|source| ApiError::Transport { what, source })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status { what, status });
        }

        response
            .json::<T>()
            .await
            .map_err(|source| ApiError::Decode { what, source })
    }

    /// Like `fetch`, but also fails on a 2xx body that reports `status: "error"`
    async fn acknowledge(
        &self,
        what: &'static str,
        request: RequestBuilder,
    ) -> Result<ApiMessage, ApiError> {
        let message: ApiMessage = self.fetch(what, request).await?;
        match message.rejection() {
            Some(reason) => Err(ApiError::Rejected { what, reason }),
            None => Ok(message),
        }
    }
}
