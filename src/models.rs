use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Date format used by the club API for match dates
pub const MATCH_DATE_FORMAT: &str = "%d/%m/%Y";
pub const RECENT_MATCH_LIMIT: usize = 5;

/// Game mode of a fixture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GameMode {
    #[default]
    Melee,
    Elimination,
    Swiss,
    Luxembourg,
}

impl GameMode {
    pub const ALL: &'static [GameMode] = &[
        GameMode::Melee,
        GameMode::Elimination,
        GameMode::Swiss,
        GameMode::Luxembourg,
    ];
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameMode::Melee => write!(f, "Melee"),
            GameMode::Elimination => write!(f, "Elimination"),
            GameMode::Swiss => write!(f, "Swiss"),
            GameMode::Luxembourg => write!(f, "Luxembourg"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MatchType {
    #[default]
    Singles,
    Doubles,
}

impl MatchType {
    pub const ALL: &'static [MatchType] = &[MatchType::Singles, MatchType::Doubles];
}

impl fmt::Display for MatchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchType::Singles => write!(f, "Singles"),
            MatchType::Doubles => write!(f, "Doubles"),
        }
    }
}

/// Final scoreline of a played match.
///
/// A match that has not been played has no `Score` at all, so a genuine
/// 0-0 result stays representable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    pub team1: u32,
    pub team2: u32,
}

impl Score {
    pub fn new(team1: u32, team2: u32) -> Self {
        Self { team1, team2 }
    }

    /// Translate the club API's score pair, where (0, 0) marks an unplayed match
    pub fn from_wire(team1: u32, team2: u32) -> Option<Score> {
        if team1 == 0 && team2 == 0 {
            None
        } else {
            Some(Score { team1, team2 })
        }
    }

    pub fn outcome(&self) -> Outcome {
        match self.team1.cmp(&self.team2) {
            Ordering::Greater => Outcome::Team1,
            Ordering::Less => Outcome::Team2,
            Ordering::Equal => Outcome::Draw,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Team1,
    Team2,
    Draw,
}

/// Two teams of two plus an optional result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub team1: [String; 2],
    pub team2: [String; 2],
    pub score: Option<Score>,
}

impl MatchRecord {
    pub fn new(team1: [&str; 2], team2: [&str; 2], score: Option<Score>) -> Self {
        Self {
            team1: team1.map(str::to_string),
            team2: team2.map(str::to_string),
            score,
        }
    }
}

/// Player from `GET /api/players`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub player_id: i64,
    pub name: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

impl Player {
    /// Initials shown when no avatar is set ("Jane Doe" -> "JD")
    pub fn initials(&self) -> String {
        self.name
            .split_whitespace()
            .filter_map(|part| part.chars().next())
            .collect()
    }
}

/// Form data for creating a new player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPlayer {
    pub name: String,
    pub role: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreatedPlayer {
    pub id: i64,
    pub name: String,
    pub role: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlayerCreated {
    #[serde(default)]
    pub message: Option<String>,
    pub player: CreatedPlayer,
}

/// Player profile with rating and derived stats from `GET /api/players/stats`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerProfile {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    pub current_rating: f64,
    #[serde(default)]
    pub rating_deviation: f64,
    #[serde(default)]
    pub matches_played: u32,
    #[serde(default)]
    pub wins: u32,
    #[serde(default)]
    pub losses: u32,
    #[serde(default)]
    pub win_rate: f64,
    #[serde(default)]
    pub average_mov: Option<f64>,
    #[serde(default)]
    pub average_mol: Option<f64>,
    #[serde(default)]
    pub win_streak: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingPoint {
    pub date: String,
    pub rating: f64,
}

/// Which side of a recent match the player was on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Team1,
    Team2,
}

impl<'de> Deserialize<'de> for Side {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match u8::deserialize(deserializer)? {
            1 => Ok(Side::Team1),
            2 => Ok(Side::Team2),
            other => Err(serde::de::Error::custom(format!("invalid team {}", other))),
        }
    }
}

/// Match summary from `GET /api/players/{id}/recent-matches`
#[derive(Debug, Clone, Deserialize)]
pub struct RecentMatch {
    pub match_date: String,
    pub player1_name: String,
    pub player2_name: String,
    pub player3_name: String,
    pub player4_name: String,
    pub team1_score: u32,
    pub team2_score: u32,
    pub player_team: Side,
}

impl RecentMatch {
    /// Whether the player's side won this match
    pub fn won(&self) -> bool {
        match self.player_team {
            Side::Team1 => self.team1_score > self.team2_score,
            Side::Team2 => self.team2_score > self.team1_score,
        }
    }
}

/// History row from `GET /api/matches`
#[derive(Debug, Clone, Deserialize)]
pub struct MatchRow {
    pub match_id: i64,
    pub match_date: String,
    #[serde(default)]
    pub match_type: Option<String>,
    #[serde(default)]
    pub game_mode_type: Option<String>,
    #[serde(default)]
    pub player1_name: Option<String>,
    #[serde(default)]
    pub player2_name: Option<String>,
    #[serde(default)]
    pub player3_name: Option<String>,
    #[serde(default)]
    pub player4_name: Option<String>,
    #[serde(default)]
    pub player1_score: u32,
    #[serde(default)]
    pub player2_score: u32,
    #[serde(default)]
    pub player3_score: u32,
    #[serde(default)]
    pub player4_score: u32,
}

impl MatchRow {
    /// Team scores; both players of a team carry the same score, the first non-zero wins
    pub fn team_scores(&self) -> (u32, u32) {
        let pick = |a: u32, b: u32| if a != 0 { a } else { b };
        (
            pick(self.player1_score, self.player2_score),
            pick(self.player3_score, self.player4_score),
        )
    }

    pub fn score(&self) -> Option<Score> {
        let (team1, team2) = self.team_scores();
        Score::from_wire(team1, team2)
    }

    pub fn names(&self) -> [&str; 4] {
        [
            &self.player1_name,
            &self.player2_name,
            &self.player3_name,
            &self.player4_name,
        ]
        .map(|n| n.as_deref().unwrap_or(""))
    }

    pub fn date(&self) -> Option<NaiveDate> {
        parse_match_date(&self.match_date)
    }

    /// Case-insensitive match on any of the four player names
    pub fn involves(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        self.names()
            .iter()
            .any(|name| name.to_lowercase().contains(&query))
    }

    pub fn to_record(&self) -> MatchRecord {
        let [p1, p2, p3, p4] = self.names();
        MatchRecord::new([p1, p2], [p3, p4], self.score())
    }
}

/// Parse a `DD/MM/YYYY` match date
pub fn parse_match_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), MATCH_DATE_FORMAT).ok()
}

/// Sort history newest first, then by match ID descending. Unparseable dates go last.
pub fn sort_history(rows: &mut [MatchRow]) {
    rows.sort_by(|a, b| match (a.date(), b.date()) {
        (Some(da), Some(db)) => db.cmp(&da).then(b.match_id.cmp(&a.match_id)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => b.match_id.cmp(&a.match_id),
    });
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct FeasibleRound {
    pub round: u32,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct ScheduleRequest {
    pub num_courts: u32,
    pub num_players: u32,
    pub num_rounds: u32,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ScheduleCreated {
    pub schedule_id: i64,
}

/// One court of one round; team members are player numbers as strings
#[derive(Debug, Clone, Deserialize)]
pub struct ScheduleRound {
    pub round: u32,
    pub court: u32,
    pub team1: Vec<String>,
    pub team2: Vec<String>,
}

/// Form body for `POST /api/update-scores`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreSubmission {
    pub match_date: String,
    pub match_type: String,
    pub game_mode: String,
    pub team1_score_1: u32,
    pub team2_score_1: u32,
    pub player1_1: String,
    pub player2_1: String,
    pub player3_1: String,
    pub player4_1: String,
}

/// Calendar event from `GET /api/events`
#[derive(Debug, Clone, Deserialize)]
pub struct Event {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    pub date: String,
}

impl Event {
    /// Calendar day of the event; accepts plain dates and RFC 3339 timestamps
    pub fn day(&self) -> Option<NaiveDate> {
        let s = self.date.trim();
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .ok()
            .or_else(|| {
                chrono::DateTime::parse_from_rfc3339(s)
                    .ok()
                    .map(|dt| dt.date_naive())
            })
            .or_else(|| s.get(..10).and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok()))
            .or_else(|| parse_match_date(s))
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NewEvent {
    pub title: String,
    pub location: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub description: String,
    pub date: NaiveDate,
}

/// Generic acknowledgement body returned by write endpoints
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiMessage {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ApiMessage {
    /// Rejection reason when the API reports `status: "error"` despite a 2xx status
    pub fn rejection(&self) -> Option<String> {
        if self.status.as_deref() == Some("error") {
            Some(
                self.message
                    .clone()
                    .or_else(|| self.error.clone())
                    .unwrap_or_else(|| "rejected".to_string()),
            )
        } else {
            None
        }
    }
}
