use crate::models::{
    GameMode, MatchRecord, MatchType, Score, ScheduleRound, ScoreSubmission, MATCH_DATE_FORMAT,
};
use chrono::NaiveDate;
use itertools::Itertools;
use serde::{Deserialize, Serialize};

/// A scheduled match on the fixture sheet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fixture {
    pub round: u32,
    pub court: u32,
    pub date: NaiveDate,
    pub game_mode: GameMode,
    pub match_type: MatchType,
    /// Team 1 is the first two slots, team 2 the last two. Empty when the schedule left a gap.
    pub players: [String; 4],
    pub score: Option<Score>,
}

impl Fixture {
    pub fn team1(&self) -> [&str; 2] {
        [self.players[0].as_str(), self.players[1].as_str()]
    }

    pub fn team2(&self) -> [&str; 2] {
        [self.players[2].as_str(), self.players[3].as_str()]
    }

    pub fn is_played(&self) -> bool {
        self.score.is_some()
    }

    pub fn to_record(&self) -> MatchRecord {
        MatchRecord::new(self.team1(), self.team2(), self.score)
    }

    /// Form body for the club API's score endpoint
    pub fn submission(&self, score: Score) -> ScoreSubmission {
        let [p1, p2, p3, p4] = self.players.clone();
        ScoreSubmission {
            match_date: self.date.format(MATCH_DATE_FORMAT).to_string(),
            match_type: self.match_type.to_string(),
            game_mode: self.game_mode.to_string(),
            team1_score_1: score.team1,
            team2_score_1: score.team2,
            player1_1: p1,
            player2_1: p2,
            player3_1: p3,
            player4_1: p4,
        }
    }
}

/// Settings shared by every fixture of a generated sheet
#[derive(Debug, Clone, Copy)]
pub struct SheetSettings {
    pub date: NaiveDate,
    pub game_mode: GameMode,
    pub match_type: MatchType,
}

/// Map schedule rounds (player numbers) onto the selected player names
pub fn build_sheet(
    rounds: &[ScheduleRound],
    selected: &[String],
    settings: SheetSettings,
) -> Vec<Fixture> {
    let name_for = |number: Option<&String>| -> String {
        number
            .and_then(|n| n.trim().parse::<usize>().ok())
            .and_then(|i| selected.get(i))
            .cloned()
            .unwrap_or_default()
    };

    rounds
        .iter()
        .map(|r| Fixture {
            round: r.round,
            court: r.court,
            date: settings.date,
            game_mode: settings.game_mode,
            match_type: settings.match_type,
            players: [
                name_for(r.team1.first()),
                name_for(r.team1.get(1)),
                name_for(r.team2.first()),
                name_for(r.team2.get(1)),
            ],
            score: None,
        })
        .collect()
}

/// Record a score on one fixture. Returns false if the index is out of range
/// or the fixture already has a result.
pub fn record_score(sheet: &mut [Fixture], index: usize, score: Score) -> bool {
    match sheet.get_mut(index) {
        Some(fixture) if fixture.score.is_none() => {
            fixture.score = Some(score);
            true
        }
        _ => false,
    }
}

/// Fixtures grouped by round, keeping sheet indices for score forms
pub fn by_round(sheet: &[Fixture]) -> Vec<(u32, Vec<(usize, &Fixture)>)> {
    let chunks = sheet
        .iter()
        .enumerate()
        .sorted_by_key(|(i, f)| (f.round, f.court, *i))
        .chunk_by(|(_, f)| f.round);
    let grouped = chunks
        .into_iter()
        .map(|(round, group)| (round, group.collect()))
        .collect();
    grouped
}

pub fn records(sheet: &[Fixture]) -> Vec<MatchRecord> {
    sheet.iter().map(Fixture::to_record).collect()
}

/// Serialize the sheet for the hidden form field that carries it between requests
pub fn encode_sheet(sheet: &[Fixture]) -> String {
    serde_json::to_string(sheet).unwrap_or_else(|_| "[]".to_string())
}

pub fn decode_sheet(raw: &str) -> Result<Vec<Fixture>, serde_json::Error> {
    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> SheetSettings {
        SheetSettings {
            date: NaiveDate::from_ymd_opt(2024, 3, 9).unwrap(),
            game_mode: GameMode::Swiss,
            match_type: MatchType::Doubles,
        }
    }

    fn make_round(round: u32, court: u32, team1: [&str; 2], team2: [&str; 2]) -> ScheduleRound {
        ScheduleRound {
            round,
            court,
            team1: team1.iter().map(|s| s.to_string()).collect(),
            team2: team2.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn selected() -> Vec<String> {
        ["Ann", "Ben", "Cai", "Dee", "Eve"].iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_numbers_map_to_selected_names() {
        let rounds = vec![make_round(0, 1, ["3", "0"], ["4", "1"])];
        let sheet = build_sheet(&rounds, &selected(), settings());
        assert_eq!(sheet.len(), 1);
        assert_eq!(sheet[0].team1(), ["Dee", "Ann"]);
        assert_eq!(sheet[0].team2(), ["Eve", "Ben"]);
        assert!(!sheet[0].is_played());
        assert_eq!(sheet[0].game_mode, GameMode::Swiss);
    }

    #[test]
    fn test_unknown_numbers_leave_empty_slots() {
        let rounds = vec![ScheduleRound {
            round: 0,
            court: 1,
            team1: vec!["9".to_string(), "x".to_string()],
            team2: vec!["2".to_string()],
        }];
        let sheet = build_sheet(&rounds, &selected(), settings());
        assert_eq!(sheet[0].players, ["", "", "Cai", ""].map(String::from));
    }

    #[test]
    fn test_record_score_once() {
        let rounds = vec![make_round(0, 1, ["0", "1"], ["2", "3"])];
        let mut sheet = build_sheet(&rounds, &selected(), settings());

        assert!(record_score(&mut sheet, 0, Score::new(21, 17)));
        assert_eq!(sheet[0].score, Some(Score::new(21, 17)));
        assert!(!record_score(&mut sheet, 0, Score::new(1, 1)));
        assert!(!record_score(&mut sheet, 5, Score::new(1, 1)));
        assert_eq!(sheet[0].score, Some(Score::new(21, 17)));
    }

    #[test]
    fn test_submission_uses_api_date_format() {
        let rounds = vec![make_round(0, 1, ["0", "1"], ["2", "3"])];
        let sheet = build_sheet(&rounds, &selected(), settings());
        let body = sheet[0].submission(Score::new(21, 9));
        assert_eq!(body.match_date, "09/03/2024");
        assert_eq!(body.game_mode, "Swiss");
        assert_eq!(body.match_type, "Doubles");
        assert_eq!((body.team1_score_1, body.team2_score_1), (21, 9));
        assert_eq!(body.player4_1, "Dee");
    }

    #[test]
    fn test_group_by_round() {
        let rounds = vec![
            make_round(1, 2, ["0", "1"], ["2", "3"]),
            make_round(0, 1, ["0", "1"], ["2", "3"]),
            make_round(1, 1, ["0", "2"], ["1", "3"]),
            make_round(0, 2, ["4", "1"], ["2", "3"]),
        ];
        let sheet = build_sheet(&rounds, &selected(), settings());
        let grouped = by_round(&sheet);
        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped[0].0, 0);
        let indices: Vec<usize> = grouped[1].1.iter().map(|(i, _)| *i).collect();
        assert_eq!(indices, vec![2, 0]);
    }

    #[test]
    fn test_sheet_survives_hidden_field() {
        let rounds = vec![make_round(0, 1, ["0", "1"], ["2", "3"])];
        let mut sheet = build_sheet(&rounds, &selected(), settings());
        record_score(&mut sheet, 0, Score::new(0, 0));
        let decoded = decode_sheet(&encode_sheet(&sheet)).unwrap();
        assert_eq!(decoded, sheet);
        assert!(decode_sheet("").unwrap().is_empty());
        assert!(decode_sheet("{not json").is_err());
    }

    #[test]
    fn test_leaderboard_ignores_unplayed_fixtures() {
        let rounds = vec![
            make_round(0, 1, ["0", "1"], ["2", "3"]),
            make_round(0, 2, ["4", "0"], ["1", "2"]),
        ];
        let mut sheet = build_sheet(&rounds, &selected(), settings());
        record_score(&mut sheet, 0, Score::new(21, 15));
        let standings = crate::leaderboard::aggregate(&records(&sheet));
        assert_eq!(standings.len(), 4);
        assert!(standings.iter().all(|s| s.name != "Eve"));
    }
}
