use crate::models::{MatchRecord, Outcome};
use std::collections::HashMap;

/// Per-player totals derived from a match list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Standing {
    pub name: String,
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
    pub points_for: u64,
    pub points_against: u64,
}

impl Standing {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    pub fn point_diff(&self) -> i64 {
        self.points_for as i64 - self.points_against as i64
    }

    pub fn played(&self) -> u32 {
        self.wins + self.losses + self.draws
    }
}

/// Fold played matches into standings, ranked by wins then point differential.
///
/// Unplayed matches and empty player slots are skipped. Players are keyed by
/// name, so two players sharing a name are merged. Equal keys keep
/// first-appearance order.
pub fn aggregate(matches: &[MatchRecord]) -> Vec<Standing> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut standings: Vec<Standing> = Vec::new();

    for m in matches {
        let Some(score) = m.score else {
            continue;
        };
        let outcome = score.outcome();

        let sides = [
            (&m.team1, score.team1, score.team2, Outcome::Team1),
            (&m.team2, score.team2, score.team1, Outcome::Team2),
        ];

        for (team, scored, conceded, side) in sides {
            for name in team.iter().filter(|n| !n.is_empty()) {
                let slot = *index.entry(name.as_str()).or_insert_with(|| {
                    standings.push(Standing::new(name));
                    standings.len() - 1
                });
                let entry = &mut standings[slot];

                match outcome {
                    Outcome::Draw => entry.draws += 1,
                    winner if winner == side => entry.wins += 1,
                    _ => entry.losses += 1,
                }
                entry.points_for += u64::from(scored);
                entry.points_against += u64::from(conceded);
            }
        }
    }

    // Stable sort keeps first-appearance order for equal keys
    standings.sort_by(|a, b| {
        b.wins
            .cmp(&a.wins)
            .then_with(|| b.point_diff().cmp(&a.point_diff()))
    });
    standings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Score;

    fn played(team1: [&str; 2], team2: [&str; 2], s1: u32, s2: u32) -> MatchRecord {
        MatchRecord::new(team1, team2, Some(Score::new(s1, s2)))
    }

    fn unplayed(team1: [&str; 2], team2: [&str; 2]) -> MatchRecord {
        MatchRecord::new(team1, team2, None)
    }

    fn find<'a>(standings: &'a [Standing], name: &str) -> &'a Standing {
        standings.iter().find(|s| s.name == name).unwrap()
    }

    #[test]
    fn test_empty_input() {
        assert!(aggregate(&[]).is_empty());
    }

    #[test]
    fn test_split_series() {
        let matches = vec![
            played(["P1", "P2"], ["P3", "P4"], 21, 15),
            played(["P1", "P2"], ["P3", "P4"], 10, 21),
        ];
        let standings = aggregate(&matches);
        assert_eq!(standings.len(), 4);

        for name in ["P1", "P2"] {
            let s = find(&standings, name);
            assert_eq!((s.wins, s.losses), (1, 1));
            assert_eq!(s.point_diff(), -5);
        }
        for name in ["P3", "P4"] {
            let s = find(&standings, name);
            assert_eq!((s.wins, s.losses), (1, 1));
            assert_eq!(s.point_diff(), 5);
        }

        // Same wins, so differential decides
        assert_eq!(standings[0].name, "P3");
        assert_eq!(standings[1].name, "P4");
    }

    #[test]
    fn test_unplayed_only_player_absent() {
        let matches = vec![
            played(["A", "B"], ["C", "D"], 21, 18),
            unplayed(["A", "E"], ["F", "D"]),
        ];
        let standings = aggregate(&matches);
        assert!(standings.iter().all(|s| s.name != "E" && s.name != "F"));
        assert_eq!(find(&standings, "A").played(), 1);
    }

    #[test]
    fn test_genuine_nil_nil_counts_as_draw() {
        let matches = vec![played(["A", "B"], ["C", "D"], 0, 0)];
        let standings = aggregate(&matches);
        assert_eq!(standings.len(), 4);
        assert!(standings.iter().all(|s| s.draws == 1 && s.wins == 0 && s.losses == 0));
    }

    #[test]
    fn test_tie_accrues_points_without_win() {
        let matches = vec![played(["A", "B"], ["C", "D"], 19, 19)];
        let a = aggregate(&matches);
        let a = find(&a, "A");
        assert_eq!((a.wins, a.losses, a.draws), (0, 0, 1));
        assert_eq!((a.points_for, a.points_against), (19, 19));
    }

    #[test]
    fn test_differential_breaks_equal_wins() {
        let matches = vec![
            played(["Low", "L2"], ["X1", "X2"], 21, 16),
            played(["Low", "L2"], ["X1", "X2"], 21, 20),
            played(["Low", "L2"], ["X1", "X2"], 21, 20),
            played(["High", "H2"], ["Y1", "Y2"], 21, 11),
            played(["High", "H2"], ["Y1", "Y2"], 21, 21),
            played(["High", "H2"], ["Y1", "Y2"], 21, 20),
            played(["High", "H2"], ["Y1", "Y2"], 21, 20),
        ];
        let standings = aggregate(&matches);
        let low = find(&standings, "Low");
        let high = find(&standings, "High");
        assert_eq!((low.wins, high.wins), (3, 3));
        assert_eq!((low.point_diff(), high.point_diff()), (7, 12));

        let pos = |name: &str| standings.iter().position(|s| s.name == name).unwrap();
        assert!(pos("High") < pos("Low"));
    }

    #[test]
    fn test_results_add_up_to_matches_played() {
        let matches = vec![
            played(["A", "B"], ["C", "D"], 21, 10),
            played(["A", "C"], ["B", "D"], 15, 21),
            played(["A", "D"], ["B", "C"], 21, 21),
            unplayed(["A", "B"], ["C", "D"]),
        ];
        let standings = aggregate(&matches);
        for s in &standings {
            let appearances = matches
                .iter()
                .filter(|m| m.score.is_some())
                .filter(|m| m.team1.contains(&s.name) || m.team2.contains(&s.name))
                .count() as u32;
            assert_eq!(s.wins + s.losses + s.draws, appearances, "{}", s.name);
        }
    }

    #[test]
    fn test_equal_keys_keep_first_appearance() {
        let matches = vec![
            played(["Zed", "Amy"], ["Bob", "Cat"], 21, 21),
        ];
        let names: Vec<_> = aggregate(&matches).into_iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["Zed", "Amy", "Bob", "Cat"]);
    }

    #[test]
    fn test_shared_name_collides() {
        let matches = vec![
            played(["Sam", "B"], ["C", "D"], 21, 10),
            played(["E", "F"], ["Sam", "G"], 21, 10),
        ];
        let standings = aggregate(&matches);
        let sam = find(&standings, "Sam");
        assert_eq!((sam.wins, sam.losses), (1, 1));
        assert_eq!(standings.iter().filter(|s| s.name == "Sam").count(), 1);
    }

    #[test]
    fn test_empty_slots_skipped() {
        let matches = vec![MatchRecord::new(["A", ""], ["C", "D"], Some(Score::new(21, 10)))];
        let standings = aggregate(&matches);
        assert_eq!(standings.len(), 3);
        assert!(standings.iter().all(|s| !s.name.is_empty()));
        assert_eq!(standings[0].name, "A");
    }

    #[test]
    fn test_large_scores_do_not_overflow() {
        let matches = vec![
            played(["A", "B"], ["C", "D"], u32::MAX, 1),
            played(["A", "B"], ["C", "D"], u32::MAX, 1),
        ];
        let standings = aggregate(&matches);
        let a = find(&standings, "A");
        assert_eq!(a.points_for, 2 * u64::from(u32::MAX));
        assert_eq!(a.point_diff(), 2 * (i64::from(u32::MAX) - 1));
        assert_eq!(find(&standings, "C").point_diff(), -2 * (i64::from(u32::MAX) - 1));
    }
}
