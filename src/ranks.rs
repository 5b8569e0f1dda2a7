use crate::models::PlayerProfile;
use std::fmt;

/// Cosmetic rank band over the rating scale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tier {
    Unreal,
    Champion,
    Elite,
    Diamond,
    Platinum,
    Gold,
    Silver,
    Bronze,
}

/// Inclusive lower bounds, highest first. Anything below the last is Bronze.
const THRESHOLDS: &[(f64, Tier)] = &[
    (60.0, Tier::Unreal),
    (50.0, Tier::Champion),
    (40.0, Tier::Elite),
    (30.0, Tier::Diamond),
    (25.0, Tier::Platinum),
    (20.0, Tier::Gold),
    (15.0, Tier::Silver),
];

impl Tier {
    /// All tiers, highest first
    pub const ALL: &'static [Tier] = &[
        Tier::Unreal,
        Tier::Champion,
        Tier::Elite,
        Tier::Diamond,
        Tier::Platinum,
        Tier::Gold,
        Tier::Silver,
        Tier::Bronze,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Tier::Unreal => "Unreal",
            Tier::Champion => "Champion",
            Tier::Elite => "Elite",
            Tier::Diamond => "Diamond",
            Tier::Platinum => "Platinum",
            Tier::Gold => "Gold",
            Tier::Silver => "Silver",
            Tier::Bronze => "Bronze",
        }
    }

    fn slug(self) -> &'static str {
        match self {
            Tier::Unreal => "unreal",
            Tier::Champion => "champion",
            Tier::Elite => "elite",
            Tier::Diamond => "diamond",
            Tier::Platinum => "platinum",
            Tier::Gold => "gold",
            Tier::Silver => "silver",
            Tier::Bronze => "bronze",
        }
    }

    pub fn icon(self) -> String {
        format!("/assets/ranks/{}_rank.webp", self.slug())
    }

    pub fn background(self) -> String {
        format!("/assets/ranks/{}_bg.png", self.slug())
    }

    /// Inclusive lower bound (Bronze has none)
    pub fn min_rating(self) -> Option<f64> {
        THRESHOLDS
            .iter()
            .find(|(_, tier)| *tier == self)
            .map(|(threshold, _)| *threshold)
    }

    /// Exclusive upper bound (the top tier has none)
    pub fn max_rating(self) -> Option<f64> {
        let pos = Tier::ALL.iter().position(|t| *t == self)?;
        let above = Tier::ALL.get(pos.checked_sub(1)?)?;
        above.min_rating()
    }

    /// Human-readable range, e.g. "15 – 20", "60+", "<15"
    pub fn range_label(self) -> String {
        match (self.min_rating(), self.max_rating()) {
            (Some(min), Some(max)) => format!("{} – {}", min, max),
            (Some(min), None) => format!("{}+", min),
            (None, Some(max)) => format!("<{}", max),
            (None, None) => String::new(),
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Classify a rating by scanning the thresholds from the top down
pub fn classify(rating: f64) -> Tier {
    THRESHOLDS
        .iter()
        .find(|(threshold, _)| rating >= *threshold)
        .map(|(_, tier)| *tier)
        .unwrap_or(Tier::Bronze)
}

/// A tier with the players whose rating falls in it
#[derive(Debug, Clone)]
pub struct Division<'a> {
    pub tier: Tier,
    pub players: Vec<&'a PlayerProfile>,
}

/// Group players into every tier, highest first. Empty tiers are kept.
pub fn divisions(players: &[PlayerProfile]) -> Vec<Division<'_>> {
    Tier::ALL
        .iter()
        .map(|&tier| Division {
            tier,
            players: players
                .iter()
                .filter(|p| classify(p.current_rating) == tier)
                .collect(),
        })
        .collect()
}

/// 1-based position of a player when ordered by rating descending
pub fn standing_position(players: &[PlayerProfile], player_id: i64) -> Option<usize> {
    let target = players.iter().find(|p| p.id == player_id)?;
    let above = players
        .iter()
        .filter(|p| p.current_rating > target.current_rating)
        .count();
    let tied_before = players
        .iter()
        .take_while(|p| p.id != player_id)
        .filter(|p| p.current_rating == target.current_rating)
        .count();
    Some(above + tied_before + 1)
}
