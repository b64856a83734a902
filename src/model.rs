use std::fmt;
use std::str::FromStr;

use anyhow::anyhow;
use chrono::NaiveDate;

/// The six nations tracked by the dashboard, in canonical display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Team {
    England,
    France,
    Ireland,
    Italy,
    Scotland,
    Wales,
}

impl Team {
    pub const ALL: [Team; 6] = [
        Team::England,
        Team::France,
        Team::Ireland,
        Team::Italy,
        Team::Scotland,
        Team::Wales,
    ];

    /// Lowercase label used by the seed data.
    pub fn key(self) -> &'static str {
        match self {
            Team::England => "england",
            Team::France => "france",
            Team::Ireland => "ireland",
            Team::Italy => "italy",
            Team::Scotland => "scotland",
            Team::Wales => "wales",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Team::England => "England",
            Team::France => "France",
            Team::Ireland => "Ireland",
            Team::Italy => "Italy",
            Team::Scotland => "Scotland",
            Team::Wales => "Wales",
        }
    }

    pub fn abbr(self) -> &'static str {
        match self {
            Team::England => "ENG",
            Team::France => "FRA",
            Team::Ireland => "IRE",
            Team::Italy => "ITA",
            Team::Scotland => "SCO",
            Team::Wales => "WAL",
        }
    }

    /// Position in `Team::ALL`; the dashboard binds teams to keys 1-6 with it.
    pub fn index(self) -> usize {
        match self {
            Team::England => 0,
            Team::France => 1,
            Team::Ireland => 2,
            Team::Italy => 3,
            Team::Scotland => 4,
            Team::Wales => 5,
        }
    }

    pub fn from_index(idx: usize) -> Option<Team> {
        Team::ALL.get(idx).copied()
    }
}

impl FromStr for Team {
    type Err = anyhow::Error;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let key = raw.trim().to_ascii_lowercase();
        Team::ALL
            .into_iter()
            .find(|team| team.key() == key)
            .ok_or_else(|| anyhow!("unknown team label '{raw}'"))
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Game {
    pub id: u32,
    pub round: u32,
    pub date: NaiveDate,
    pub home: Team,
    pub away: Team,
    pub home_score: Option<u32>,
    pub away_score: Option<u32>,
}

impl Game {
    pub fn is_completed(&self) -> bool {
        self.home_score.is_some() && self.away_score.is_some()
    }

    pub fn involves(&self, team: Team) -> bool {
        self.home == team || self.away == team
    }

    /// The other side of the fixture, or `None` when `team` did not play.
    pub fn opponent_of(&self, team: Team) -> Option<Team> {
        if self.home == team {
            Some(self.away)
        } else if self.away == team {
            Some(self.home)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub id: u32,
    pub name: String,
    pub position: String,
    pub team: Team,
    pub cost: f64,
    pub points: i32,
    pub cost_change: f64,
    pub points_change: i32,
    pub form: Vec<i32>,
}

impl Player {
    pub fn cost_trend(&self) -> Trend {
        Trend::from_delta(self.cost_change, COST_TREND_THRESHOLD)
    }

    pub fn points_trend(&self) -> Trend {
        Trend::from_delta(f64::from(self.points_change), POINTS_TREND_THRESHOLD)
    }
}

const COST_TREND_THRESHOLD: f64 = 0.1;
const POINTS_TREND_THRESHOLD: f64 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    Up,
    Flat,
    Down,
}

impl Trend {
    /// Strictly beyond the threshold counts as movement.
    pub fn from_delta(delta: f64, threshold: f64) -> Self {
        if delta > threshold {
            Trend::Up
        } else if delta < -threshold {
            Trend::Down
        } else {
            Trend::Flat
        }
    }

    pub fn arrow(self) -> &'static str {
        match self {
            Trend::Up => "▲",
            Trend::Flat => "–",
            Trend::Down => "▼",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormBand {
    Hot,
    Solid,
    Cold,
}

impl FormBand {
    pub fn of(points: i32) -> Self {
        if points > 15 {
            FormBand::Hot
        } else if points > 8 {
            FormBand::Solid
        } else {
            FormBand::Cold
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlayerGameStat {
    pub player_id: u32,
    pub game_id: u32,
    pub points: i32,
    pub cost: f64,
    pub minutes_played: u32,
    pub tries: u32,
    pub assists: u32,
    pub tackles: u32,
    pub linebreaks: u32,
}

/// One point of a player's performance trend.
#[derive(Debug, Clone, PartialEq)]
pub struct PerformancePoint {
    pub round: u32,
    pub date: NaiveDate,
    pub points: i32,
    pub cost: f64,
    pub opponent: Team,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TeamPerformance {
    pub total_points: i32,
    pub average_points: i32,
    pub player_count: usize,
}

/// `£10.2m`
pub fn format_cost(cost: f64) -> String {
    format!("£{cost:.1}m")
}

/// Signed one-decimal delta, `+0.8` / `-0.3` / `0.0`.
pub fn format_cost_change(change: f64) -> String {
    if change > 0.0 {
        format!("+{change:.1}")
    } else {
        format!("{change:.1}")
    }
}
