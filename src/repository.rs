use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap, HashSet};

use anyhow::{Result, bail};
use rand::Rng;

use crate::model::{Game, PerformancePoint, Player, PlayerGameStat, Team, TeamPerformance};
use crate::seed::SeedData;
use crate::synth;

/// Length of the top/risers/fallers leaderboards.
pub const LEADERBOARD_SIZE: usize = 5;

/// Read-only store of teams, games, players and per-game stat lines.
///
/// Nothing is mutated after construction, so a repository can be shared
/// behind an `Arc` with any number of readers.
#[derive(Debug, Clone)]
pub struct StatsRepository {
    games: Vec<Game>,
    players: Vec<Player>,
    stats: Vec<PlayerGameStat>,
    game_index: HashMap<u32, usize>,
    player_index: HashMap<u32, usize>,
}

impl StatsRepository {
    /// Build from the embedded Six Nations dataset.
    pub fn six_nations_2024(rng: &mut impl Rng) -> Result<Self> {
        Ok(Self::from_seed(SeedData::six_nations_2024()?, rng))
    }

    /// Build from validated seed data, synthesizing stat lines with `rng`.
    pub fn from_seed(seed: SeedData, rng: &mut impl Rng) -> Self {
        let stats = synth::synthesize_stats(seed.players(), seed.games(), rng);
        let (games, players) = seed.into_parts();
        let repo = Self::assemble(games, players, stats);
        log::info!(
            "loaded {} players, {} games, {} stat lines",
            repo.players.len(),
            repo.games.len(),
            repo.stats.len()
        );
        repo
    }

    /// Build from explicit stat lines, checking every reference.
    pub fn with_stats(seed: SeedData, stats: Vec<PlayerGameStat>) -> Result<Self> {
        let (games, players) = seed.into_parts();
        let repo = Self::assemble(games, players, stats);
        repo.validate_stats()?;
        Ok(repo)
    }

    fn assemble(games: Vec<Game>, players: Vec<Player>, stats: Vec<PlayerGameStat>) -> Self {
        let game_index = games.iter().enumerate().map(|(i, g)| (g.id, i)).collect();
        let player_index = players.iter().enumerate().map(|(i, p)| (p.id, i)).collect();
        Self {
            games,
            players,
            stats,
            game_index,
            player_index,
        }
    }

    fn validate_stats(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for stat in &self.stats {
            let Some(player) = self.player(stat.player_id) else {
                bail!("stat references unknown player {}", stat.player_id);
            };
            let Some(game) = self.game(stat.game_id) else {
                bail!("stat references unknown game {}", stat.game_id);
            };
            if !game.is_completed() {
                bail!(
                    "stat for player {} references unplayed game {}",
                    player.id,
                    game.id
                );
            }
            if !game.involves(player.team) {
                bail!(
                    "stat for player {} ({}) references game {} without {}",
                    player.id,
                    player.name,
                    game.id,
                    player.team
                );
            }
            if !seen.insert((stat.player_id, stat.game_id)) {
                bail!(
                    "duplicate stat for player {} in game {}",
                    stat.player_id,
                    stat.game_id
                );
            }
        }
        Ok(())
    }

    pub fn teams(&self) -> &'static [Team] {
        &Team::ALL
    }

    pub fn games(&self) -> &[Game] {
        &self.games
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn stats(&self) -> &[PlayerGameStat] {
        &self.stats
    }

    pub fn player(&self, id: u32) -> Option<&Player> {
        self.player_index.get(&id).map(|&i| &self.players[i])
    }

    pub fn game(&self, id: u32) -> Option<&Game> {
        self.game_index.get(&id).map(|&i| &self.games[i])
    }

    /// A player's stat lines joined to their games, oldest first.
    ///
    /// Games on the same date keep stat storage order.
    pub fn player_performance(&self, player_id: u32) -> Vec<PerformancePoint> {
        let Some(player) = self.player(player_id) else {
            return Vec::new();
        };

        let mut rows: Vec<(&Game, &PlayerGameStat)> = self
            .stats
            .iter()
            .filter(|stat| stat.player_id == player_id)
            .filter_map(|stat| self.game(stat.game_id).map(|game| (game, stat)))
            .collect();
        rows.sort_by_key(|(game, _)| game.date);

        rows.into_iter()
            .filter_map(|(game, stat)| {
                let opponent = game.opponent_of(player.team)?;
                Some(PerformancePoint {
                    round: game.round,
                    date: game.date,
                    points: stat.points,
                    cost: stat.cost,
                    opponent,
                })
            })
            .collect()
    }

    pub fn top_performers(&self) -> Vec<&Player> {
        self.leaderboard(|a, b| b.points.cmp(&a.points))
    }

    pub fn biggest_risers(&self) -> Vec<&Player> {
        self.leaderboard(|a, b| b.cost_change.total_cmp(&a.cost_change))
    }

    pub fn biggest_fallers(&self) -> Vec<&Player> {
        self.leaderboard(|a, b| a.cost_change.total_cmp(&b.cost_change))
    }

    // Stable sort keeps collection order among ties.
    fn leaderboard(&self, cmp: impl Fn(&Player, &Player) -> Ordering) -> Vec<&Player> {
        let mut ranked: Vec<&Player> = self.players.iter().collect();
        ranked.sort_by(|a, b| cmp(*a, *b));
        ranked.truncate(LEADERBOARD_SIZE);
        ranked
    }

    /// Per-team totals keyed by every team, including teams with no players.
    pub fn team_performance(&self) -> BTreeMap<Team, TeamPerformance> {
        let mut out: BTreeMap<Team, TeamPerformance> = Team::ALL
            .into_iter()
            .map(|team| (team, TeamPerformance::default()))
            .collect();

        for player in &self.players {
            let entry = out.entry(player.team).or_default();
            entry.total_points += player.points;
            entry.player_count += 1;
        }

        for perf in out.values_mut() {
            perf.average_points = average_rounded(perf.total_points, perf.player_count);
        }
        out
    }

    /// Team table ordered by average points, best first.
    pub fn ranked_team_performance(&self) -> Vec<(Team, TeamPerformance)> {
        let mut rows: Vec<(Team, TeamPerformance)> = self.team_performance().into_iter().collect();
        rows.sort_by(|a, b| b.1.average_points.cmp(&a.1.average_points));
        rows
    }
}

// Halves round up, so -2.5 -> -2 and 2.5 -> 3.
fn average_rounded(total: i32, count: usize) -> i32 {
    if count == 0 {
        return 0;
    }
    (f64::from(total) / count as f64 + 0.5).floor() as i32
}
