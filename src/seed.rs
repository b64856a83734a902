use std::collections::HashSet;

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::model::{Game, Player, Team};

const SIX_NATIONS_2024: &str = include_str!("../data/six_nations_2024.json");

#[derive(Debug, Deserialize)]
struct RawSeed {
    games: Vec<RawGame>,
    players: Vec<RawPlayer>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawGame {
    id: u32,
    round: u32,
    date: String,
    home_team: String,
    away_team: String,
    #[serde(default)]
    home_score: Option<u32>,
    #[serde(default)]
    away_score: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPlayer {
    id: u32,
    name: String,
    position: String,
    team: String,
    cost: f64,
    points: i32,
    cost_change: f64,
    points_change: i32,
    #[serde(default)]
    form: Vec<i32>,
}

/// Validated static definitions a repository is built from.
#[derive(Debug, Clone)]
pub struct SeedData {
    games: Vec<Game>,
    players: Vec<Player>,
}

impl SeedData {
    /// The embedded Six Nations 2024 dataset.
    pub fn six_nations_2024() -> Result<Self> {
        Self::from_json(SIX_NATIONS_2024).context("embedded six nations seed")
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let seed: RawSeed = serde_json::from_str(raw).context("invalid seed json")?;
        let games = seed
            .games
            .into_iter()
            .map(convert_game)
            .collect::<Result<Vec<_>>>()?;
        let players = seed
            .players
            .into_iter()
            .map(convert_player)
            .collect::<Result<Vec<_>>>()?;
        Self::new(games, players)
    }

    pub fn new(games: Vec<Game>, players: Vec<Player>) -> Result<Self> {
        validate_games(&games)?;
        validate_players(&players)?;
        Ok(Self { games, players })
    }

    pub fn games(&self) -> &[Game] {
        &self.games
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn into_parts(self) -> (Vec<Game>, Vec<Player>) {
        (self.games, self.players)
    }
}

fn convert_game(raw: RawGame) -> Result<Game> {
    let id = raw.id;
    let date = NaiveDate::parse_from_str(raw.date.trim(), "%Y-%m-%d")
        .with_context(|| format!("game {id}: bad date '{}'", raw.date))?;
    let home = raw
        .home_team
        .parse::<Team>()
        .with_context(|| format!("game {id}: home team"))?;
    let away = raw
        .away_team
        .parse::<Team>()
        .with_context(|| format!("game {id}: away team"))?;
    Ok(Game {
        id,
        round: raw.round,
        date,
        home,
        away,
        home_score: raw.home_score,
        away_score: raw.away_score,
    })
}

fn convert_player(raw: RawPlayer) -> Result<Player> {
    let team = raw
        .team
        .parse::<Team>()
        .with_context(|| format!("player {} ({}): team", raw.id, raw.name))?;
    Ok(Player {
        id: raw.id,
        name: raw.name,
        position: raw.position,
        team,
        cost: raw.cost,
        points: raw.points,
        cost_change: raw.cost_change,
        points_change: raw.points_change,
        form: raw.form,
    })
}

fn validate_games(games: &[Game]) -> Result<()> {
    let mut seen = HashSet::new();
    for game in games {
        if !seen.insert(game.id) {
            bail!("duplicate game id {}", game.id);
        }
        if game.round == 0 {
            bail!("game {}: rounds start at 1", game.id);
        }
        if game.home == game.away {
            bail!("game {}: {} cannot play itself", game.id, game.home);
        }
        if game.home_score.is_some() != game.away_score.is_some() {
            bail!("game {}: score recorded for one side only", game.id);
        }
    }
    Ok(())
}

fn validate_players(players: &[Player]) -> Result<()> {
    let mut seen = HashSet::new();
    for player in players {
        if !seen.insert(player.id) {
            bail!("duplicate player id {}", player.id);
        }
        if player.name.trim().is_empty() {
            bail!("player {}: empty name", player.id);
        }
        if !player.cost.is_finite() || !player.cost_change.is_finite() {
            bail!("player {} ({}): non-finite cost", player.id, player.name);
        }
    }
    Ok(())
}
