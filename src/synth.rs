use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::model::{Game, Player, PlayerGameStat};

/// Fixed seed for reproducible runs, OS entropy otherwise.
pub fn rng_from_seed(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Generate one stat line per player per completed game their team played.
///
/// Iteration is players-major in collection order, so a seeded `rng` always
/// yields the same records for the same inputs.
pub fn synthesize_stats(
    players: &[Player],
    games: &[Game],
    rng: &mut impl Rng,
) -> Vec<PlayerGameStat> {
    let completed: Vec<&Game> = games.iter().filter(|g| g.is_completed()).collect();
    let mut out = Vec::new();
    for player in players {
        for game in completed.iter().filter(|g| g.involves(player.team)) {
            out.push(synthesize_line(player, game, rng));
        }
    }
    log::debug!(
        "synthesized {} stat lines over {} completed games",
        out.len(),
        completed.len()
    );
    out
}

fn synthesize_line(player: &Player, game: &Game, rng: &mut impl Rng) -> PlayerGameStat {
    let points = rng.gen_range(5..20);
    let cost = round_tenth(player.cost - rng.gen_range(-0.7..0.8));
    let minutes_played = rng.gen_range(40..80);
    let tries = u32::from(rng.gen_bool(0.3));
    let assists = u32::from(rng.gen_bool(0.2));
    let tackles = rng.gen_range(1..=12);
    let linebreaks = if rng.gen_bool(0.3) {
        rng.gen_range(1..=3)
    } else {
        0
    };

    PlayerGameStat {
        player_id: player.id,
        game_id: game.id,
        points,
        cost,
        minutes_played,
        tries,
        assists,
        tackles,
        linebreaks,
    }
}

fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
