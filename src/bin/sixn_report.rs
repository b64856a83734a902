use anyhow::{Context, Result};

use sixn_terminal::config::DashboardConfig;
use sixn_terminal::model::{Player, format_cost, format_cost_change};
use sixn_terminal::repository::StatsRepository;
use sixn_terminal::synth;

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
    let config = DashboardConfig::from_env();

    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let seed = parse_u64_arg(&args, "seed")?.or(config.rng_seed);
    let player_id = parse_u64_arg(&args, "player")?
        .map(u32::try_from)
        .transpose()
        .context("player id out of range")?;

    let mut rng = synth::rng_from_seed(seed);
    let repo = StatsRepository::six_nations_2024(&mut rng)?;

    println!("Six Nations 2024 fantasy report");
    match seed {
        Some(seed) => println!("Seed: {seed}"),
        None => println!("Seed: random"),
    }

    println!();
    println!("Top performers");
    for (idx, p) in repo.top_performers().iter().enumerate() {
        println!(" {}. {} ({}) {} pts", idx + 1, p.name, p.team.abbr(), p.points);
    }

    println!();
    println!("Biggest risers");
    print_cost_movers(&repo.biggest_risers());

    println!();
    println!("Biggest fallers");
    print_cost_movers(&repo.biggest_fallers());

    println!();
    println!("Team performance");
    for (team, perf) in repo.ranked_team_performance() {
        println!(
            " {:<10} {:>3} pts avg  {:>3} total  {} players",
            team.display_name(),
            perf.average_points,
            perf.total_points,
            perf.player_count
        );
    }

    if let Some(player_id) = player_id {
        println!();
        let Some(player) = repo.player(player_id) else {
            println!("Player {player_id}: not found");
            return Ok(());
        };
        println!("Performance: {} ({})", player.name, player.team.display_name());
        let rows = repo.player_performance(player_id);
        if rows.is_empty() {
            println!(" no completed games");
        }
        for row in rows {
            println!(
                " R{} {} vs {:<8} {:>3} pts  {}",
                row.round,
                row.date.format("%d %b"),
                row.opponent.display_name(),
                row.points,
                format_cost(row.cost)
            );
        }
    }

    Ok(())
}

fn print_cost_movers(players: &[&Player]) {
    for p in players {
        println!(
            " {} ({}) {} {}",
            p.name,
            p.team.abbr(),
            format_cost(p.cost),
            format_cost_change(p.cost_change)
        );
    }
}

/// Accepts `--name=N` and `--name N`.
fn parse_u64_arg(args: &[String], name: &str) -> Result<Option<u64>> {
    let flag = format!("--{name}");
    let prefix = format!("--{name}=");
    for (idx, arg) in args.iter().enumerate() {
        let raw = if let Some(value) = arg.strip_prefix(&prefix) {
            Some(value)
        } else if *arg == flag {
            args.get(idx + 1).map(|s| s.as_str())
        } else {
            None
        };
        if let Some(raw) = raw {
            let value = raw
                .trim()
                .parse::<u64>()
                .with_context(|| format!("invalid value for {flag}: '{raw}'"))?;
            return Ok(Some(value));
        }
    }
    Ok(None)
}
