use chrono::NaiveDate;
use rand::SeedableRng;
use rand::rngs::StdRng;

use sixn_terminal::model::{Game, Player, PlayerGameStat, Team, TeamPerformance};
use sixn_terminal::repository::StatsRepository;
use sixn_terminal::seed::SeedData;

fn seeded_repo(seed: u64) -> StatsRepository {
    let mut rng = StdRng::seed_from_u64(seed);
    StatsRepository::six_nations_2024(&mut rng).expect("embedded seed should load")
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

fn stat(player_id: u32, game_id: u32, points: i32, cost: f64) -> PlayerGameStat {
    PlayerGameStat {
        player_id,
        game_id,
        points,
        cost,
        minutes_played: 80,
        tries: 0,
        assists: 0,
        tackles: 5,
        linebreaks: 0,
    }
}

fn player(id: u32, name: &str, team: Team, points: i32, cost_change: f64) -> Player {
    Player {
        id,
        name: name.to_string(),
        position: "Wing".to_string(),
        team,
        cost: 9.0,
        points,
        cost_change,
        points_change: 0,
        form: vec![10, 10],
    }
}

fn game(id: u32, round: u32, day: NaiveDate, home: Team, away: Team, played: bool) -> Game {
    Game {
        id,
        round,
        date: day,
        home,
        away,
        home_score: played.then_some(20),
        away_score: played.then_some(10),
    }
}

#[test]
fn top_performer_is_duhan_van_der_merwe() {
    let repo = seeded_repo(1);
    let top = repo.top_performers();
    let names: Vec<&str> = top.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "Duhan van der Merwe",
            "James Lowe",
            "Bundee Aki",
            "Damian Penaud",
            "Finn Russell"
        ]
    );
    assert_eq!(top[0].points, 69);
}

#[test]
fn risers_and_fallers_follow_cost_change() {
    let repo = seeded_repo(1);
    let risers: Vec<u32> = repo.biggest_risers().iter().map(|p| p.id).collect();
    // Ben Earl and Caelan Doris tie on +0.5; collection order decides.
    assert_eq!(risers, vec![3, 1, 7, 5, 11]);

    let fallers = repo.biggest_fallers();
    assert_eq!(fallers[0].name, "Antoine Dupont");
    assert_eq!(fallers[0].cost_change, -0.3);
    let ids: Vec<u32> = fallers.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![10, 6, 4, 8, 12]);
}

#[test]
fn team_performance_covers_all_six_teams() {
    let repo = seeded_repo(1);
    let teams = repo.team_performance();
    assert_eq!(teams.len(), 6);
    assert_eq!(teams.keys().copied().collect::<Vec<_>>(), Team::ALL.to_vec());

    let ireland = teams[&Team::Ireland];
    assert_eq!(ireland.player_count, 3);
    assert_eq!(ireland.total_points, 159);
    assert_eq!(ireland.average_points, 53);
    assert_eq!(
        teams[&Team::Wales],
        TeamPerformance {
            total_points: 36,
            average_points: 36,
            player_count: 1
        }
    );
}

#[test]
fn ranked_team_table_is_best_average_first() {
    let repo = seeded_repo(1);
    let order: Vec<Team> = repo
        .ranked_team_performance()
        .into_iter()
        .map(|(team, _)| team)
        .collect();
    assert_eq!(
        order,
        vec![
            Team::Scotland,
            Team::Ireland,
            Team::France,
            Team::Wales,
            Team::England,
            Team::Italy
        ]
    );
}

#[test]
fn performance_is_sorted_by_date_for_every_player() {
    let repo = seeded_repo(99);
    for p in repo.players() {
        let rows = repo.player_performance(p.id);
        assert_eq!(rows.len(), 3, "{} should have three completed games", p.name);
        assert!(rows.windows(2).all(|w| w[0].date <= w[1].date));
        for row in &rows {
            assert_ne!(row.opponent, p.team);
        }
    }
}

#[test]
fn unknown_player_has_no_performance() {
    let repo = seeded_repo(3);
    assert!(repo.player_performance(0).is_empty());
    assert!(repo.player_performance(999).is_empty());
    assert!(repo.player(999).is_none());
}

#[test]
fn unplayed_games_never_produce_stats() {
    let repo = seeded_repo(5);
    for s in repo.stats() {
        let game = repo.game(s.game_id).expect("stat game exists");
        assert!(game.is_completed());
        assert!(game.round <= 3);
    }
}

#[test]
fn same_seed_gives_same_stats_and_queries_are_idempotent() {
    let a = seeded_repo(42);
    let b = seeded_repo(42);
    assert_eq!(a.stats(), b.stats());

    assert_eq!(a.player_performance(3), a.player_performance(3));
    assert_eq!(a.top_performers(), a.top_performers());
    assert_eq!(a.biggest_risers(), a.biggest_risers());
    assert_eq!(a.biggest_fallers(), a.biggest_fallers());
    assert_eq!(a.team_performance(), a.team_performance());
}

#[test]
fn performance_joins_games_and_opponents() {
    let seed = SeedData::six_nations_2024().unwrap();
    // Stored out of date order on purpose.
    let stats = vec![stat(3, 8, 28, 9.9), stat(3, 3, 25, 9.6), stat(3, 4, 8, 9.8)];
    let repo = StatsRepository::with_stats(seed, stats).expect("stats are consistent");

    let rows = repo.player_performance(3);
    let summary: Vec<(u32, NaiveDate, i32, f64, Team)> = rows
        .iter()
        .map(|r| (r.round, r.date, r.points, r.cost, r.opponent))
        .collect();
    assert_eq!(
        summary,
        vec![
            (1, date(2024, 2, 3), 25, 9.6, Team::Wales),
            (2, date(2024, 2, 10), 8, 9.8, Team::France),
            (3, date(2024, 2, 24), 28, 9.9, Team::England),
        ]
    );
    assert!(repo.player_performance(1).is_empty());
}

#[test]
fn equal_dates_keep_storage_order() {
    let day = date(2024, 2, 3);
    let seed = SeedData::new(
        vec![
            game(1, 1, day, Team::Ireland, Team::France, true),
            game(2, 1, day, Team::Italy, Team::Ireland, true),
        ],
        vec![player(1, "Solo", Team::Ireland, 10, 0.0)],
    )
    .unwrap();
    let repo = StatsRepository::with_stats(seed, vec![stat(1, 2, 7, 9.0), stat(1, 1, 11, 9.1)])
        .unwrap();

    let first = repo.player_performance(1);
    let opponents: Vec<Team> = first.iter().map(|r| r.opponent).collect();
    assert_eq!(opponents, vec![Team::Italy, Team::France]);
    assert_eq!(repo.player_performance(1), first);
}

#[test]
fn small_squads_shorten_leaderboards_and_zero_teams() {
    let seed = SeedData::new(
        Vec::new(),
        vec![
            player(1, "A", Team::France, 20, 0.2),
            player(2, "B", Team::France, 20, -0.4),
            player(3, "C", Team::England, 31, 0.2),
        ],
    )
    .unwrap();
    let repo = StatsRepository::with_stats(seed, Vec::new()).unwrap();

    let top: Vec<u32> = repo.top_performers().iter().map(|p| p.id).collect();
    assert_eq!(top, vec![3, 1, 2]);
    assert_eq!(repo.biggest_risers().len(), 3);
    let risers: Vec<u32> = repo.biggest_risers().iter().map(|p| p.id).collect();
    assert_eq!(risers, vec![1, 3, 2]);
    assert_eq!(repo.biggest_fallers()[0].id, 2);

    let teams = repo.team_performance();
    assert_eq!(teams.len(), 6);
    assert_eq!(teams[&Team::France].average_points, 20);
    for team in [Team::Ireland, Team::Italy, Team::Scotland, Team::Wales] {
        assert_eq!(teams[&team], TeamPerformance::default());
    }
}

#[test]
fn empty_repository_answers_with_empty_results() {
    let seed = SeedData::new(Vec::new(), Vec::new()).unwrap();
    let repo = StatsRepository::with_stats(seed, Vec::new()).unwrap();
    assert!(repo.top_performers().is_empty());
    assert!(repo.biggest_risers().is_empty());
    assert!(repo.biggest_fallers().is_empty());
    assert!(repo.player_performance(1).is_empty());
    assert_eq!(repo.team_performance().len(), 6);
    assert_eq!(repo.teams(), &Team::ALL);
}
