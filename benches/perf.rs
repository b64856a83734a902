use criterion::{Criterion, criterion_group, criterion_main};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::hint::black_box;

use sixn_terminal::filter::{TeamFilter, filter_players};
use sixn_terminal::model::Team;
use sixn_terminal::repository::StatsRepository;
use sixn_terminal::seed::SeedData;

fn bench_repository_build(c: &mut Criterion) {
    let seed = SeedData::six_nations_2024().expect("embedded seed");
    c.bench_function("repository_build", |b| {
        b.iter(|| {
            let mut rng = StdRng::seed_from_u64(7);
            let repo = StatsRepository::from_seed(black_box(seed.clone()), &mut rng);
            black_box(repo.stats().len());
        })
    });
}

fn bench_queries(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(7);
    let repo = StatsRepository::six_nations_2024(&mut rng).expect("embedded seed");

    c.bench_function("player_performance", |b| {
        b.iter(|| {
            for p in repo.players() {
                black_box(repo.player_performance(black_box(p.id)));
            }
        })
    });

    c.bench_function("leaderboards", |b| {
        b.iter(|| {
            black_box(repo.top_performers());
            black_box(repo.biggest_risers());
            black_box(repo.biggest_fallers());
        })
    });

    c.bench_function("team_performance", |b| {
        b.iter(|| black_box(repo.ranked_team_performance()))
    });

    let mut teams = TeamFilter::default();
    teams.toggle(Team::Italy);
    c.bench_function("filter_players", |b| {
        b.iter(|| black_box(filter_players(repo.players(), &teams, black_box("wing")).len()))
    });
}

criterion_group!(benches, bench_repository_build, bench_queries);
criterion_main!(benches);
