use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use ninuki::notation::apply_moves;
use ninuki::{Ai, AiSettings, Game};

struct BenchCase {
    name: &'static str,
    script: &'static str,
}

const CASES: &[BenchCase] = &[
    BenchCase {
        name: "opening",
        script: "99,9A",
    },
    BenchCase {
        name: "midgame",
        script: "99,9A,A9,88,B9,89,8B,AA",
    },
    BenchCase {
        name: "tactical",
        script: "95,96,DD,97,87,77,A8,B9",
    },
];

fn build_game(script: &str) -> Game {
    let mut game = Game::new(19, 19);
    apply_moves(&mut game, script).expect("bench script must be legal");
    game
}

fn bench_suggest_move(c: &mut Criterion) {
    let mut group = c.benchmark_group("suggest_move");

    for case in CASES {
        let game = build_game(case.script);
        for depth in [1usize, 2, 3] {
            let mut ai = Ai::new(AiSettings {
                depth,
                ..AiSettings::default()
            });
            group.bench_with_input(
                BenchmarkId::new(case.name, depth),
                &game,
                |b, game| b.iter(|| black_box(ai.suggest_move(black_box(game)))),
            );
        }
    }
    group.finish();
}

fn bench_make_reverse(c: &mut Criterion) {
    let game = build_game("99,9A,A9,88,B9,89");

    c.bench_function("make_reverse_move", |b| {
        b.iter_batched(
            || game.clone(),
            |mut game| {
                let result = game.make_move(12, 12).expect("legal move");
                game.reverse_move(&result);
                black_box(game)
            },
            criterion::BatchSize::SmallInput,
        )
    });
}

criterion_group!(benches, bench_suggest_move, bench_make_reverse);
criterion_main!(benches);
