use criterion::{black_box, criterion_group, criterion_main, Criterion};
use gridsearch::{Distance, Grid, PathFinder, Point, SearchOutcome};

const BASE_MAP: &str = concat!(
    "S..X......X.........\n",
    ".X.X.XXXX.X.XXXXXXX.\n",
    ".X...X....X.X.....X.\n",
    ".XXXXX.XXXX.X.XXX.X.\n",
    ".....X.X....X...X.X.\n",
    "XXXX.X...XXXXXX.X.X.\n",
    "...X...X......X.X...\n",
    ".X.XXXXXXXXXX.X.XXXX\n",
    ".X............X....E\n",
);

fn load_base_map_scaled(factor: usize) -> (Grid, Point, Point) {
    let mut map: Grid = BASE_MAP.parse().unwrap();
    let mut start = Point { row: 0, col: 0 };
    let mut goal = Point { row: 8, col: 19 };

    map.scale_up(factor);
    start.row *= factor;
    start.col *= factor;
    goal.row *= factor;
    goal.col *= factor;

    (map, start, goal)
}

fn bench_map_scaled(c: &mut Criterion, factor: usize) {
    let (map, start, goal) = load_base_map_scaled(factor);

    for heuristic in [Distance::Manhattan, Distance::Euclidean, Distance::Chebyshev] {
        c.bench_function(&format!("map_scaled_{}_{}", factor, heuristic), |b| {
            b.iter(|| {
                let (res, _) =
                    PathFinder::new(&map, black_box(start), black_box(goal), heuristic)
                        .unwrap()
                        .finish();
                assert!(matches!(res, SearchOutcome::PathFound(_)));
            })
        });
    }
}

pub fn map_small(c: &mut Criterion) {
    bench_map_scaled(c, 1);
}

pub fn map_medium(c: &mut Criterion) {
    bench_map_scaled(c, 4);
}

pub fn map_large(c: &mut Criterion) {
    bench_map_scaled(c, 16);
}

criterion_group!(benches, map_small, map_medium, map_large);
criterion_main!(benches);
