use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use wormsweeper_core::*;

fn placement(c: &mut Criterion) {
    let mut group = c.benchmark_group("placement");
    for level in Level::ALL {
        let config = level.config();
        group.bench_function(level.name(), |b| {
            let mut rng = SmallRng::seed_from_u64(0);
            b.iter(|| place_hazards(config.grid_size, config.hazards, &mut rng).unwrap())
        });
    }
    group.finish();
}

fn flood_reveal(c: &mut Criterion) {
    let mut group = c.benchmark_group("flood_reveal");
    for grid_size in [10, 15, 64] {
        let layout = HazardLayout::empty(grid_size);
        group.bench_function(format!("empty_{grid_size}x{grid_size}"), |b| {
            b.iter(|| {
                let mut board = Board::from_layout(layout.clone());
                black_box(board.reveal((0, 0)).unwrap())
            })
        });
    }
    group.finish();
}

criterion_group!(benches, placement, flood_reveal);
criterion_main!(benches);
