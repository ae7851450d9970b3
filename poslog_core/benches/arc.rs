use criterion::{black_box, criterion_group, criterion_main, Criterion};
use poslog_core::arc::{self, ArcDirection};

// Synthetic end points spread around the start, all reachable with the
// benchmark radius.
fn synth_endpoints(n: usize, seed: u32) -> Vec<[f64; 2]> {
    // tiny PRNG
    let mut state = seed.max(1);
    let mut next_f64 = || {
        let mut x = state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        state = x;
        f64::from(x) / f64::from(u32::MAX)
    };
    (0..n)
        .map(|_| {
            let angle = next_f64() * std::f64::consts::TAU;
            let dist = 0.5 + next_f64() * 9.0;
            [dist * angle.cos(), dist * angle.sin()]
        })
        .collect()
}

pub fn bench_arc_solve(c: &mut Criterion) {
    let ends = synth_endpoints(1024, 0xC0FFEE);
    c.bench_function("arc_solve_1024", |b| {
        b.iter(|| {
            let mut acc = 0.0f64;
            for end in &ends {
                let sol = arc::solve([0.0, 0.0], *end, black_box(5.0), ArcDirection::Cw)
                    .expect("reachable end point");
                acc += sol.i + sol.j;
            }
            black_box(acc)
        })
    });
}

criterion_group!(benches, bench_arc_solve);
criterion_main!(benches);
