use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use glam::DVec3;

use helica_fha::{AxisSetId, HelicalAxisSample, HelicalAxisSet, Method, ObjectId, SampleKind};
use helica_glyph::{build_glyph_buffers, GlyphParams};

fn bench_glyph_buffers(c: &mut Criterion) {
    let mut group = c.benchmark_group("glyph_buffers");
    let params = GlyphParams::default();

    for count in [100, 1000, 10000].iter() {
        let samples = (0..*count)
            .map(|i| {
                let t = i as f64 * 0.01;
                HelicalAxisSample {
                    n: DVec3::new(t.cos(), t.sin(), 0.5).normalize(),
                    r0: DVec3::new(t, t * t, 0.0),
                    r0_displ_base: 0.0,
                    r0_displ_tar: 0.0,
                    phi: 1.0,
                    l: 0.1,
                    kind: SampleKind::Regular,
                }
            })
            .collect();
        let set = HelicalAxisSet::new(
            AxisSetId(0),
            Method::WorldRelative,
            None,
            ObjectId(0),
            "bench_world".to_string(),
            0.01,
            0,
            samples,
        );

        group.bench_with_input(BenchmarkId::new("build", count), &set, |b, set| {
            b.iter(|| black_box(build_glyph_buffers(black_box(set), &params)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_glyph_buffers);
criterion_main!(benches);
