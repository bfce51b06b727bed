//! Performance benchmarks for road-orientation-lib
//!
//! Run with: cargo bench --package road-orientation-lib

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use geo::{Coord, LineString, Rect};
use road_orientation_lib::{
    CheapRuler, Directionality, HistogramConfig, LayerFilter, MapEngine, OrientationChart,
    OrientationTracker, Result, RoadFeature, clip::clip_line, compute_histogram,
};

/// Generate a wavy street with the specified number of points
fn generate_street(
    num_points: usize,
    base_lat: f64,
    base_lon: f64,
    heading: f64,
) -> LineString<f64> {
    let (sin, cos) = heading.to_radians().sin_cos();
    (0..num_points)
        .map(|i| {
            let t = i as f64 / num_points as f64;
            let wobble = (t * 40.0).sin() * 0.0005;
            (
                base_lon + t * 0.05 * sin + wobble * cos,
                base_lat + t * 0.05 * cos - wobble * sin,
            )
        })
        .collect::<Vec<_>>()
        .into()
}

/// Generate a city-like street grid around Denver
fn generate_city(num_streets: usize, points_per_street: usize) -> Vec<RoadFeature> {
    (0..num_streets)
        .map(|i| {
            let offset = (i / 2) as f64 * 0.001;
            let heading = (if i % 2 == 0 { 0.0 } else { 90.0 }) + (i % 7) as f64;
            let directionality = if i % 5 == 0 {
                Directionality::OneWay
            } else {
                Directionality::TwoWay
            };
            RoadFeature::line(
                generate_street(points_per_street, 39.70 + offset, -105.02 + offset, heading),
                directionality,
            )
        })
        .collect()
}

fn create_viewport(min_lat: f64, min_lon: f64, max_lat: f64, max_lon: f64) -> Rect<f64> {
    Rect::new(
        Coord {
            x: min_lon,
            y: min_lat,
        },
        Coord {
            x: max_lon,
            y: max_lat,
        },
    )
}

/// Map engine serving a fixed set of features
struct StaticEngine {
    features: Vec<RoadFeature>,
    viewport: Rect<f64>,
}

impl MapEngine for StaticEngine {
    fn query_visible_features(&self, filter: &LayerFilter) -> Result<Vec<RoadFeature>> {
        Ok(self
            .features
            .iter()
            .filter(|f| filter.matches(f))
            .cloned()
            .collect())
    }

    fn viewport_bounds(&self) -> Result<Option<Rect<f64>>> {
        Ok(Some(self.viewport))
    }

    fn viewport_center_latitude(&self) -> Result<f64> {
        Ok(self.viewport.center().y)
    }

    fn camera_bearing(&self) -> Result<f64> {
        Ok(0.0)
    }
}

// ============================================================================
// Core Benchmarks - Key performance indicators
// ============================================================================

fn bench_clipping(c: &mut Criterion) {
    let mut group = c.benchmark_group("clip");

    let street = generate_street(50_000, 39.70, -105.02, 30.0);
    group.throughput(Throughput::Elements(50_000));

    // Viewport cutting the street many times
    let small_viewport = create_viewport(39.71, -105.01, 39.72, -105.00);
    group.bench_function("small_viewport_50k", |b| {
        b.iter(|| clip_line(&street, &small_viewport));
    });

    // Viewport containing the whole street
    let large_viewport = create_viewport(39.0, -106.0, 41.0, -104.0);
    group.bench_function("large_viewport_50k", |b| {
        b.iter(|| clip_line(&street, &large_viewport));
    });

    group.finish();
}

fn bench_histogram(c: &mut Criterion) {
    let mut group = c.benchmark_group("histogram");
    group.sample_size(20);

    let features = generate_city(500, 200);
    let viewport = create_viewport(39.70, -105.02, 39.90, -104.82);
    let ruler = CheapRuler::new(viewport.center().y);
    group.throughput(Throughput::Elements((500 * 200) as u64));

    for num_bins in [16, 64, 360] {
        group.bench_with_input(
            BenchmarkId::new("city_500x200", num_bins),
            &num_bins,
            |b, &num_bins| {
                b.iter(|| compute_histogram(&features, Some(&viewport), &ruler, num_bins).unwrap());
            },
        );
    }

    group.finish();
}

fn bench_full_pass(c: &mut Criterion) {
    let mut group = c.benchmark_group("pass");
    group.sample_size(20);

    let engine = StaticEngine {
        features: generate_city(500, 200),
        viewport: create_viewport(39.70, -105.02, 39.80, -104.92),
    };
    let mut tracker = OrientationTracker::new(engine, HistogramConfig::default()).unwrap();

    group.bench_function("settle_500x200", |b| {
        b.iter(|| {
            tracker
                .on_viewport_settle(&mut |_: &OrientationChart| -> Result<()> { Ok(()) })
                .map(|chart| chart.bins.total())
                .unwrap()
        });
    });

    group.finish();
}

// ============================================================================
// Criterion Configuration
// ============================================================================

criterion_group!(benches, bench_clipping, bench_histogram, bench_full_pass);

criterion_main!(benches);
