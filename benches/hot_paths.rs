use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tui_globe::config::{GlobeConfig, Rgb, Tier};
use tui_globe::data::{build_group, BoundaryFeature, TierStyle};
use tui_globe::geo::{geo_to_sphere, GeoPoint};
use tui_globe::map::{render_scene, Earth, OrbitCamera, Scene};

/// Grid of small square polygons covering the globe
fn synthetic_features() -> Vec<BoundaryFeature> {
    let mut features = Vec::new();
    for lat in (-80..80).step_by(5) {
        for lon in (-180..180).step_by(5) {
            let (lon, lat) = (lon as f64, lat as f64);
            let ring: Vec<GeoPoint> = (0..=40)
                .map(|i| {
                    let t = i as f64 / 40.0 * 4.0;
                    let (dx, dy) = match t as u32 {
                        0 => (t, 0.0),
                        1 => (1.0, t - 1.0),
                        2 => (3.0 - t, 1.0),
                        _ => (0.0, 4.0 - t),
                    };
                    GeoPoint::new(lon + dx * 4.0, lat + dy * 4.0)
                })
                .collect();
            features.push(BoundaryFeature::Polygon(vec![ring]));
        }
    }
    features
}

fn bench_projection(c: &mut Criterion) {
    c.bench_function("geo_to_sphere_10k", |b| {
        b.iter(|| {
            let mut acc = 0.0;
            for i in 0..10_000 {
                let lon = (i % 360) as f64 - 180.0;
                let lat = (i % 180) as f64 - 90.0;
                acc += geo_to_sphere(black_box(lon), black_box(lat), 1.001).x;
            }
            acc
        })
    });
}

fn bench_build_group(c: &mut Criterion) {
    let features = synthetic_features();
    let style = TierStyle::new(Tier::Country, Rgb::WHITE);
    c.bench_function("build_group_grid", |b| {
        b.iter(|| build_group(black_box(&features), style, 1.001))
    });
}

fn bench_render(c: &mut Criterion) {
    let config = GlobeConfig::default();
    let mut scene = Scene::new(Earth::new(1.0, None, config.earth.ocean_color));
    scene.attach(build_group(
        &synthetic_features(),
        TierStyle::new(Tier::Country, Rgb::WHITE),
        config.earth.boundary_radius(),
    ));
    let mut camera = OrbitCamera::new(&config.camera);
    camera.set_aspect(1.0);

    c.bench_function("render_scene_120x40", |b| {
        b.iter(|| render_scene(black_box(&scene), &camera, &config.lighting, 120, 40))
    });
}

criterion_group!(benches, bench_projection, bench_build_group, bench_render);
criterion_main!(benches);
