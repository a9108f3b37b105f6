use std::num::NonZeroUsize;
use std::path::Path;
use std::time::Duration;

use criterion::{Criterion, criterion_group, criterion_main};
use miniray::{Camera, Framebuffer, RenderSettings, Scene, geometry::ScreenSize, render};

fn criterion_benchmark(c: &mut Criterion) {
    let resolution = ScreenSize::new(256, 160);
    let camera = Camera::builder().resolution(resolution).build();
    let mut scene = Scene::room(Path::new("assets/textures"));
    scene.set_time(0.5);
    let settings = RenderSettings {
        thread_count: NonZeroUsize::new(num_cpus::get()).unwrap_or(NonZeroUsize::MIN),
    };

    c.bench_function("render_room", |b| {
        b.iter_batched(
            || Framebuffer::new(resolution),
            |mut framebuffer| render(&scene, &camera, &settings, &mut framebuffer).unwrap(),
            criterion::BatchSize::LargeInput,
        )
    });
}

criterion_group! {
    name = benches;
    config = Criterion::default().sample_size(20).measurement_time(Duration::from_secs(30));
    targets = criterion_benchmark
}
criterion_main!(benches);
