use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use indicatif::ProgressBar;

use miniray::{Camera, Framebuffer, RenderSettings, Scene, geometry::ScreenSize, render};

const RESOLUTION: ScreenSize = ScreenSize {
    width: 1024,
    height: 640,
};
const FRAME_RATE: f32 = 30.0;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let frames: u32 = match args.next() {
        Some(value) => value.parse().context("frame count must be a number")?,
        None => 1,
    };
    let output_dir = PathBuf::from(args.next().unwrap_or_else(|| ".".to_string()));

    let camera = Camera::builder().resolution(RESOLUTION).build();
    let mut scene = Scene::room(Path::new("assets/textures"));
    let settings = RenderSettings {
        thread_count: NonZeroUsize::new(num_cpus::get()).unwrap_or(NonZeroUsize::MIN),
    };
    let mut framebuffer = Framebuffer::new(RESOLUTION);

    let bar = ProgressBar::new(frames.into());
    for frame in 0..frames {
        scene.set_time(frame as f32 / FRAME_RATE);
        render(&scene, &camera, &settings, &mut framebuffer)?;

        let path = output_dir.join(format!("frame{frame:04}.png"));
        framebuffer
            .to_image()
            .save(&path)
            .with_context(|| format!("saving {}", path.display()))?;
        bar.inc(1);
    }
    bar.finish();

    Ok(())
}
