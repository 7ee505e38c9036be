use std::f64::consts::PI;
use std::path::PathBuf;

use clap::Parser;
use glam::Vec2;
use glob::glob;
use image::{DynamicImage, GrayImage, ImageReader};
use indicatif::ProgressBar;
use nalgebra as na;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use vo_monitor::visualization::Display;
use vo_monitor::{CameraPose, Monitor, MonitorConfig, MonitorResult, PoseHistory, TrackSnapshot};

const WIDTH: u32 = 640;
const HEIGHT: u32 = 480;
const FOCAL: f64 = 320.0;
const ORBIT_RADIUS: f64 = 10.0;

/// Drives the monitor with a synthetic camera orbiting a landmark ring.
#[derive(Parser)]
#[command(version, about, author)]
struct VomonCli {
    /// number of frames to play
    #[arg(long, default_value_t = 600)]
    frames: usize,

    /// monitor config json, defaults are used when omitted
    #[arg(long)]
    config: Option<PathBuf>,

    /// overrides range_threshold from the config
    #[arg(long)]
    range_threshold: Option<f64>,

    /// connect to a running viewer instead of spawning one
    #[arg(long)]
    connect: Option<String>,

    /// glob of background frames, e.g. "data/cam0/*.png"
    #[arg(long)]
    images: Option<String>,

    #[arg(long, default_value_t = 0)]
    seed: u64,
}

fn img_filter(rp: glob::GlobResult) -> Option<PathBuf> {
    if let Ok(p) = rp {
        for ext in &[".png", ".jpg"] {
            if p.as_os_str().to_string_lossy().ends_with(ext) {
                return Some(p);
            }
        }
    }
    None
}

fn background_paths(pattern: &str) -> Vec<PathBuf> {
    let mut paths: Vec<PathBuf> = match glob(pattern) {
        Ok(paths) => paths.filter_map(img_filter).collect(),
        Err(e) => {
            log::warn!("bad image pattern {}: {}", pattern, e);
            Vec::new()
        }
    };
    paths.sort();
    log::debug!("{} background frames", paths.len());
    paths
}

fn synthetic_image(k: usize) -> DynamicImage {
    DynamicImage::ImageLuma8(GrayImage::from_fn(WIDTH, HEIGHT, |x, y| {
        image::Luma([((x / 4 + y / 4 + k as u32) % 256) as u8])
    }))
}

fn background(paths: &[PathBuf], k: usize) -> DynamicImage {
    if paths.is_empty() {
        return synthetic_image(k);
    }
    let path = &paths[k % paths.len()];
    match ImageReader::open(path).map(|r| r.decode()) {
        Ok(Ok(img)) => img,
        Ok(Err(e)) => {
            log::warn!("cannot decode {}: {}", path.display(), e);
            synthetic_image(k)
        }
        Err(e) => {
            log::warn!("cannot open {}: {}", path.display(), e);
            synthetic_image(k)
        }
    }
}

/// Camera on a circle in the x-z plane, looking along its direction of travel.
fn orbit_pose(k: usize, frames: usize) -> MonitorResult<CameraPose> {
    let phi = 2.0 * PI * k as f64 / frames.max(1) as f64;
    let center = na::Vector3::new(ORBIT_RADIUS * phi.cos(), 0.0, ORBIT_RADIUS * phi.sin());
    let heading = phi.cos().atan2(-phi.sin());
    let (s, c) = heading.sin_cos();
    #[rustfmt::skip]
    let rotation = na::Matrix3::new(
        s, 0.0, -c,
        0.0, 1.0, 0.0,
        c, 0.0, s,
    );
    CameraPose::new(rotation, -(rotation * center))
}

fn landmark_ring(rng: &mut ChaCha8Rng, n: usize) -> Vec<na::Vector3<f64>> {
    (0..n)
        .map(|_| {
            let a = rng.random_range(0.0..2.0 * PI);
            let r = ORBIT_RADIUS + rng.random_range(-4.0..4.0);
            na::Vector3::new(r * a.cos(), rng.random_range(-2.0..2.0), r * a.sin())
        })
        .collect()
}

/// Landmarks in front of the camera that land inside the image.
fn observe(pose: &CameraPose, landmarks: &[na::Vector3<f64>]) -> (Vec<Vec2>, Vec<na::Vector3<f64>>) {
    landmarks
        .iter()
        .filter_map(|l| {
            let p = pose.rotation() * l + pose.translation();
            if p.z < 0.5 {
                return None;
            }
            let u = FOCAL * p.x / p.z + WIDTH as f64 / 2.0;
            let v = FOCAL * p.y / p.z + HEIGHT as f64 / 2.0;
            if u < 0.0 || v < 0.0 || u >= WIDTH as f64 || v >= HEIGHT as f64 {
                return None;
            }
            Some((Vec2::new(u as f32, v as f32), *l))
        })
        .unzip()
}

fn run(cli: VomonCli) -> MonitorResult<()> {
    let mut config = match &cli.config {
        Some(path) => vo_monitor::io::load_config(path)?,
        None => MonitorConfig::default(),
    };
    if let Some(range_threshold) = cli.range_threshold {
        config = config.with_range_threshold(range_threshold);
    }
    let display = match &cli.connect {
        Some(url) => Display::connect(&config.application_id, url)?,
        None => Display::spawn(&config.application_id)?,
    };
    let mut monitor = Monitor::new(config, display);

    let mut rng = ChaCha8Rng::seed_from_u64(cli.seed);
    let world = landmark_ring(&mut rng, 2000);
    let backgrounds = cli
        .images
        .as_deref()
        .map(background_paths)
        .unwrap_or_default();
    let mut history = PoseHistory::new();

    let bar = ProgressBar::new(cli.frames as u64);
    for k in 0..cli.frames {
        let pose = orbit_pose(k, cli.frames)?;
        history.push(pose);
        let (keypoints, landmarks) = observe(&pose, &world);
        let candidates: Vec<Vec2> = (0..rng.random_range(20..80))
            .map(|_| {
                Vec2::new(
                    rng.random_range(0.0..WIDTH as f32),
                    rng.random_range(0.0..HEIGHT as f32),
                )
            })
            .collect();
        let snapshot = TrackSnapshot::new(keypoints, candidates, landmarks, k as u64);
        monitor.update(&snapshot, &background(&backgrounds, k), &history);
        bar.inc(1);
    }
    bar.finish();
    log::info!(
        "played {} frames, final map scale {:?}",
        monitor.time_series().len(),
        monitor.scale()
    );
    monitor.close();
    Ok(())
}

fn main() {
    env_logger::init();
    let cli = VomonCli::parse();
    if let Err(e) = run(cli) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}
