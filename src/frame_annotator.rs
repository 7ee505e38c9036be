use glam::Vec2;
use image::{DynamicImage, GenericImageView};

use crate::visualization::{Display, YELLOW, rerun_shift, warn_on_err};

pub const FRAME_ROOT: &str = "frame";

/// What the frame panel shows after a render.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameView {
    pub title: String,
    /// `(0, width)`
    pub x_limits: (f64, f64),
    /// `(height, 0)`, image rows grow downwards.
    pub y_limits: (f64, f64),
    pub keypoint_count: usize,
}

impl FrameView {
    pub fn new(width: u32, height: u32, keypoint_count: usize, frame_index: u64) -> FrameView {
        FrameView {
            title: format!("Frame No. {} and Keypoints", frame_index),
            x_limits: (0.0, width as f64),
            y_limits: (height as f64, 0.0),
            keypoint_count,
        }
    }
}

/// Current image with the tracked keypoints on top.
#[derive(Debug, Default)]
pub struct FrameAnnotator;

impl FrameAnnotator {
    pub fn new() -> FrameAnnotator {
        FrameAnnotator
    }

    /// Clears the panel and redraws it from scratch. Limits follow the image
    /// of this call, so frames of different sizes are fine.
    pub fn render(
        &self,
        display: &Display,
        img: &DynamicImage,
        keypoints: &[Vec2],
        frame_index: u64,
    ) -> FrameView {
        let (width, height) = img.dimensions();
        let view = FrameView::new(width, height, keypoints.len(), frame_index);

        warn_on_err("frame panel clear", display.clear(FRAME_ROOT));
        if width == 0 || height == 0 {
            log::warn!("frame {} has an empty image, drawing keypoints only", frame_index);
        } else {
            warn_on_err("frame image", log_image(display, img));
        }
        warn_on_err(
            "frame keypoints",
            display.log(
                &format!("{}/image/keypoints", FRAME_ROOT),
                &rerun::Points2D::new(rerun_shift(keypoints))
                    .with_colors([YELLOW])
                    .with_radii([rerun::Radius::new_ui_points(3.0)]),
            ),
        );
        warn_on_err("frame title", display.title(FRAME_ROOT, &view.title, None));
        log::trace!("frame {}: {}x{}, {} keypoints", frame_index, width, height, keypoints.len());
        view
    }
}

fn log_image(display: &Display, img: &DynamicImage) -> rerun::RecordingStreamResult<()> {
    let (width, height) = img.dimensions();
    let path = format!("{}/image", FRAME_ROOT);
    match img {
        DynamicImage::ImageLuma8(gray) => display.log(
            &path,
            &rerun::Image::from_l8(gray.as_raw().clone(), [width, height]),
        ),
        DynamicImage::ImageLuma16(_) | DynamicImage::ImageLumaA8(_) | DynamicImage::ImageLumaA16(_) => {
            display.log(
                &path,
                &rerun::Image::from_l8(img.to_luma8().into_raw(), [width, height]),
            )
        }
        _ => display.log(
            &path,
            &rerun::Image::from_rgb24(img.to_rgb8().into_raw(), [width, height]),
        ),
    }
}
