use std::path::Path;

use image::{ColorType, DynamicImage};
use serde::{Deserialize, Serialize};
use vnlb_core::{check_len, emit};

use crate::error::IoError;
use crate::pattern::{frame_indices, frame_path};

/// The shape `(t, c, h, w)` of a video buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoShape {
    /// Number of frames.
    pub t: usize,
    /// Number of channels.
    pub c: usize,
    /// Height of the frames in pixels.
    pub h: usize,
    /// Width of the frames in pixels.
    pub w: usize,
}

impl VideoShape {
    /// Create a new video shape.
    pub fn new(t: usize, c: usize, h: usize, w: usize) -> Self {
        Self { t, c, h, w }
    }

    /// The same shape with a single channel.
    pub fn with_single_channel(&self) -> Self {
        Self { c: 1, ..*self }
    }

    /// The number of samples of one frame, `c * h * w`.
    pub fn frame_len(&self) -> usize {
        self.c * self.h * self.w
    }

    /// The number of samples of the video, `t * c * h * w`.
    pub fn numel(&self) -> usize {
        self.t * self.frame_len()
    }
}

impl std::fmt::Display for VideoShape {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "(t,c,h,w): ({},{},{},{})", self.t, self.c, self.h, self.w)
    }
}

impl From<[usize; 4]> for VideoShape {
    fn from(shape: [usize; 4]) -> Self {
        Self::new(shape[0], shape[1], shape[2], shape[3])
    }
}

/// A video clip stored as a flat buffer of `f32` samples in `(t, c, h, w)` order.
///
/// Channels are planar inside each frame. Intensities are in `[0, 255]` for
/// integer frame formats; floating point frames are loaded as stored.
#[derive(Clone, Debug, PartialEq)]
pub struct Video {
    data: Vec<f32>,
    shape: VideoShape,
}

impl Video {
    /// Create a video from owned samples.
    ///
    /// # Errors
    ///
    /// If the data length does not match the shape, an error is returned.
    pub fn new(shape: VideoShape, data: Vec<f32>) -> Result<Self, IoError> {
        check_len("video", data.len(), shape.numel())?;
        Ok(Self { data, shape })
    }

    /// The shape of the video.
    pub fn shape(&self) -> VideoShape {
        self.shape
    }

    /// The samples of the video in `(t, c, h, w)` order.
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// The samples of frame `t` in `(c, h, w)` order.
    ///
    /// # Panics
    ///
    /// Panics if `t` is out of range.
    pub fn frame(&self, t: usize) -> &[f32] {
        let len = self.shape.frame_len();
        &self.data[t * len..(t + 1) * len]
    }

    /// Consume the video and return its samples.
    pub fn into_vec(self) -> Vec<f32> {
        self.data
    }

    /// Convert the video to a single channel.
    ///
    /// Colour frames are converted with the BT.601 luma weights
    /// `0.299 R + 0.587 G + 0.114 B`; an alpha channel is dropped.
    pub fn to_gray(&self) -> Video {
        let VideoShape { t, c, h, w } = self.shape;
        let plane = h * w;

        let mut data = Vec::with_capacity(t * plane);
        for ti in 0..t {
            let frame = self.frame(ti);
            if c >= 3 {
                let (r, rest) = frame.split_at(plane);
                let (g, rest) = rest.split_at(plane);
                let b = &rest[..plane];
                data.extend(
                    r.iter()
                        .zip(g.iter().zip(b.iter()))
                        .map(|(&r, (&g, &b))| 0.299 * r + 0.587 * g + 0.114 * b),
                );
            } else {
                data.extend_from_slice(&frame[..plane]);
            }
        }

        Video {
            data,
            shape: VideoShape::new(t, 1, h, w),
        }
    }
}

/// Parameters of a video load request.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReadVideoParams {
    /// The frame path pattern, e.g. `frames/%03d.png`.
    pub video_paths: String,
    /// The index of the first frame.
    pub first_frame: usize,
    /// The index of the last frame, inclusive.
    pub last_frame: usize,
    /// The step between two loaded frames.
    pub frame_step: usize,
    /// The shape the caller allocated for the video.
    pub shape: VideoShape,
    /// Log the request parameters at info level.
    #[serde(default)]
    pub verbose: bool,
}

impl ReadVideoParams {
    /// Check the destination and the frame range against the requested shape.
    ///
    /// Runs before any file is opened.
    fn check_request(&self, dst: &[f32]) -> Result<(), IoError> {
        check_len("read_video", dst.len(), self.shape.numel())?;

        let num_frames = frame_indices(self.first_frame, self.last_frame, self.frame_step)?.len();
        if num_frames != self.shape.t {
            return Err(IoError::FrameCountMismatch {
                expected: self.shape.t,
                actual: num_frames,
            });
        }
        Ok(())
    }

    fn log(&self, caller: &str) {
        let lines = [
            format!("-- [{caller}] Parameters --"),
            format!("video_paths: {}", self.video_paths),
            format!("first_frame: {}", self.first_frame),
            format!("last_frame: {}", self.last_frame),
            format!("frame_step: {}", self.frame_step),
            format!("{}", self.shape),
        ];
        for line in lines {
            if self.verbose {
                log::info!("{line}");
            } else {
                log::debug!("{line}");
            }
        }
    }
}

#[derive(Clone, Copy)]
enum SampleDepth {
    U8,
    U16,
    F32,
}

fn sample_depth(color: ColorType) -> SampleDepth {
    match color {
        ColorType::L8 | ColorType::La8 | ColorType::Rgb8 | ColorType::Rgba8 => SampleDepth::U8,
        ColorType::L16 | ColorType::La16 | ColorType::Rgb16 | ColorType::Rgba16 => {
            SampleDepth::U16
        }
        _ => SampleDepth::F32,
    }
}

fn u8_samples(buf: Vec<u8>) -> Vec<f32> {
    buf.into_iter().map(f32::from).collect()
}

fn u16_samples(buf: Vec<u16>) -> Vec<f32> {
    const SCALE: f32 = 255.0 / 65535.0;
    buf.into_iter().map(|v| f32::from(v) * SCALE).collect()
}

/// Decode the interleaved samples of an image with its native channel count.
fn interleaved_samples(img: &DynamicImage, channels: usize) -> Result<Vec<f32>, IoError> {
    let depth = sample_depth(img.color());
    let samples = match (channels, depth) {
        (1, SampleDepth::U8) => u8_samples(img.to_luma8().into_raw()),
        (1, SampleDepth::U16) => u16_samples(img.to_luma16().into_raw()),
        (1, SampleDepth::F32) => img.to_luma32f().into_raw(),
        (2, SampleDepth::U8) => u8_samples(img.to_luma_alpha8().into_raw()),
        (2, SampleDepth::U16) => u16_samples(img.to_luma_alpha16().into_raw()),
        (2, SampleDepth::F32) => img.to_luma_alpha32f().into_raw(),
        (3, SampleDepth::U8) => u8_samples(img.to_rgb8().into_raw()),
        (3, SampleDepth::U16) => u16_samples(img.to_rgb16().into_raw()),
        (3, SampleDepth::F32) => img.to_rgb32f().into_raw(),
        (4, SampleDepth::U8) => u8_samples(img.to_rgba8().into_raw()),
        (4, SampleDepth::U16) => u16_samples(img.to_rgba16().into_raw()),
        (4, SampleDepth::F32) => img.to_rgba32f().into_raw(),
        (c, _) => return Err(IoError::UnsupportedChannels(c)),
    };
    Ok(samples)
}

/// A decoded frame in planar `(c, h, w)` order.
struct Frame {
    data: Vec<f32>,
    width: usize,
    height: usize,
    channels: usize,
}

fn read_frame(file_path: &Path) -> Result<Frame, IoError> {
    if !file_path.exists() {
        return Err(IoError::FileDoesNotExist(file_path.to_path_buf()));
    }

    let img = image::ImageReader::open(file_path)?
        .with_guessed_format()?
        .decode()?;

    let width = img.width() as usize;
    let height = img.height() as usize;
    let channels = img.color().channel_count() as usize;
    let interleaved = interleaved_samples(&img, channels)?;

    // hwc -> chw
    let plane = width * height;
    let mut data = vec![0f32; channels * plane];
    for (p, pixel) in interleaved.chunks_exact(channels).enumerate() {
        for (ch, &val) in pixel.iter().enumerate() {
            data[ch * plane + p] = val;
        }
    }

    Ok(Frame {
        data,
        width,
        height,
        channels,
    })
}

/// Load a video clip from a sequence of image files.
///
/// Frames `first, first + step, ...` up to `last` inclusive are decoded from
/// the files obtained by expanding `video_paths` (see [`frame_path`]). Any
/// format recognised by the `image` crate is accepted. All frames must share
/// the same size and number of channels.
///
/// # Arguments
///
/// * `video_paths` - The frame path pattern, e.g. `frames/%03d.png`.
/// * `first` - The index of the first frame.
/// * `last` - The index of the last frame, inclusive.
/// * `step` - The step between two loaded frames.
///
/// # Returns
///
/// The video in `(t, c, h, w)` order.
pub fn read_video(
    video_paths: &str,
    first: usize,
    last: usize,
    step: usize,
) -> Result<Video, IoError> {
    let indices = frame_indices(first, last, step)?;

    let mut data = Vec::new();
    let mut frame_shape = None;
    for &index in indices.iter() {
        let file_path = frame_path(video_paths, index)?;
        log::debug!("reading frame {} from {}", index, file_path.display());

        let frame = read_frame(&file_path)?;
        let actual = (frame.width, frame.height, frame.channels);
        match frame_shape {
            None => frame_shape = Some(actual),
            Some(expected) if expected != actual => {
                return Err(IoError::FrameMismatch {
                    index,
                    expected,
                    actual,
                });
            }
            Some(_) => {}
        }
        data.extend_from_slice(&frame.data);
    }

    // the range is never empty, so the first frame set the shape
    let (w, h, c) = frame_shape.unwrap_or_default();
    Video::new(VideoShape::new(indices.len(), c, h, w), data)
}

/// Load a video into a caller-allocated buffer of the requested shape.
///
/// The destination length is checked against `params.shape` before anything is
/// read, and the loaded video must have exactly the requested shape.
///
/// # Arguments
///
/// * `params` - The load request.
/// * `dst` - The destination buffer with `t * c * h * w` elements.
pub fn read_video_into(params: &ReadVideoParams, dst: &mut [f32]) -> Result<(), IoError> {
    params.log("read_video_into");
    params.check_request(dst)?;

    let video = read_video(
        &params.video_paths,
        params.first_frame,
        params.last_frame,
        params.frame_step,
    )?;

    if video.shape() != params.shape {
        return Err(IoError::ShapeMismatch {
            expected: params.shape,
            actual: video.shape(),
        });
    }

    emit(video.as_slice(), dst)?;
    Ok(())
}

/// Load a video as a single channel into a caller-allocated buffer.
///
/// The requested shape must have one channel. Colour frames are converted with
/// [`Video::to_gray`].
///
/// # Arguments
///
/// * `params` - The load request, with `shape.c == 1`.
/// * `dst` - The destination buffer with `t * h * w` elements.
pub fn read_video_for_flow(params: &ReadVideoParams, dst: &mut [f32]) -> Result<(), IoError> {
    params.log("read_video_for_flow");
    params.check_request(dst)?;

    let video = read_video(
        &params.video_paths,
        params.first_frame,
        params.last_frame,
        params.frame_step,
    )?
    .to_gray();

    if video.shape() != params.shape {
        return Err(IoError::ShapeMismatch {
            expected: params.shape,
            actual: video.shape(),
        });
    }

    emit(video.as_slice(), dst)?;
    Ok(())
}
