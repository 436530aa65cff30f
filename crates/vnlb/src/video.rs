use vnlb_io::ReadVideoParams;

use crate::error::VnlbError;

/// Load a video clip into a caller-allocated buffer in `(t, c, h, w)` order.
///
/// The destination must have exactly `t * c * h * w` elements of the requested
/// shape, and the frames on disk must match that shape.
///
/// # Example
///
/// ```no_run
/// use vnlb::{read_video_for_vnlb, ReadVideoParams, VideoShape};
///
/// let params = ReadVideoParams {
///     video_paths: "frames/%03d.png".to_string(),
///     first_frame: 0,
///     last_frame: 9,
///     frame_step: 1,
///     shape: VideoShape::new(10, 3, 240, 320),
///     verbose: true,
/// };
/// let mut video = vec![0f32; params.shape.numel()];
/// read_video_for_vnlb(&params, &mut video).unwrap();
/// ```
pub fn read_video_for_vnlb(params: &ReadVideoParams, dst: &mut [f32]) -> Result<(), VnlbError> {
    vnlb_io::read_video_into(params, dst)?;
    Ok(())
}

/// Load a video clip as grey frames into a caller-allocated buffer.
///
/// The requested shape must have a single channel; colour frames are converted
/// to luma.
pub fn read_video_for_flow(params: &ReadVideoParams, dst: &mut [f32]) -> Result<(), VnlbError> {
    vnlb_io::read_video_for_flow(params, dst)?;
    Ok(())
}
