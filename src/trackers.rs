/// Sparse LAP tracker linking every pair of consecutive frames
///
pub mod frame_to_frame;
