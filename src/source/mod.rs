pub mod frame;
pub mod gst_source;

pub use frame::{nanos_to_seconds, Frame, PixelFormat, StreamInfo};
pub use gst_source::GstFileSource;

use thiserror::Error;

/// Errors surfaced by a frame supplier
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to build media pipeline: {0}")]
    Setup(String),

    #[error("pipeline error: {0}")]
    Pipeline(String),
}

/// A supplier of decoded frames, driven synchronously by the session.
///
/// `negotiate` runs exactly once before any frame is pulled and reports
/// whatever stream geometry the pipeline could determine. `next` blocks
/// until a frame is available, returning `None` at end of stream.
pub trait FrameSupplier {
    fn negotiate(&mut self) -> Result<StreamInfo, SourceError>;
    fn next(&mut self) -> Result<Option<Frame>, SourceError>;
    fn close(&mut self);
}
