use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// One decoded picture delivered by a frame supplier
#[derive(Clone)]
pub struct Frame {
    /// Immutable raw pixel data for exactly one picture
    pub data: Bytes,

    /// Presentation time in seconds
    pub pts: f64,

    /// Buffer duration in seconds
    pub duration: f64,
}

/// Stream geometry announced once during format negotiation.
///
/// Fields the pipeline failed to announce stay at zero; a zero
/// frame-rate denominator disables frame-drop estimation downstream.
#[derive(Debug, Clone, Copy, Default)]
pub struct StreamInfo {
    pub width: u32,
    pub height: u32,
    pub fps_num: i32,
    pub fps_den: i32,
}

impl StreamInfo {
    pub fn has_frame_rate(&self) -> bool {
        self.fps_den != 0 && self.fps_num > 0
    }
}

/// Pixel layouts we score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PixelFormat {
    /// Packed RGB, 3 interleaved bytes per pixel
    Rgb,
    /// Planar 4:2:0, luma plane first (2/3 of the buffer)
    I420,
}

impl PixelFormat {
    /// Caps format name GStreamer expects
    pub fn gst_name(&self) -> &'static str {
        match self {
            PixelFormat::Rgb => "RGB",
            PixelFormat::I420 => "I420",
        }
    }
}

/// Convert a nanosecond clock value to seconds, splitting into whole
/// seconds plus remainder so large timestamps keep sub-second precision.
pub fn nanos_to_seconds(nanos: u64) -> f64 {
    let secs = nanos / 1_000_000_000;
    let rem = nanos % 1_000_000_000;
    secs as f64 + rem as f64 / 1e9
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nanos_split_into_seconds_and_remainder() {
        assert_eq!(nanos_to_seconds(0), 0.0);
        assert_eq!(nanos_to_seconds(1_000_000_000), 1.0);
        assert_eq!(nanos_to_seconds(1_500_000_000), 1.5);
        // Large timestamp where a naive f64 division of the raw nanos
        // would lose sub-second precision
        let nanos = 86_400 * 1_000_000_000u64 + 123_456_789;
        let got = nanos_to_seconds(nanos);
        assert!((got - (86_400.0 + 0.123_456_789)).abs() < 1e-9);
    }

    #[test]
    fn gst_caps_names() {
        assert_eq!(PixelFormat::Rgb.gst_name(), "RGB");
        assert_eq!(PixelFormat::I420.gst_name(), "I420");
    }
}
