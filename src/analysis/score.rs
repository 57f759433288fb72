//! SAD scoring of a frame against one mask.
//!
//! Pure-black mask pixels (RGB) and zero mask bytes (luma) are don't-care
//! markers and are excluded from both the sum and the pixel count.

use crate::source::PixelFormat;

/// Score returned when no pixels were comparable; never below any
/// finite threshold.
pub const INCOMPARABLE: f64 = f64::INFINITY;

/// Average absolute difference between `frame` and `mask`, over the
/// pixels the mask cares about. Lower is more similar.
pub fn score(mask: &[u8], frame: &[u8], format: PixelFormat) -> f64 {
    let n = mask.len().min(frame.len());
    match format {
        PixelFormat::Rgb => score_rgb(&mask[..n], &frame[..n]),
        PixelFormat::I420 => score_luma(&mask[..n], &frame[..n]),
    }
}

fn score_rgb(mask: &[u8], frame: &[u8]) -> f64 {
    let mut sad: u64 = 0;
    let mut pixels: u64 = 0;

    for (m, f) in mask.chunks_exact(3).zip(frame.chunks_exact(3)) {
        if m == [0, 0, 0] {
            continue;
        }
        let d0 = m[0].abs_diff(f[0]) as u64;
        let d1 = m[1].abs_diff(f[1]) as u64;
        let d2 = m[2].abs_diff(f[2]) as u64;
        sad += (d0 + d1 + d2) / 3;
        pixels += 1;
    }

    if pixels == 0 {
        return INCOMPARABLE;
    }
    sad as f64 / pixels as f64
}

fn score_luma(mask: &[u8], frame: &[u8]) -> f64 {
    // Luma plane is the first 2/3 of an I420 buffer; chroma is ignored
    let luma = mask.len() * 2 / 3;
    let mut sad: u64 = 0;
    let mut bytes: u64 = 0;

    for (m, f) in mask[..luma].iter().zip(frame[..luma].iter()) {
        if *m == 0 {
            continue;
        }
        sad += m.abs_diff(*f) as u64;
        bytes += 1;
    }

    if bytes == 0 {
        return INCOMPARABLE;
    }
    sad as f64 / bytes as f64
}
