//! Missing-frame estimation from buffer duration and stream frame rate

use crate::source::StreamInfo;

/// How many frames went missing before a buffer of the given duration.
///
/// A buffer normally spans one frame period; a longer one means the
/// pipeline skipped frames. Expected counts round half away from zero.
/// Returns `None` when nothing is missing or when negotiation did not
/// supply a usable frame rate.
pub fn missing_frames(duration_secs: f64, info: &StreamInfo) -> Option<u64> {
    if !info.has_frame_rate() {
        return None;
    }

    let expected = (duration_secs * info.fps_num as f64 / info.fps_den as f64).round() as i64;
    if expected > 1 {
        Some((expected - 1) as u64)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fps(num: i32, den: i32) -> StreamInfo {
        StreamInfo {
            fps_num: num,
            fps_den: den,
            ..Default::default()
        }
    }

    #[test]
    fn one_frame_period_is_clean() {
        assert_eq!(missing_frames(1.0 / 30.0, &fps(30, 1)), None);
    }

    #[test]
    fn three_frame_periods_means_two_missing() {
        assert_eq!(missing_frames(3.0 / 30.0, &fps(30, 1)), Some(2));
    }

    #[test]
    fn fractional_rates_work() {
        // 30000/1001 NTSC; two frame periods
        let dur = 2.0 * 1001.0 / 30000.0;
        assert_eq!(missing_frames(dur, &fps(30000, 1001)), Some(1));
    }

    #[test]
    fn no_frame_rate_skips_the_check() {
        assert_eq!(missing_frames(5.0, &fps(0, 0)), None);
        assert_eq!(missing_frames(5.0, &fps(30, 0)), None);
        assert_eq!(missing_frames(5.0, &fps(0, 1)), None);
    }

    #[test]
    fn zero_duration_is_clean() {
        assert_eq!(missing_frames(0.0, &fps(30, 1)), None);
    }
}
