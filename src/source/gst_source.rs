//! GStreamer-based frame supplier decoding a clip file to raw video

use bytes::Bytes;
use gstreamer as gst;
use gstreamer::prelude::*;
use gstreamer_app as gst_app;
use gstreamer_video as gst_video;
use tracing::{debug, info, warn};

use crate::source::frame::{nanos_to_seconds, Frame, StreamInfo};
use crate::source::{FrameSupplier, SourceError};
use crate::Config;

/// Decodes a media file into a sequence of raw frames via appsink
pub struct GstFileSource {
    pipeline: gst::Pipeline,
    appsink: gst_app::AppSink,
}

impl GstFileSource {
    /// Create a decode pipeline for the configured clip
    pub fn new(config: &Config) -> Result<Self, SourceError> {
        gst::init().map_err(|e| SourceError::Setup(format!("GStreamer init failed: {e}")))?;

        let pipeline_str = Self::build_pipeline_string(config);
        info!("Pipeline: {}", pipeline_str);

        let pipeline = gst::parse::launch(&pipeline_str)
            .map_err(|e| SourceError::Setup(e.to_string()))?
            .downcast::<gst::Pipeline>()
            .map_err(|_| SourceError::Setup("failed to create pipeline".into()))?;

        let filesrc = pipeline
            .by_name("src")
            .ok_or_else(|| SourceError::Setup("failed to find filesrc element".into()))?;
        filesrc.set_property("location", config.source.clip.to_string_lossy().as_ref());

        let appsink = pipeline
            .by_name("sink")
            .ok_or_else(|| SourceError::Setup("failed to find appsink element".into()))?
            .downcast::<gst_app::AppSink>()
            .map_err(|_| SourceError::Setup("failed to cast to AppSink".into()))?;

        // Pull-driven operation; don't sync delivery to the clock
        appsink.set_property("emit-signals", false);
        appsink.set_property("max-buffers", 10u32);
        appsink.set_property("sync", false);

        Ok(Self { pipeline, appsink })
    }

    fn build_pipeline_string(config: &Config) -> String {
        let format = config.format.gst_name();

        match config.source.rate {
            // videorate decimates delivery so long clips scan faster
            Some(rate) => format!(
                "filesrc name=src ! \
                 decodebin ! \
                 videoconvert ! \
                 videorate ! \
                 video/x-raw,format={format},framerate={rate}/1 ! \
                 appsink name=sink"
            ),
            None => format!(
                "filesrc name=src ! \
                 decodebin ! \
                 videoconvert ! \
                 video/x-raw,format={format} ! \
                 appsink name=sink"
            ),
        }
    }

    /// Pull any pending error off the bus for a useful message
    fn pipeline_error(&self) -> String {
        if let Some(bus) = self.pipeline.bus() {
            while let Some(msg) =
                bus.timed_pop_filtered(gst::ClockTime::ZERO, &[gst::MessageType::Error])
            {
                if let gst::MessageView::Error(err) = msg.view() {
                    return format!(
                        "{} ({})",
                        err.error(),
                        err.debug().map(|d| d.to_string()).unwrap_or_default()
                    );
                }
            }
        }
        "unknown pipeline error".into()
    }

    /// Stream geometry from the preroll sample's caps. Unparseable or
    /// missing caps are tolerated; the zero defaults disable the
    /// diagnostics that would need them.
    fn info_from_sample(sample: &gst::Sample) -> StreamInfo {
        let Some(caps) = sample.caps() else {
            warn!("Preroll sample carries no caps");
            return StreamInfo::default();
        };

        match gst_video::VideoInfo::from_caps(caps) {
            Ok(video_info) => StreamInfo {
                width: video_info.width(),
                height: video_info.height(),
                fps_num: video_info.fps().numer(),
                fps_den: video_info.fps().denom(),
            },
            Err(_) => {
                warn!("Failed to parse video info from caps");
                StreamInfo::default()
            }
        }
    }
}

impl FrameSupplier for GstFileSource {
    fn negotiate(&mut self) -> Result<StreamInfo, SourceError> {
        self.pipeline
            .set_state(gst::State::Playing)
            .map_err(|e| SourceError::Setup(format!("failed to start pipeline: {e:?}")))?;

        // The preroll sample carries the negotiated caps
        let sample = self
            .appsink
            .pull_preroll()
            .map_err(|_| SourceError::Pipeline(self.pipeline_error()))?;

        let info = Self::info_from_sample(&sample);
        info!(
            "Negotiated {}x{} @ {}/{}",
            info.width, info.height, info.fps_num, info.fps_den
        );
        Ok(info)
    }

    fn next(&mut self) -> Result<Option<Frame>, SourceError> {
        let sample = match self.appsink.pull_sample() {
            Ok(sample) => sample,
            Err(_) if self.appsink.is_eos() => {
                debug!("End of stream");
                return Ok(None);
            }
            Err(_) => return Err(SourceError::Pipeline(self.pipeline_error())),
        };

        let buffer = sample
            .buffer()
            .ok_or_else(|| SourceError::Pipeline("sample contains no buffer".into()))?;
        let map = buffer
            .map_readable()
            .map_err(|_| SourceError::Pipeline("failed to map buffer".into()))?;

        let data = Bytes::copy_from_slice(map.as_slice());
        let pts = nanos_to_seconds(buffer.pts().map(|t| t.nseconds()).unwrap_or(0));
        let duration = nanos_to_seconds(buffer.duration().map(|t| t.nseconds()).unwrap_or(0));

        Ok(Some(Frame {
            data,
            pts,
            duration,
        }))
    }

    fn close(&mut self) {
        let _ = self.pipeline.set_state(gst::State::Null);
    }
}

impl Drop for GstFileSource {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stream_info_comes_from_negotiated_caps() {
        gst::init().unwrap();

        let caps = gst::Caps::builder("video/x-raw")
            .field("format", "RGB")
            .field("width", 320i32)
            .field("height", 240i32)
            .field("framerate", gst::Fraction::new(30, 1))
            .build();
        let sample = gst::Sample::builder()
            .buffer(&gst::Buffer::new())
            .caps(&caps)
            .build();

        let info = GstFileSource::info_from_sample(&sample);
        assert_eq!(info.width, 320);
        assert_eq!(info.height, 240);
        assert_eq!(info.fps_num, 30);
        assert_eq!(info.fps_den, 1);
        assert!(info.has_frame_rate());
    }

    #[test]
    fn capless_sample_defaults_and_disables_drop_estimation() {
        gst::init().unwrap();

        let sample = gst::Sample::builder().buffer(&gst::Buffer::new()).build();

        let info = GstFileSource::info_from_sample(&sample);
        assert_eq!(info.width, 0);
        assert_eq!(info.height, 0);
        assert!(!info.has_frame_rate());
    }
}
