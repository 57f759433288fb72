//! Per-clip orchestration: drives a frame supplier, scores every frame
//! against the mask library and reports the hits.

use std::io::Write;

use color_eyre::{eyre::eyre, Result};
use tracing::{debug, info, warn};

use crate::analysis::{detect, missing_frames, MaskStore};
use crate::dump::{DumpError, DumpWriter};
use crate::source::{Frame, FrameSupplier, StreamInfo};
use crate::Config;

/// Session lifecycle; transitions only move forward
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Uninitialized,
    Negotiated,
    Streaming,
    Finished,
}

/// Processes exactly one clip end-to-end.
///
/// Match lines go to `sink` in the form
/// `<mask_name>\t<score to 1 decimal>\t<timestamp to 3 decimals>`,
/// masks in load order within a frame, frames in arrival order.
pub struct StreamSession<W: Write> {
    config: Config,
    masks: MaskStore,
    sink: W,
    dumper: Option<DumpWriter>,
    state: SessionState,
    info: StreamInfo,
    frame_counter: u64,
}

impl<W: Write> StreamSession<W> {
    /// Fails when the dump directory cannot be created, which is a
    /// startup-configuration problem rather than a streaming one.
    pub fn new(masks: MaskStore, config: Config, sink: W) -> Result<Self, DumpError> {
        let dumper = if config.scan.dump {
            Some(DumpWriter::new(&config.scan.dump_dir)?)
        } else {
            None
        };
        Ok(Self {
            config,
            masks,
            sink,
            dumper,
            state: SessionState::Uninitialized,
            info: StreamInfo::default(),
            frame_counter: 0,
        })
    }

    /// Drive the supplier to end of stream. Pipeline errors from the
    /// supplier terminate the session and propagate to the caller.
    pub fn run(&mut self, source: &mut dyn FrameSupplier) -> Result<()> {
        if self.state != SessionState::Uninitialized {
            return Err(eyre!("session already consumed"));
        }

        self.info = source.negotiate()?;
        self.state = SessionState::Negotiated;
        if !self.info.has_frame_rate() {
            warn!("No frame rate negotiated; frame-drop estimation disabled");
        }

        let result = loop {
            match source.next() {
                Ok(Some(frame)) => {
                    self.state = SessionState::Streaming;
                    if let Err(e) = self.process_frame(&frame) {
                        break Err(e);
                    }
                }
                Ok(None) => {
                    info!("Stream finished after {} frames", self.frame_counter);
                    break Ok(());
                }
                Err(e) => break Err(e.into()),
            }
        };

        self.state = SessionState::Finished;
        source.close();
        result
    }

    fn process_frame(&mut self, frame: &Frame) -> Result<()> {
        let events = detect(
            &self.masks,
            &frame.data,
            frame.pts,
            self.config.format,
            self.config.scan.threshold,
        );

        for event in &events {
            writeln!(
                self.sink,
                "{}\t{:.1}\t{:.3}",
                event.mask, event.score, event.timestamp
            )?;

            if let Some(dumper) = &self.dumper {
                // Dump failures are logged and absorbed; the scan goes on
                if let Err(e) = dumper.write(&event.mask, self.frame_counter, &frame.data) {
                    warn!("{}", e);
                }
            }
        }

        if let Some(missing) = missing_frames(frame.duration, &self.info) {
            warn!(
                "{} frame(s) presumed dropped before t={:.3}",
                missing, frame.pts
            );
        }

        debug!(
            "Frame {} at t={:.3}: {} match(es)",
            self.frame_counter,
            frame.pts,
            events.len()
        );

        // One delivery, one increment, scorable or not
        self.frame_counter += 1;
        Ok(())
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn frames_seen(&self) -> u64 {
        self.frame_counter
    }

    pub fn into_sink(self) -> W {
        self.sink
    }
}
