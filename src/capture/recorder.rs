use crate::foundation::core::Fps;
use crate::foundation::error::{ReelError, ReelResult};
use crate::render::frame::FrameRGBA;

/// Output container/codec pair a recorder can produce.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContainerFormat {
    /// WebM with VP9.
    WebmVp9,
    /// WebM with the container's default codec (VP8).
    Webm,
    /// MP4 with H.264.
    Mp4,
}

impl ContainerFormat {
    /// Negotiation order, most preferred first.
    pub const PREFERENCE: [ContainerFormat; 3] = [Self::WebmVp9, Self::Webm, Self::Mp4];

    /// MIME type string.
    pub fn mime(self) -> &'static str {
        match self {
            Self::WebmVp9 => "video/webm;codecs=vp9",
            Self::Webm => "video/webm",
            Self::Mp4 => "video/mp4",
        }
    }

    /// File extension without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            Self::WebmVp9 | Self::Webm => "webm",
            Self::Mp4 => "mp4",
        }
    }
}

impl std::fmt::Display for ContainerFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.mime())
    }
}

/// Parameters handed to [`Recorder::begin`].
#[derive(Clone, Debug, PartialEq)]
pub struct RecorderConfig {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Frame rate the stream is encoded at.
    pub fps: Fps,
    /// Target bitrate.
    pub video_bits_per_second: u32,
    /// Negotiated container.
    pub format: ContainerFormat,
}

/// Encoding backend fed with captured frames.
///
/// Encoded data comes back as chunks, either directly from [`Recorder::push_frame`] or later via
/// [`Recorder::take_chunks`]. Chunks may be empty.
pub trait Recorder {
    /// Whether this backend can produce `format`.
    fn supports(&self, format: ContainerFormat) -> bool;

    /// Start a new stream.
    fn begin(&mut self, cfg: RecorderConfig) -> ReelResult<()>;

    /// Encode one frame, returning any chunks produced synchronously.
    fn push_frame(&mut self, frame: &FrameRGBA) -> ReelResult<Vec<Vec<u8>>>;

    /// Chunks that became available since the last call.
    fn take_chunks(&mut self) -> Vec<Vec<u8>>;

    /// Flush and close the stream, returning the remaining chunks.
    fn finish(&mut self) -> ReelResult<Vec<Vec<u8>>>;

    /// Close the stream and discard its output.
    fn abort(&mut self) {
        if let Err(err) = self.finish() {
            tracing::debug!(%err, "recorder abort");
        }
    }
}

/// Recorder that keeps frames uncompressed: every pushed frame becomes one straight-alpha RGBA
/// chunk.
#[derive(Debug)]
pub struct InMemoryRecorder {
    supported: Vec<ContainerFormat>,
    cfg: Option<RecorderConfig>,
    frames: u64,
}

impl Default for InMemoryRecorder {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryRecorder {
    /// Recorder accepting every container.
    pub fn new() -> Self {
        Self::with_supported(ContainerFormat::PREFERENCE.to_vec())
    }

    /// Recorder that only claims support for `formats`.
    pub fn with_supported(formats: Vec<ContainerFormat>) -> Self {
        Self {
            supported: formats,
            cfg: None,
            frames: 0,
        }
    }

    /// Configuration of the current or last stream.
    pub fn config(&self) -> Option<&RecorderConfig> {
        self.cfg.as_ref()
    }

    /// Frames pushed into the current or last stream.
    pub fn frames_pushed(&self) -> u64 {
        self.frames
    }
}

impl Recorder for InMemoryRecorder {
    fn supports(&self, format: ContainerFormat) -> bool {
        self.supported.contains(&format)
    }

    fn begin(&mut self, cfg: RecorderConfig) -> ReelResult<()> {
        if cfg.width == 0 || cfg.height == 0 {
            return Err(ReelError::validation(
                "recorder width/height must be non-zero",
            ));
        }
        self.cfg = Some(cfg);
        self.frames = 0;
        Ok(())
    }

    fn push_frame(&mut self, frame: &FrameRGBA) -> ReelResult<Vec<Vec<u8>>> {
        let cfg = self
            .cfg
            .as_ref()
            .ok_or_else(|| ReelError::encode("recorder not started"))?;
        if frame.width != cfg.width || frame.height != cfg.height {
            return Err(ReelError::validation(format!(
                "frame size mismatch: got {}x{}, expected {}x{}",
                frame.width, frame.height, cfg.width, cfg.height
            )));
        }
        self.frames += 1;
        Ok(vec![frame.to_straight().data])
    }

    fn take_chunks(&mut self) -> Vec<Vec<u8>> {
        Vec::new()
    }

    fn finish(&mut self) -> ReelResult<Vec<Vec<u8>>> {
        if self.cfg.is_none() {
            return Err(ReelError::encode("recorder not started"));
        }
        Ok(Vec::new())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/capture/recorder.rs"]
mod tests;
