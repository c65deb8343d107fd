use std::io::{Read, Write as _};
use std::process::{Child, ChildStdin, Command, Stdio};
use std::sync::OnceLock;
use std::sync::mpsc::{Receiver, channel};
use std::thread::JoinHandle;

use crate::capture::recorder::{ContainerFormat, Recorder, RecorderConfig};
use crate::foundation::error::{ReelError, ReelResult};
use crate::foundation::math::mul_div255_u16;
use crate::render::frame::FrameRGBA;

const READ_CHUNK: usize = 64 * 1024;

/// Recorder that spawns the system `ffmpeg`, streams raw frames to its stdin and collects the
/// encoded container from its stdout as chunks.
pub struct FfmpegRecorder {
    bg_rgba: [u8; 4],
    encoders: OnceLock<Vec<String>>,

    child: Option<Child>,
    stdin: Option<ChildStdin>,
    stdout_reader: Option<JoinHandle<std::io::Result<()>>>,
    stderr_drain: Option<JoinHandle<std::io::Result<Vec<u8>>>>,
    chunks: Option<Receiver<Vec<u8>>>,

    scratch: Vec<u8>,
    cfg: Option<RecorderConfig>,
}

impl std::fmt::Debug for FfmpegRecorder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FfmpegRecorder")
            .field("bg_rgba", &self.bg_rgba)
            .field("running", &self.child.is_some())
            .field("cfg", &self.cfg)
            .finish()
    }
}

impl Default for FfmpegRecorder {
    fn default() -> Self {
        Self::new([255, 255, 255, 255])
    }
}

impl FfmpegRecorder {
    /// Recorder flattening transparent pixels over `bg_rgba` (straight alpha).
    pub fn new(bg_rgba: [u8; 4]) -> Self {
        Self {
            bg_rgba,
            encoders: OnceLock::new(),
            child: None,
            stdin: None,
            stdout_reader: None,
            stderr_drain: None,
            chunks: None,
            scratch: Vec::new(),
            cfg: None,
        }
    }

    fn encoders(&self) -> &[String] {
        self.encoders.get_or_init(list_encoders)
    }

    fn close(&mut self) -> ReelResult<Vec<Vec<u8>>> {
        drop(self.stdin.take());
        let mut child = self
            .child
            .take()
            .ok_or_else(|| ReelError::encode("ffmpeg recorder not started"))?;

        let status = child
            .wait()
            .map_err(|e| ReelError::encode(format!("failed to wait for ffmpeg to finish: {e}")))?;
        if let Some(handle) = self.stdout_reader.take() {
            handle
                .join()
                .map_err(|_| ReelError::encode("ffmpeg stdout reader thread panicked"))?
                .map_err(|e| ReelError::encode(format!("ffmpeg stdout read failed: {e}")))?;
        }
        let stderr_bytes = match self.stderr_drain.take() {
            Some(handle) => handle
                .join()
                .map_err(|_| ReelError::encode("ffmpeg stderr drain thread panicked"))?
                .map_err(|e| ReelError::encode(format!("ffmpeg stderr read failed: {e}")))?,
            None => Vec::new(),
        };
        let rest = self.take_chunks();
        self.chunks = None;
        self.cfg = None;

        if !status.success() {
            let stderr = String::from_utf8_lossy(&stderr_bytes);
            return Err(ReelError::encode(format!(
                "ffmpeg exited with status {}: {}",
                status,
                stderr.trim()
            )));
        }
        Ok(rest)
    }
}

impl Recorder for FfmpegRecorder {
    fn supports(&self, format: ContainerFormat) -> bool {
        let name = encoder_name(format);
        self.encoders().iter().any(|e| e == name)
    }

    fn begin(&mut self, cfg: RecorderConfig) -> ReelResult<()> {
        if self.child.is_some() {
            return Err(ReelError::encode("ffmpeg recorder is already running"));
        }
        if cfg.width == 0 || cfg.height == 0 {
            return Err(ReelError::validation(
                "ffmpeg recorder width/height must be non-zero",
            ));
        }
        if !cfg.width.is_multiple_of(2) || !cfg.height.is_multiple_of(2) {
            return Err(ReelError::validation(
                "ffmpeg recorder width/height must be even (required for yuv420p output)",
            ));
        }
        if !is_ffmpeg_on_path() {
            return Err(ReelError::encode(
                "ffmpeg is required for video capture, but was not found on PATH",
            ));
        }

        let mut cmd = Command::new("ffmpeg");
        cmd.stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        cmd.args([
            "-loglevel",
            "error",
            "-f",
            "rawvideo",
            "-pix_fmt",
            "rgba",
            "-s",
            &format!("{}x{}", cfg.width, cfg.height),
            "-r",
            &format!("{}/{}", cfg.fps.num, cfg.fps.den),
            "-i",
            "pipe:0",
            "-an",
            "-c:v",
            encoder_name(cfg.format),
            "-b:v",
            &cfg.video_bits_per_second.to_string(),
            "-pix_fmt",
            "yuv420p",
        ]);
        match cfg.format {
            ContainerFormat::WebmVp9 | ContainerFormat::Webm => {
                cmd.args(["-deadline", "realtime", "-f", "webm"]);
            }
            // Non-seekable output needs a fragmented MP4.
            ContainerFormat::Mp4 => {
                cmd.args(["-movflags", "frag_keyframe+empty_moov", "-f", "mp4"]);
            }
        }
        cmd.arg("pipe:1");

        let mut child = cmd.spawn().map_err(|e| {
            ReelError::encode(format!(
                "failed to spawn ffmpeg (is it installed and on PATH?): {e}"
            ))
        })?;
        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| ReelError::encode("failed to open ffmpeg stdin (unexpected)"))?;
        let mut stdout = child
            .stdout
            .take()
            .ok_or_else(|| ReelError::encode("failed to open ffmpeg stdout (unexpected)"))?;
        let mut stderr = child
            .stderr
            .take()
            .ok_or_else(|| ReelError::encode("failed to open ffmpeg stderr (unexpected)"))?;

        let (tx, rx) = channel();
        let stdout_reader = std::thread::spawn(move || {
            let mut buf = vec![0u8; READ_CHUNK];
            loop {
                let n = stdout.read(&mut buf)?;
                if n == 0 {
                    return Ok(());
                }
                if tx.send(buf[..n].to_vec()).is_err() {
                    return Ok(());
                }
            }
        });
        let stderr_drain = std::thread::spawn(move || {
            let mut stderr_bytes = Vec::new();
            stderr.read_to_end(&mut stderr_bytes)?;
            Ok(stderr_bytes)
        });

        tracing::debug!(format = %cfg.format, width = cfg.width, height = cfg.height, "ffmpeg recorder started");
        self.scratch = vec![0u8; (cfg.width as usize) * (cfg.height as usize) * 4];
        self.child = Some(child);
        self.stdin = Some(stdin);
        self.stdout_reader = Some(stdout_reader);
        self.stderr_drain = Some(stderr_drain);
        self.chunks = Some(rx);
        self.cfg = Some(cfg);
        Ok(())
    }

    fn push_frame(&mut self, frame: &FrameRGBA) -> ReelResult<Vec<Vec<u8>>> {
        let cfg = self
            .cfg
            .as_ref()
            .ok_or_else(|| ReelError::encode("ffmpeg recorder not started"))?;
        if frame.width != cfg.width || frame.height != cfg.height {
            return Err(ReelError::validation(format!(
                "frame size mismatch: got {}x{}, expected {}x{}",
                frame.width, frame.height, cfg.width, cfg.height
            )));
        }
        if frame.data.len() != self.scratch.len() {
            return Err(ReelError::validation(
                "frame.data size mismatch with width*height*4",
            ));
        }

        flatten_to_opaque_rgba8(
            &mut self.scratch,
            &frame.data,
            frame.premultiplied,
            self.bg_rgba,
        )?;

        let Some(stdin) = self.stdin.as_mut() else {
            return Err(ReelError::encode("ffmpeg recorder is already finalized"));
        };
        stdin.write_all(&self.scratch).map_err(|e| {
            ReelError::encode(format!("failed to write frame to ffmpeg stdin: {e}"))
        })?;
        Ok(self.take_chunks())
    }

    fn take_chunks(&mut self) -> Vec<Vec<u8>> {
        match self.chunks.as_ref() {
            Some(rx) => rx.try_iter().collect(),
            None => Vec::new(),
        }
    }

    fn finish(&mut self) -> ReelResult<Vec<Vec<u8>>> {
        self.close()
    }
}

impl Drop for FfmpegRecorder {
    fn drop(&mut self) {
        if self.child.is_some()
            && let Err(err) = self.close()
        {
            tracing::warn!(%err, "ffmpeg recorder dropped while running");
        }
    }
}

fn encoder_name(format: ContainerFormat) -> &'static str {
    match format {
        ContainerFormat::WebmVp9 => "libvpx-vp9",
        ContainerFormat::Webm => "libvpx",
        ContainerFormat::Mp4 => "libx264",
    }
}

fn list_encoders() -> Vec<String> {
    let output = Command::new("ffmpeg")
        .args(["-hide_banner", "-encoders"])
        .stdin(Stdio::null())
        .stderr(Stdio::null())
        .output();
    match output {
        Ok(out) if out.status.success() => parse_encoder_list(&String::from_utf8_lossy(&out.stdout)),
        Ok(out) => {
            tracing::warn!(status = %out.status, "ffmpeg -encoders failed");
            Vec::new()
        }
        Err(err) => {
            tracing::warn!(%err, "ffmpeg not available");
            Vec::new()
        }
    }
}

/// Encoder names from `ffmpeg -encoders` output (`" V....D libx264   description"` lines).
fn parse_encoder_list(text: &str) -> Vec<String> {
    text.lines()
        .skip_while(|l| !l.trim_start().starts_with("------"))
        .skip(1)
        .filter_map(|l| {
            let mut parts = l.split_whitespace();
            let flags = parts.next()?;
            let name = parts.next()?;
            flags.starts_with('V').then(|| name.to_owned())
        })
        .collect()
}

/// Return `true` when `ffmpeg` can be invoked from `PATH`.
pub fn is_ffmpeg_on_path() -> bool {
    Command::new("ffmpeg")
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

fn flatten_to_opaque_rgba8(
    dst: &mut [u8],
    src: &[u8],
    src_is_premul: bool,
    bg_rgba: [u8; 4],
) -> ReelResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(ReelError::validation(
            "flatten_to_opaque_rgba8 expects equal-length rgba8 buffers",
        ));
    }

    let bg = [
        u16::from(bg_rgba[0]),
        u16::from(bg_rgba[1]),
        u16::from(bg_rgba[2]),
    ];
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let a = u16::from(s[3]);
        if a == 255 {
            d.copy_from_slice(s);
            continue;
        }
        let inv = 255 - a;
        for c in 0..3 {
            let fg = if src_is_premul {
                u16::from(s[c])
            } else {
                mul_div255_u16(u16::from(s[c]), a)
            };
            d[c] = (fg + mul_div255_u16(bg[c], inv)).min(255) as u8;
        }
        d[3] = 255;
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/capture/ffmpeg.rs"]
mod tests;
