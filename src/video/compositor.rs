use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tempfile::TempDir;
use tokio::task;
use tracing::{debug, info};

use crate::error::{Result, VideoError};
use crate::video::types::{EncodedVideo, Still, VideoParams};

/// Whether `program` can be started and exits cleanly with `arg`
async fn program_runs(program: &str, arg: &str) -> bool {
    tokio::process::Command::new(program)
        .arg(arg)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .await
        .map(|status| status.success())
        .unwrap_or(false)
}

/// Encodes stills plus a soundtrack into a video with the external `ffmpeg` binary
pub struct VideoCompositor {
    params: VideoParams,
    threads: usize,
    temp_dir: Option<TempDir>,
}

impl VideoCompositor {
    pub fn new(params: VideoParams, threads: usize) -> Self {
        Self {
            params,
            threads,
            temp_dir: None,
        }
    }

    pub async fn check_ffmpeg_available() -> bool {
        program_runs("ffmpeg", "-version").await
    }

    fn ensure_temp_dir(&mut self) -> Result<PathBuf> {
        if let Some(ref temp_dir) = self.temp_dir {
            return Ok(temp_dir.path().to_path_buf());
        }

        let temp_dir = tempfile::Builder::new().prefix("vocab_reel_encode_").tempdir()?;
        let path = temp_dir.path().to_path_buf();
        self.temp_dir = Some(temp_dir);
        Ok(path)
    }

    /// Show each still for its duration over `audio_path`
    pub async fn compose_video<P: AsRef<Path>>(
        &mut self,
        stills: &[Still],
        audio_path: P,
        output_path: P,
    ) -> Result<EncodedVideo> {
        if stills.is_empty() {
            return Err(VideoError::InvalidParameters {
                details: "no stills to encode".to_string(),
            }
            .into());
        }

        if let Some(bad) = stills.iter().find(|s| !(s.duration > 0.0)) {
            return Err(VideoError::InvalidParameters {
                details: format!("still {:?} has duration {}", bad.path, bad.duration),
            }
            .into());
        }

        if !Self::check_ffmpeg_available().await {
            return Err(VideoError::FfmpegMissing.into());
        }

        info!("Encoding {} stills into {:?}", stills.len(), output_path.as_ref());

        let temp_dir = self.ensure_temp_dir()?;
        let list_path = temp_dir.join("stills.txt");
        Self::write_concat_list(stills, &list_path)?;

        let args = self.ffmpeg_args(&list_path, audio_path.as_ref(), output_path.as_ref());
        debug!("ffmpeg {}", args.join(" "));

        let mut cmd = Command::new("ffmpeg");
        cmd.args(&args);

        let output = task::spawn_blocking(move || cmd.output()).await
            .map_err(|e| VideoError::EncodingFailed {
                reason: format!("Failed to spawn FFmpeg process: {}", e),
            })?
            .map_err(|e| VideoError::EncodingFailed {
                reason: format!("FFmpeg execution failed: {}", e),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let tail: Vec<&str> = stderr.lines().rev().take(12).collect();
            return Err(VideoError::EncodingFailed {
                reason: format!(
                    "FFmpeg failed: {}",
                    tail.into_iter().rev().collect::<Vec<_>>().join("\n")
                ),
            }.into());
        }

        let duration: f64 = stills.iter().map(|s| s.duration).sum();
        let metadata = std::fs::metadata(output_path.as_ref())?;
        let encoded = EncodedVideo {
            path: output_path.as_ref().to_path_buf(),
            duration,
            frame_count: (duration * self.params.fps).round() as usize,
            file_size: metadata.len(),
        };

        info!(
            "Video encoded: {:.1}s, {} frames, {} KB",
            encoded.duration,
            encoded.frame_count,
            encoded.file_size / 1024
        );

        Ok(encoded)
    }

    /// Concat demuxer list; the last still is repeated so its duration is honored
    fn write_concat_list(stills: &[Still], list_path: &Path) -> Result<()> {
        let mut file = File::create(list_path)?;

        let absolute = |path: &Path| path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
        let escape = |path: &Path| absolute(path).display().to_string().replace('\'', "'\\''");

        for still in stills {
            writeln!(file, "file '{}'", escape(&still.path))?;
            writeln!(file, "duration {:.6}", still.duration)?;
        }

        if let Some(last) = stills.last() {
            writeln!(file, "file '{}'", escape(&last.path))?;
        }

        Ok(())
    }

    fn ffmpeg_args(&self, list_path: &Path, audio_path: &Path, output_path: &Path) -> Vec<String> {
        let (w, h) = self.params.resolution;
        vec![
            "-y".to_string(),
            "-f".to_string(), "concat".to_string(),
            "-safe".to_string(), "0".to_string(),
            "-i".to_string(), list_path.display().to_string(),
            "-i".to_string(), audio_path.display().to_string(),
            "-map".to_string(), "0:v".to_string(),
            "-map".to_string(), "1:a".to_string(),
            "-vf".to_string(), format!("scale={}:{},format=yuv420p", w, h),
            "-c:v".to_string(), self.params.codec.clone(),
            "-r".to_string(), self.params.fps.to_string(),
            "-crf".to_string(), self.quality_to_crf(self.params.quality).to_string(),
            "-threads".to_string(), self.threads.to_string(),
            "-c:a".to_string(), self.params.audio_codec.clone(),
            "-movflags".to_string(), "+faststart".to_string(),
            "-shortest".to_string(),
            output_path.display().to_string(),
        ]
    }

    fn quality_to_crf(&self, quality: u8) -> u8 {
        (51 - ((quality.min(100) as f32 / 100.0) * 51.0) as u8).clamp(0, 51)
    }

    pub fn cleanup(&mut self) -> Result<()> {
        if let Some(temp_dir) = self.temp_dir.take() {
            temp_dir.close()?;
        }
        Ok(())
    }
}
