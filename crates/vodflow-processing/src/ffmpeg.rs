//! FfmpegEngine - HLS transcoding via the ffmpeg binary.

use crate::engine::{TranscodeError, TranscodingEngine};
use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;

#[derive(Debug, Clone)]
pub struct HlsVariant {
    pub name: &'static str,
    pub width: u32,
    pub height: u32,
    pub bitrate_kbps: u32,
}

const VARIANT_TABLE: [HlsVariant; 4] = [
    HlsVariant {
        name: "360p",
        width: 640,
        height: 360,
        bitrate_kbps: 800,
    },
    HlsVariant {
        name: "480p",
        width: 854,
        height: 480,
        bitrate_kbps: 1400,
    },
    HlsVariant {
        name: "720p",
        width: 1280,
        height: 720,
        bitrate_kbps: 2800,
    },
    HlsVariant {
        name: "1080p",
        width: 1920,
        height: 1080,
        bitrate_kbps: 5000,
    },
];

#[derive(Clone)]
pub struct FfmpegEngine {
    ffmpeg_path: String,
    segment_duration: u64,
    variants: Vec<HlsVariant>,
}

impl FfmpegEngine {
    pub fn new(ffmpeg_path: String, segment_duration: u64, variant_names: &[String]) -> Self {
        let variants = VARIANT_TABLE
            .iter()
            .filter(|v| variant_names.iter().any(|name| name == v.name))
            .cloned()
            .collect();

        Self {
            ffmpeg_path,
            segment_duration,
            variants,
        }
    }

    #[tracing::instrument(skip(self, input, output_dir), fields(variant = variant.name))]
    async fn encode_variant(
        &self,
        input: &Path,
        output_dir: &Path,
        variant: &HlsVariant,
    ) -> Result<(), TranscodeError> {
        let variant_dir = output_dir.join(variant.name);
        tokio::fs::create_dir_all(&variant_dir).await?;

        let playlist_path = variant_dir.join("index.m3u8");
        let segment_pattern = variant_dir.join("segment_%03d.ts");

        let output = Command::new(&self.ffmpeg_path)
            .args([
                "-i",
                &input.to_string_lossy(),
                "-c:v",
                "libx264",
                "-preset",
                "fast",
                "-profile:v",
                "main",
                "-vf",
                &format!("scale={}:{}", variant.width, variant.height),
                "-b:v",
                &format!("{}k", variant.bitrate_kbps),
                "-maxrate",
                &format!("{}k", (variant.bitrate_kbps as f32 * 1.2) as u32),
                "-bufsize",
                &format!("{}k", variant.bitrate_kbps * 2),
                "-c:a",
                "aac",
                "-b:a",
                "128k",
                "-ac",
                "2",
                "-ar",
                "48000",
                "-f",
                "hls",
                "-hls_time",
                &self.segment_duration.to_string(),
                "-hls_playlist_type",
                "vod",
                "-hls_segment_filename",
                &segment_pattern.to_string_lossy(),
                &playlist_path.to_string_lossy(),
            ])
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(TranscodeError::Spawn)?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(TranscodeError::Encoder(stderr.into_owned()));
        }

        Ok(())
    }

    fn master_playlist(&self) -> String {
        let mut playlist = String::from("#EXTM3U\n#EXT-X-VERSION:3\n\n");
        for variant in &self.variants {
            playlist.push_str(&format!(
                "#EXT-X-STREAM-INF:BANDWIDTH={},RESOLUTION={}x{}\n{}/index.m3u8\n\n",
                variant.bitrate_kbps * 1000,
                variant.width,
                variant.height,
                variant.name
            ));
        }
        playlist
    }
}

#[async_trait]
impl TranscodingEngine for FfmpegEngine {
    #[tracing::instrument(skip(self, input, output_dir))]
    async fn encode_to_hls(&self, input: &Path, output_dir: &Path) -> Result<(), TranscodeError> {
        if self.variants.is_empty() {
            return Err(TranscodeError::NoVariants);
        }

        tokio::fs::create_dir_all(output_dir).await?;

        for variant in &self.variants {
            self.encode_variant(input, output_dir, variant).await?;
        }

        tokio::fs::write(output_dir.join("master.m3u8"), self.master_playlist()).await?;

        tracing::info!(
            variant_count = self.variants.len(),
            output_dir = %output_dir.display(),
            "HLS encoding complete"
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variant_selection_filters_table() {
        let engine = FfmpegEngine::new(
            "ffmpeg".to_string(),
            10,
            &["480p".to_string(), "720p".to_string()],
        );
        let names: Vec<_> = engine.variants.iter().map(|v| v.name).collect();
        assert_eq!(names, vec!["480p", "720p"]);
    }

    #[test]
    fn test_master_playlist_lists_each_variant() {
        let engine = FfmpegEngine::new("ffmpeg".to_string(), 10, &["480p".to_string()]);
        let playlist = engine.master_playlist();
        assert!(playlist.starts_with("#EXTM3U"));
        assert!(playlist.contains("BANDWIDTH=1400000,RESOLUTION=854x480"));
        assert!(playlist.contains("480p/index.m3u8"));
    }
}
