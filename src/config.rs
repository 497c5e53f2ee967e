use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// User-supplied captioning settings.
///
/// A config is a snapshot: requests clone the fields they carry at
/// submission time, so later edits never affect an in-flight job.
///
/// # Example
///
/// ```rust
/// use clip_captioner::config::{CaptionConfig, SamplingType};
///
/// let mut config = CaptionConfig::default();
/// config.num_frames = 8;
/// config.sampling_type = SamplingType::Head;
/// config.prefill = "A video of".into();
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptionConfig {
    /// System prompt sent to the vision-language model.
    pub system_prompt: String,
    /// How many frames the backend should sample from each clip (>= 1).
    pub num_frames: u32,
    /// Frame sampling strategy.
    pub sampling_type: SamplingType,
    /// Model name as loaded in the backend.
    pub model: String,
    /// Assistant prefill the model continues from; empty disables it.
    pub prefill: String,
    /// Batch only: overwrite existing caption files.
    pub overwrite: bool,
    /// Batch only: prepend the new caption to an existing caption file.
    pub prepend_existing: bool,
    /// Batch only: emit a completion notice when the run succeeds.
    /// Never sent to the backend.
    pub notify_on_done: bool,
}

/// Frame sampling strategy understood by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SamplingType {
    /// Frames spread evenly across the whole clip.
    Uniform,
    /// The first N frames.
    Head,
}

impl SamplingType {
    /// Wire name, as the backend expects it in form fields and JSON.
    pub fn as_str(&self) -> &'static str {
        match self {
            SamplingType::Uniform => "uniform",
            SamplingType::Head => "head",
        }
    }
}

impl fmt::Display for SamplingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Default for CaptionConfig {
    fn default() -> Self {
        Self {
            system_prompt: "You caption videos for dataset creation. Respond with ONLY the caption."
                .to_string(),
            num_frames: 5,
            sampling_type: SamplingType::Uniform,
            model: "qwen2.5-vl-32b-instruct".to_string(),
            prefill: String::new(),
            overwrite: false,
            prepend_existing: false,
            notify_on_done: false,
        }
    }
}

impl CaptionConfig {
    /// Load a config from a JSON file, falling back to defaults when the
    /// file does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::warn!("Config file not found at {}. Using defaults.", path.display());
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path).context("Failed to read config file")?;
        let config: CaptionConfig =
            serde_json::from_str(&contents).context("Failed to parse config file")?;
        Ok(config)
    }

    /// Save the config as pretty-printed JSON.
    pub fn save(&self, path: &Path) -> Result<()> {
        let contents = serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, contents).context("Failed to write config file")?;
        log::info!("Config saved to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    // ── defaults ─────────────────────────────────────────────────────

    #[test]
    fn default_matches_backend_defaults() {
        let config = CaptionConfig::default();
        assert_eq!(config.num_frames, 5);
        assert_eq!(config.sampling_type, SamplingType::Uniform);
        assert_eq!(config.model, "qwen2.5-vl-32b-instruct");
        assert!(config.system_prompt.contains("ONLY the caption"));
        assert!(config.prefill.is_empty());
        assert!(!config.overwrite);
        assert!(!config.prepend_existing);
        assert!(!config.notify_on_done);
    }

    // ── sampling type ────────────────────────────────────────────────

    #[test]
    fn sampling_type_wire_names() {
        assert_eq!(SamplingType::Uniform.as_str(), "uniform");
        assert_eq!(SamplingType::Head.as_str(), "head");
        assert_eq!(SamplingType::Head.to_string(), "head");
    }

    #[test]
    fn sampling_type_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&SamplingType::Uniform).unwrap(), "\"uniform\"");
        let parsed: SamplingType = serde_json::from_str("\"head\"").unwrap();
        assert_eq!(parsed, SamplingType::Head);
    }

    // ── load / save ──────────────────────────────────────────────────

    #[test]
    fn load_missing_file_uses_defaults() {
        let config = CaptionConfig::load(Path::new("/nonexistent/config.json")).unwrap();
        assert_eq!(config.num_frames, 5);
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");

        let mut config = CaptionConfig::default();
        config.num_frames = 12;
        config.sampling_type = SamplingType::Head;
        config.overwrite = true;
        config.save(&path).unwrap();

        let loaded = CaptionConfig::load(&path).unwrap();
        assert_eq!(loaded.num_frames, 12);
        assert_eq!(loaded.sampling_type, SamplingType::Head);
        assert!(loaded.overwrite);
    }

    #[test]
    fn load_garbage_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(CaptionConfig::load(&path).is_err());
    }
}
