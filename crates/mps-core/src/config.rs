//! Configuration module
//!
//! Pipeline limits and defaults, read from `MPS_*` environment variables.
//! Every value is optional; missing or unparsable values fall back to defaults.

use std::env;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

const MAX_INPUT_BYTES: usize = 50 * 1024 * 1024;
const MAX_DECODE_ALLOC_BYTES: u64 = 1024 * 1024 * 1024;
// Blog width plus 10%
const DOCUMENT_RENDER_WIDTH: u32 = 1320;
const DEFAULT_OUTPUT_STEM: &str = "image";

/// How the watermark rectangle gets repainted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InpaintStrategy {
    /// Single colour averaged from the bands above and left of the region
    #[default]
    Flat,
    /// Flat fill with smoothstep feathering into the surrounding pixels
    Feathered,
}

impl FromStr for InpaintStrategy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "flat" => Ok(InpaintStrategy::Flat),
            "feathered" | "blend" => Ok(InpaintStrategy::Feathered),
            other => Err(anyhow::anyhow!("Invalid inpaint strategy: {}", other)),
        }
    }
}

/// Media pipeline configuration
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Assets larger than this are rejected before decoding
    pub max_input_bytes: usize,
    /// Upper bound for a single decoder allocation
    pub max_decode_alloc_bytes: u64,
    /// Target width when rasterizing document pages
    pub document_render_width: u32,
    pub inpaint_strategy: InpaintStrategy,
    /// Filename stem used when the asset carries no filename
    pub default_output_stem: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_input_bytes: MAX_INPUT_BYTES,
            max_decode_alloc_bytes: MAX_DECODE_ALLOC_BYTES,
            document_render_width: DOCUMENT_RENDER_WIDTH,
            inpaint_strategy: InpaintStrategy::default(),
            default_output_stem: DEFAULT_OUTPUT_STEM.to_string(),
        }
    }
}

impl PipelineConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        let config = Self::from_lookup(|key| env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Build a config from an arbitrary key lookup (environment, .env map, tests)
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        Self {
            max_input_bytes: parse_or(&lookup, "MPS_MAX_INPUT_BYTES", defaults.max_input_bytes),
            max_decode_alloc_bytes: parse_or(
                &lookup,
                "MPS_MAX_DECODE_ALLOC_BYTES",
                defaults.max_decode_alloc_bytes,
            ),
            document_render_width: parse_or(
                &lookup,
                "MPS_DOCUMENT_RENDER_WIDTH",
                defaults.document_render_width,
            ),
            inpaint_strategy: parse_or(&lookup, "MPS_INPAINT_STRATEGY", defaults.inpaint_strategy),
            default_output_stem: lookup("MPS_DEFAULT_OUTPUT_STEM")
                .map(|s| s.trim().to_string())
                .unwrap_or(defaults.default_output_stem),
        }
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.max_input_bytes == 0 {
            return Err(anyhow::anyhow!("MPS_MAX_INPUT_BYTES must be greater than 0"));
        }

        if self.max_decode_alloc_bytes == 0 {
            return Err(anyhow::anyhow!(
                "MPS_MAX_DECODE_ALLOC_BYTES must be greater than 0"
            ));
        }

        if self.document_render_width == 0 {
            return Err(anyhow::anyhow!(
                "MPS_DOCUMENT_RENDER_WIDTH must be greater than 0"
            ));
        }

        if self.default_output_stem.is_empty() {
            return Err(anyhow::anyhow!("MPS_DEFAULT_OUTPUT_STEM must not be empty"));
        }

        Ok(())
    }
}

fn parse_or<T, F>(lookup: &F, key: &str, default: T) -> T
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .and_then(|v| v.trim().parse::<T>().ok())
        .unwrap_or(default)
}
