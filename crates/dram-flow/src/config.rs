//! Flow configuration.

use tracing::warn;

/// Largest accepted image, in bytes (5 MiB).
pub const DEFAULT_MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

/// Acquisition flow configuration.
#[derive(Debug, Clone)]
pub struct FlowConfig {
    /// Images larger than this are rejected before decoding
    pub max_image_bytes: usize,
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            max_image_bytes: DEFAULT_MAX_IMAGE_BYTES,
        }
    }
}

impl FlowConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            max_image_bytes: std::env::var("MAX_IMAGE_BYTES")
                .ok()
                .and_then(|raw| parse_limit(&raw))
                .unwrap_or(DEFAULT_MAX_IMAGE_BYTES),
        }
    }
}

fn parse_limit(raw: &str) -> Option<usize> {
    match raw.trim().parse::<usize>() {
        Ok(n) if n > 0 => Some(n),
        _ => {
            warn!(value = raw, "Ignoring invalid MAX_IMAGE_BYTES");
            None
        }
    }
}
