//! Text-generation seam.
//!
//! Answering questions about the news is delegated to a backend behind the
//! [`Generator`] trait. Only [`DemoGenerator`] ships with the crate; it
//! echoes a preview of the prompt so the whole flow can be exercised
//! without credentials.

use crate::error::Result;
use crate::utils::truncate_for_log;
use std::time::Instant;
use tracing::{info, instrument};

/// Something that turns a prompt into free text.
pub trait Generator {
    async fn generate(&self, prompt: &str) -> Result<String>;
}

/// Offline stand-in that returns the start of the prompt.
#[derive(Debug, Clone)]
pub struct DemoGenerator {
    preview_bytes: usize,
}

impl Default for DemoGenerator {
    fn default() -> Self {
        Self { preview_bytes: 600 }
    }
}

impl Generator for DemoGenerator {
    #[instrument(level = "info", skip_all, fields(prompt_bytes = prompt.len()))]
    async fn generate(&self, prompt: &str) -> Result<String> {
        let t0 = Instant::now();
        let answer = format!(
            "Demo mode active: no generation backend is configured.\n\nHere's how your prompt would be processed:\n\n{}",
            truncate_for_log(prompt, self.preview_bytes)
        );
        info!(elapsed_ms = t0.elapsed().as_millis() as u64, "Generated demo answer");
        Ok(answer)
    }
}
