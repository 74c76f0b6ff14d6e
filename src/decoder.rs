use std::process::Command;

use anyhow::{anyhow, Context, Result};

/// Decodes one obfuscated bundle url. Every call blocks until the external
/// codec exits.
#[cfg_attr(test, mockall::automock)]
pub trait BundleUrlDecoder {
    fn decode(&self, encoded: &str, release_date: &str) -> Result<String>;
}

/// Invokes the vendor's bundle url codec jar once per field.
pub struct CodecProcessDecoder {
    jar_path: String,
}

impl CodecProcessDecoder {
    pub fn new(jar_path: impl Into<String>) -> Self {
        Self {
            jar_path: jar_path.into(),
        }
    }
}

impl BundleUrlDecoder for CodecProcessDecoder {
    fn decode(&self, encoded: &str, release_date: &str) -> Result<String> {
        let output = Command::new("java")
            .arg("-cp")
            .arg(&self.jar_path)
            .arg("Main.java")
            .arg(encoded)
            .arg(release_date)
            .output()
            .context("Failed to run the bundle url codec")?;

        if !output.status.success() {
            return Err(anyhow!(
                "Bundle url codec exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim(),
            ));
        }

        let decoded =
            String::from_utf8(output.stdout).context("Codec output is not valid utf-8")?;
        Ok(decoded.trim().to_string())
    }
}
