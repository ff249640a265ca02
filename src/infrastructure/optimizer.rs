//! Image optimizer integration for published media

use crate::domain::MediaExtension;
use crate::error::{PublishError, Result};
use std::fs;
use std::path::Path;
use std::process::Command;

/// Output parameters handed to the optimizer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageParams {
    pub max_width: u32,
    pub quality: u8,
    pub lossless: bool,
}

/// Produces the published form of a media file
pub trait ImageOptimizer {
    /// Extension of the file `optimize` writes; published links use it.
    fn media_extension(&self) -> MediaExtension;

    /// Encode `source` into `output_dir` using `name` as the base file name.
    fn optimize(
        &self,
        source: &Path,
        output_dir: &Path,
        name: &str,
        params: &ImageParams,
    ) -> Result<()>;
}

/// Runs an external command template such as
/// `cwebp -q {quality} -resize {max_width} 0 {input} -o {output_dir}/{name}.webp`
pub struct CommandOptimizer {
    command: String,
    target_extension: String,
}

impl CommandOptimizer {
    /// `target_extension` is the extension the command produces
    pub fn new(command: String, target_extension: &str) -> Self {
        CommandOptimizer {
            command,
            target_extension: target_extension.to_string(),
        }
    }

    /// Split the template into program and arguments, then fill placeholders
    fn build_command(
        &self,
        source: &Path,
        output_dir: &Path,
        name: &str,
        params: &ImageParams,
    ) -> Result<(String, Vec<String>)> {
        let parts: Vec<&str> = self.command.split_whitespace().collect();

        if parts.is_empty() {
            return Err(PublishError::Optimizer(
                "Optimizer command is empty".to_string(),
            ));
        }

        let input = source.to_string_lossy();
        let output_dir = output_dir.to_string_lossy();
        let max_width = params.max_width.to_string();
        let quality = params.quality.to_string();
        let lossless = params.lossless.to_string();

        let fill = |part: &str| {
            part.replace("{input}", &input)
                .replace("{output_dir}", &output_dir)
                .replace("{name}", name)
                .replace("{max_width}", &max_width)
                .replace("{quality}", &quality)
                .replace("{lossless}", &lossless)
        };

        let program = fill(parts[0]);
        let args = parts[1..].iter().map(|part| fill(part)).collect();

        Ok((program, args))
    }
}

impl ImageOptimizer for CommandOptimizer {
    fn media_extension(&self) -> MediaExtension {
        MediaExtension::target(&self.target_extension)
    }

    fn optimize(
        &self,
        source: &Path,
        output_dir: &Path,
        name: &str,
        params: &ImageParams,
    ) -> Result<()> {
        let (program, args) = self.build_command(source, output_dir, name, params)?;

        // On Windows, use cmd /c to ensure .bat and .cmd files are found
        #[cfg(windows)]
        let output = Command::new("cmd")
            .arg("/C")
            .arg(&program)
            .args(&args)
            .output();

        #[cfg(not(windows))]
        let output = Command::new(&program).args(&args).output();

        let output = output.map_err(|e| {
            PublishError::Optimizer(format!("Failed to launch optimizer '{}': {}", program, e))
        })?;

        if !output.status.success() {
            return Err(PublishError::Optimizer(format!(
                "'{}' exited with {} for {}: {}",
                program,
                output.status,
                source.display(),
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        Ok(())
    }
}

/// Copies the original file, keeping its (lowercased) extension
#[derive(Debug, Clone, Copy, Default)]
pub struct CopyOptimizer;

impl ImageOptimizer for CopyOptimizer {
    fn media_extension(&self) -> MediaExtension {
        MediaExtension::Source
    }

    fn optimize(
        &self,
        source: &Path,
        output_dir: &Path,
        name: &str,
        _params: &ImageParams,
    ) -> Result<()> {
        let filename = match source.extension().and_then(|e| e.to_str()) {
            Some(ext) => format!("{}.{}", name, ext.to_lowercase()),
            None => name.to_string(),
        };

        fs::create_dir_all(output_dir)?;
        fs::copy(source, output_dir.join(filename))?;
        Ok(())
    }
}
