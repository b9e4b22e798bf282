//! Result variables for downstream workflow steps.
//!
//! GitHub Actions reads step outputs from the file named by the
//! `GITHUB_OUTPUT` environment variable, one `NAME=value` line per output.
//! Downstream steps use these for things like visual regression or
//! performance testing against the deployed preview.

use std::env;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use tracing::{info, warn};

use crate::error::ActionError;
use crate::workflow::ActionOutputs;

/// Publish `SHOPIFY_THEME_ID` and `SHOPIFY_THEME_PREVIEW_URL`.
///
/// Outside GitHub Actions (no `GITHUB_OUTPUT`) the outputs are logged and
/// skipped.
///
/// # Errors
///
/// Returns error if the output file cannot be written.
pub fn publish(outputs: &ActionOutputs) -> Result<(), ActionError> {
    let vars = [
        ("SHOPIFY_THEME_ID", outputs.theme_id.to_string()),
        ("SHOPIFY_THEME_PREVIEW_URL", outputs.preview_url.clone()),
    ];

    match env::var("GITHUB_OUTPUT") {
        Ok(path) => append_outputs(Path::new(&path), &vars),
        Err(_) => {
            warn!("GITHUB_OUTPUT is not set, outputs will not be published");
            for (name, value) in &vars {
                info!(%name, %value, "Output");
            }
            Ok(())
        }
    }
}

fn append_outputs(path: &Path, vars: &[(&str, String)]) -> Result<(), ActionError> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    for (name, value) in vars {
        writeln!(file, "{name}={value}")?;
    }
    info!(count = vars.len(), "Published outputs");
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use theme_actions_core::ThemeId;

    #[test]
    fn test_append_outputs_writes_name_value_lines() {
        let outputs = ActionOutputs {
            theme_id: ThemeId::new(42),
            preview_url: "https://shop.example.com/?preview_theme_id=42".to_string(),
        };
        let file = tempfile::NamedTempFile::new().unwrap();

        let vars = [
            ("SHOPIFY_THEME_ID", outputs.theme_id.to_string()),
            ("SHOPIFY_THEME_PREVIEW_URL", outputs.preview_url.clone()),
        ];
        append_outputs(file.path(), &vars).unwrap();

        let written = std::fs::read_to_string(file.path()).unwrap();
        assert_eq!(
            written,
            "SHOPIFY_THEME_ID=42\nSHOPIFY_THEME_PREVIEW_URL=https://shop.example.com/?preview_theme_id=42\n"
        );
    }

    #[test]
    fn test_append_outputs_appends_to_existing_content() {
        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(file.path(), "EXISTING=1\n").unwrap();

        append_outputs(file.path(), &[("SHOPIFY_THEME_ID", "7".to_string())]).unwrap();

        let written = std::fs::read_to_string(file.path()).unwrap();
        assert_eq!(written, "EXISTING=1\nSHOPIFY_THEME_ID=7\n");
    }
}
