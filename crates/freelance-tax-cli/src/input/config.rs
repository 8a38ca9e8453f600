use freelance_tax_core::TaxRegimeConfig;
use tracing::info;

use super::file;

/// Load a tax-law configuration from JSON, or YAML when the file ends in
/// `.yaml`/`.yml`. Missing fields fall back to the built-in table.
pub fn load_config(path: &str) -> Result<TaxRegimeConfig, Box<dyn std::error::Error>> {
    let (canonical, contents) = file::read_text(path)?;
    let is_yaml = matches!(
        canonical.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    );

    let config: TaxRegimeConfig = if is_yaml {
        serde_yaml::from_str(&contents)
            .map_err(|e| format!("Failed to parse '{}': {}", canonical.display(), e))?
    } else {
        serde_json::from_str(&contents)
            .map_err(|e| format!("Failed to parse '{}': {}", canonical.display(), e))?
    };
    config.validate()?;

    info!(
        path = %canonical.display(),
        financial_year = %config.financial_year,
        slabs = config.slabs.len(),
        "loaded tax configuration"
    );
    Ok(config)
}
