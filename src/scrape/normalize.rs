//! Numeric text normalization
//!
//! Page values use a comma as decimal separator and may carry a percent
//! sign ("2,50%", " 15,75 ").

use tracing::warn;

/// Convert scraped numeric text to a float.
///
/// Returns `None` for absent, empty, non-numeric or non-finite input.
pub fn normalize(text: Option<&str>) -> Option<f64> {
    let Some(raw) = text else {
        warn!("Conversion failed: no value");
        return None;
    };

    let cleaned = raw.replace(',', ".").replace('%', "");
    let cleaned = cleaned.trim();

    match cleaned.parse::<f64>() {
        Ok(value) if value.is_finite() => Some(value),
        Ok(value) => {
            warn!("Conversion failed for value '{}': not finite ({})", raw, value);
            None
        }
        Err(e) => {
            warn!("Conversion failed for value '{}': {}", raw, e);
            None
        }
    }
}
