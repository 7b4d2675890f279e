//! Validation utilities for billing input

/// A quality must be picked before billing; labels are never trimmed
pub fn validate_quality_label(label: &str) -> Result<(), &'static str> {
    if label.is_empty() {
        return Err("Please select a quality");
    }
    Ok(())
}

/// Repacking charges may be zero but never negative
pub fn validate_repacking_charge(charge: f64) -> Result<(), &'static str> {
    if !charge.is_finite() {
        return Err("Repacking charge must be a number");
    }
    if charge < 0.0 {
        return Err("Repacking charge cannot be negative");
    }
    Ok(())
}
