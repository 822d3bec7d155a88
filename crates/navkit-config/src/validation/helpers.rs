//! Shared range-validation helpers used by all section validators.

/// Push an error if `value` is outside `[min, max]`.
pub(crate) fn validate_range(errors: &mut Vec<String>, name: &str, value: u32, min: u32, max: u32) {
    if value < min || value > max {
        errors.push(format!("{name} = {value} is out of range [{min}, {max}]"));
    }
}

/// Clamp `value` into `[min, max]`, noting the change in `repairs`.
pub(crate) fn clamp_range(repairs: &mut Vec<String>, name: &str, value: &mut u32, min: u32, max: u32) {
    let clamped = (*value).clamp(min, max);
    if clamped != *value {
        repairs.push(format!("{name} = {value} clamped to {clamped}"));
        *value = clamped;
    }
}
