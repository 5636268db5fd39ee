//! Predicate helpers shared by the provider strategies.

pub fn min_segments(segments: &[String], min: usize) -> Result<(), String> {
    if segments.len() >= min {
        Ok(())
    } else {
        Err(format!(
            "expected at least {min} path segment(s), got {}",
            segments.len()
        ))
    }
}

pub fn not_empty(value: &str, field: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        Err(format!("{field} must not be empty"))
    } else {
        Ok(())
    }
}
