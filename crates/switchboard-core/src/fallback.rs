//! Swap a failed step's error for a default value, with a warning.

use std::fmt::Display;

/// Return the `Ok` value, or log the error and use `default()` instead.
///
/// `step` names the operation in the log line (e.g. "news topic").
pub fn or_default<T, E: Display>(
    step: &'static str,
    result: Result<T, E>,
    default: impl FnOnce() -> T,
) -> T {
    match result {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(step, error = %e, "step failed, using default");
            default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ok_passes_through() {
        let v = or_default("t", Ok::<_, String>(3), || 7);
        assert_eq!(v, 3);
    }

    #[test]
    fn test_err_uses_default() {
        let v = or_default("t", Err::<i32, _>("boom"), || 7);
        assert_eq!(v, 7);
    }
}
