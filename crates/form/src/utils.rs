//! Utility macros shared by the scanners and sinks.

/// Returns early with `$error` when `$predicate` does not hold.
///
/// The scanners lean on this to reject a byte that does not match an expected
/// literal (a CR, an LF or a hyphen at a fixed boundary position) without
/// nesting every check inside an `if`.
///
/// # Example
///
/// ```ignore
/// ensure!(byte == LF, FormError::malformed_header("expected LF after header value"));
/// ```
macro_rules! ensure {
    ($predicate:expr, $error:expr) => {
        if !$predicate {
            return Err($error);
        }
    };
}

pub(crate) use ensure;
