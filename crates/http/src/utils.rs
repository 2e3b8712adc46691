//! Small helpers shared by the head parser and the body decoders.

/// Returns early with `$error` when `$predicate` does not hold.
///
/// Works like `assert!`, but produces an `Err` instead of panicking:
///
/// ```ignore
/// ensure!(self.header_count < self.config.max_headers(), ParseError::too_many_headers(self.config.max_headers()));
/// ```
macro_rules! ensure {
    ($predicate:expr, $error:expr) => {
        if !$predicate {
            return Err($error);
        }
    };
}

pub(crate) use ensure;
