use crate::core::error::{SimError, SimResult};

/// Allocate a filled buffer, reporting failure instead of aborting the process.
pub fn try_filled<T: Clone>(what: &'static str, len: usize, fill: T) -> SimResult<Vec<T>> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(len)
        .map_err(|_| SimError::Allocation { what, len })?;
    buf.resize(len, fill);
    Ok(buf)
}

/// Empty buffer with room for `len` elements.
pub fn try_with_capacity<T>(what: &'static str, len: usize) -> SimResult<Vec<T>> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(len)
        .map_err(|_| SimError::Allocation { what, len })?;
    Ok(buf)
}
