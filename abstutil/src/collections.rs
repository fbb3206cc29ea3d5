/// Indexes into a slice, treating it as circular. Negative indices count from the end. Panics on
/// an empty slice.
pub fn wraparound_get<T>(vec: &[T], idx: isize) -> &T {
    &vec[wraparound_idx(vec.len(), idx)]
}

/// The index `wraparound_get` would use.
pub fn wraparound_idx(len: usize, idx: isize) -> usize {
    let len = len as isize;
    let idx = idx % len;
    let idx = if idx >= 0 { idx } else { idx + len };
    idx as usize
}
