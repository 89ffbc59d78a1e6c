//! Ascending prime capacities for [`Index`](super::Index).
//!
//! Each entry is roughly double the one before it, so stepping one entry up
//! or down halves or doubles the table.

/// Table capacities. Every entry is prime and greater than 5, which keeps the
/// double-hashing step `1 + k mod (m - 5)` in `1..m` and coprime with `m`.
pub const PRIMES: [u64; 28] = [
    11,
    23,
    47,
    97,
    197,
    397,
    797,
    1601,
    3203,
    6421,
    12853,
    25717,
    51437,
    102877,
    205759,
    411527,
    823117,
    1646237,
    3292489,
    6584983,
    13169977,
    26339969,
    52679969,
    105359939,
    210719881,
    421439783,
    842879579,
    1685759167,
];

/// The smallest capacity an index will use.
pub const MIN_CAPACITY: u64 = PRIMES[0];

/// Position of the next larger capacity, if any.
#[inline]
pub fn larger(position: usize) -> Option<usize> {
    if position + 1 < PRIMES.len() {
        return Some(position + 1);
    }
    return None;
}

/// Position of the next smaller capacity, if any.
#[inline]
pub fn smaller(position: usize) -> Option<usize> {
    return position.checked_sub(1);
}
