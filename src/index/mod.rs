//! Integer-keyed hash index with open addressing.
//!
//! Slots are probed with double hashing over a prime capacity `m`:
//!
//! - `h(k) = k mod m`
//! - `r(k) = 1 + (k mod (m - 5))`
//! - `probe(i) = (h(k) + i * r(k)) mod m`
//!
//! Because `m` is prime and `1 <= r(k) < m`, the probe sequence visits every
//! slot before repeating. Removal leaves a tombstone so later keys in the same
//! chain stay reachable.
//!
//! Every `insert` and `remove` first runs one maintenance step:
//!
//! - Grow to the next prime when `(live + tombstones) / m >= grow_at`.
//! - Rehash at the same capacity when `tombstones / m >= rehash_at`.
//! - Shrink to the previous prime when `live / m <= shrink_at`.
//!
//! A rebuild re-inserts live entries only, so tombstones never survive it.

pub mod primes;

use std::mem;

use tracing::debug;

use crate::error::Error;
use crate::error::Result;

use self::primes::PRIMES;

/// Load thresholds that drive index maintenance.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IndexConfig {
    /// Occupied fraction (live plus tombstones) that triggers growth.
    pub grow_at: f64,
    /// Tombstone fraction that triggers an in-place rehash.
    pub rehash_at: f64,
    /// Live fraction at or below which the table shrinks.
    pub shrink_at: f64,
}

impl Default for IndexConfig {
    fn default() -> Self {
        return IndexConfig {
            grow_at: 0.7,
            rehash_at: 0.5,
            shrink_at: 0.25,
        };
    }
}

#[derive(Debug)]
enum Slot<V> {
    Empty,
    Tombstone,
    Live { key: i64, value: V },
}

/// Outcome of walking a probe sequence.
enum Probe {
    /// The key lives at this slot.
    Found(usize),
    /// The key is absent; this is where it would go.
    Vacant(usize),
    /// The key is absent and no slot can take it.
    Exhausted,
}

/// A hash map from `i64` keys to owned values.
#[derive(Debug)]
pub struct Index<V> {
    slots: Vec<Slot<V>>,
    /// Position of the current capacity in [`PRIMES`].
    prime: usize,
    live: usize,
    tombstones: usize,
    config: IndexConfig,
}

impl<V> Default for Index<V> {
    fn default() -> Self {
        return Self::new();
    }
}

impl<V> Index<V> {
    /// Create an empty index at the minimum capacity.
    pub fn new() -> Index<V> {
        return Self::with_config(IndexConfig::default());
    }

    /// Create an empty index with custom load thresholds.
    ///
    /// Panics if the thresholds would let growth and shrinking undo each
    /// other, or would let the table fill completely.
    pub fn with_config(config: IndexConfig) -> Index<V> {
        assert!(config.grow_at > 0.0 && config.grow_at < 1.0, "grow_at must be in (0, 1)");
        assert!(
            config.rehash_at > 0.0 && config.rehash_at <= config.grow_at,
            "rehash_at must be in (0, grow_at]"
        );
        assert!(
            config.shrink_at > 0.0 && config.shrink_at < config.grow_at / 2.0,
            "shrink_at must be in (0, grow_at / 2)"
        );

        return Index {
            slots: empty_slots(PRIMES[0]),
            prime: 0,
            live: 0,
            tombstones: 0,
            config,
        };
    }

    /// Number of live entries.
    #[inline]
    pub fn len(&self) -> usize {
        return self.live;
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        return self.live == 0;
    }

    /// Current slot count. Always a member of [`PRIMES`].
    #[inline]
    pub fn capacity(&self) -> usize {
        return self.slots.len();
    }

    /// Number of tombstoned slots awaiting the next rebuild.
    #[inline]
    pub fn tombstones(&self) -> usize {
        return self.tombstones;
    }

    /// Insert a new entry. Fails with [`Error::DuplicateKey`] if the key is
    /// already present, leaving the stored value untouched.
    pub fn insert(&mut self, key: i64, value: V) -> Result<()> {
        self.maintain();

        match self.probe_insert(key) {
            Probe::Found(_) => return Err(Error::DuplicateKey(key)),
            Probe::Exhausted => return Err(Error::Full),
            Probe::Vacant(slot) => {
                if let Slot::Tombstone = self.slots[slot] {
                    self.tombstones -= 1;
                }
                self.slots[slot] = Slot::Live { key, value };
                self.live += 1;
                return Ok(());
            }
        }
    }

    /// Remove an entry, returning its value.
    pub fn remove(&mut self, key: i64) -> Result<V> {
        self.maintain();

        let Some(slot) = self.find_slot(key) else {
            return Err(Error::NotFound(key));
        };

        match mem::replace(&mut self.slots[slot], Slot::Tombstone) {
            Slot::Live { value, .. } => {
                self.live -= 1;
                self.tombstones += 1;
                return Ok(value);
            }
            _ => unreachable!("find_slot only returns live slots"),
        }
    }

    /// Look up the value stored under `key`.
    pub fn lookup(&self, key: i64) -> Option<&V> {
        let slot = self.find_slot(key)?;
        match &self.slots[slot] {
            Slot::Live { value, .. } => return Some(value),
            _ => return None,
        }
    }

    /// Look up the value stored under `key` for mutation.
    pub fn lookup_mut(&mut self, key: i64) -> Option<&mut V> {
        let slot = self.find_slot(key)?;
        match &mut self.slots[slot] {
            Slot::Live { value, .. } => return Some(value),
            _ => return None,
        }
    }

    #[inline]
    pub fn contains(&self, key: i64) -> bool {
        return self.find_slot(key).is_some();
    }

    /// Iterate over live entries in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (i64, &V)> {
        return self.slots.iter().filter_map(|slot| match slot {
            Slot::Live { key, value } => Some((*key, value)),
            _ => None,
        });
    }

    /// Slot index of a live key, stopping at the first never-used slot.
    fn find_slot(&self, key: i64) -> Option<usize> {
        let m = self.slots.len() as u64;
        let (start, step) = hashes(key, m);

        for i in 0..m {
            let slot = probe_at(start, step, i, m);
            match &self.slots[slot] {
                Slot::Empty => return None,
                Slot::Live { key: k, .. } if *k == key => return Some(slot),
                _ => {}
            }
        }

        return None;
    }

    /// Walk the full chain for `key`, remembering the first reusable slot.
    /// The walk cannot stop at a tombstone, since the key may sit further on.
    fn probe_insert(&self, key: i64) -> Probe {
        let m = self.slots.len() as u64;
        let (start, step) = hashes(key, m);
        let mut reusable = None;

        for i in 0..m {
            let slot = probe_at(start, step, i, m);
            match &self.slots[slot] {
                Slot::Empty => return Probe::Vacant(reusable.unwrap_or(slot)),
                Slot::Tombstone => {
                    if reusable.is_none() {
                        reusable = Some(slot);
                    }
                }
                Slot::Live { key: k, .. } => {
                    if *k == key {
                        return Probe::Found(slot);
                    }
                }
            }
        }

        return match reusable {
            Some(slot) => Probe::Vacant(slot),
            None => Probe::Exhausted,
        };
    }

    /// Run at most one rebuild so the next mutation has room to work.
    fn maintain(&mut self) {
        let m = self.slots.len() as f64;
        let occupied = (self.live + self.tombstones) as f64 / m;

        if occupied >= self.config.grow_at {
            match primes::larger(self.prime) {
                Some(next) => self.rebuild(next),
                // At the top of the table, purging tombstones is all that's left.
                None if self.tombstones > 0 => self.rebuild(self.prime),
                None => {}
            }
        } else if self.tombstones as f64 / m >= self.config.rehash_at {
            self.rebuild(self.prime);
        } else if self.live as f64 / m <= self.config.shrink_at {
            if let Some(previous) = primes::smaller(self.prime) {
                self.rebuild(previous);
            }
        }
    }

    /// Move every live entry into a fresh table at `PRIMES[prime]`.
    fn rebuild(&mut self, prime: usize) {
        let capacity = PRIMES[prime];
        debug!(
            from = self.slots.len(),
            to = capacity,
            live = self.live,
            tombstones = self.tombstones,
            "rebuilding index"
        );

        let old = mem::replace(&mut self.slots, empty_slots(capacity));
        self.prime = prime;
        self.tombstones = 0;

        for slot in old {
            if let Slot::Live { key, value } = slot {
                // Live keys are distinct and the new table is never fuller
                // than the old one, so a vacant slot always exists.
                match self.probe_insert(key) {
                    Probe::Vacant(at) => self.slots[at] = Slot::Live { key, value },
                    _ => unreachable!("rebuild target has no room for key {}", key),
                }
            }
        }
    }
}

fn empty_slots<V>(capacity: u64) -> Vec<Slot<V>> {
    let mut slots = Vec::with_capacity(capacity as usize);
    slots.resize_with(capacity as usize, || Slot::Empty);
    return slots;
}

/// Primary position and step for `key` in a table of `m` slots.
#[inline]
fn hashes(key: i64, m: u64) -> (u64, u64) {
    let start = key.rem_euclid(m as i64) as u64;
    let step = 1 + key.rem_euclid(m as i64 - 5) as u64;
    return (start, step);
}

/// The `i`th slot of a probe sequence. `i` and `step` are both below `m`,
/// which is below 2^31, so the product fits in a `u64`.
#[inline]
fn probe_at(start: u64, step: u64, i: u64, m: u64) -> usize {
    return ((start + i * step) % m) as usize;
}
