//! Disjoint-set forest over tracks with a lazy reassignment counter.
//!
//! Tracks and collections live in two arenas and refer to each other through
//! copyable handles, so a track's parent link never owns its parent.
//!
//! # Reassignment counter
//!
//! Each track stores a signed `delta`. The number of times a track's set has
//! been relabelled by a merge is the sum of deltas from the track up to its
//! root, root included. Merges charge the whole set by touching only the
//! roots, and [`Forest::find`] rewrites deltas while compressing so that the
//! sum for every node on the path is unchanged.

use smallvec::SmallVec;
use tracing::debug;
use tracing::trace;

/// Handle to a track record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TrackIdx(pub u32);

/// Handle to a collection record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CollectionIdx(pub u32);

#[derive(Clone, Debug)]
pub struct Track {
    pub id: i64,
    /// `None` marks a set root.
    parent: Option<TrackIdx>,
    /// Authoritative only while this track is a root.
    collection: CollectionIdx,
    delta: i64,
}

#[derive(Clone, Debug)]
pub struct Collection {
    pub id: i64,
    root: Option<TrackIdx>,
    size: u64,
}

impl Collection {
    /// Number of tracks whose set resolves to this collection.
    #[inline]
    pub fn size(&self) -> u64 {
        return self.size;
    }

    /// Representative track, or `None` while the collection is empty.
    #[inline]
    pub fn root(&self) -> Option<TrackIdx> {
        return self.root;
    }
}

/// Arena-backed union-find over tracks, labelled by collections.
#[derive(Clone, Debug, Default)]
pub struct Forest {
    tracks: Vec<Track>,
    collections: Vec<Collection>,
}

impl Forest {
    pub fn new() -> Forest {
        return Forest::default();
    }

    #[inline]
    pub fn track(&self, track: TrackIdx) -> &Track {
        return &self.tracks[track.0 as usize];
    }

    #[inline]
    pub fn collection(&self, collection: CollectionIdx) -> &Collection {
        return &self.collections[collection.0 as usize];
    }

    #[inline]
    pub fn track_count(&self) -> usize {
        return self.tracks.len();
    }

    #[inline]
    pub fn collection_count(&self) -> usize {
        return self.collections.len();
    }

    /// Allocate an empty collection record.
    pub fn add_collection(&mut self, id: i64) -> CollectionIdx {
        let idx = CollectionIdx(arena_slot(self.collections.len()));
        self.collections.push(Collection { id, root: None, size: 0 });
        return idx;
    }

    /// Allocate a track record and attach it to `collection`.
    ///
    /// The first track of an empty collection becomes its root. Later tracks
    /// hang directly off the root with a delta that cancels the root's own,
    /// so a new track always starts with zero reassignments.
    pub fn attach(&mut self, id: i64, collection: CollectionIdx) -> TrackIdx {
        let idx = TrackIdx(arena_slot(self.tracks.len()));

        let existing = self.collection(collection).root;
        let track = match existing {
            None => {
                self.collections[collection.0 as usize].root = Some(idx);
                Track { id, parent: None, collection, delta: 0 }
            }
            Some(root) => Track {
                id,
                parent: Some(root),
                collection,
                delta: -self.track(root).delta,
            },
        };

        self.tracks.push(track);
        self.collections[collection.0 as usize].size += 1;
        trace!(track = id, collection = self.collection(collection).id, "attached track");
        return idx;
    }

    /// Merge `a` and `b` into a fresh collection with identifier `id`,
    /// returning its handle. Both sources are left permanently empty.
    ///
    /// Union by size: the smaller set's root is linked under the larger
    /// set's root. On equal sizes `a` keeps its root. Every track of both
    /// sources gains one reassignment.
    pub fn merge(&mut self, a: CollectionIdx, b: CollectionIdx, id: i64) -> CollectionIdx {
        debug_assert_ne!(a, b, "cannot merge a collection with itself");

        let (a_root, a_size) = (self.collection(a).root, self.collection(a).size);
        let (b_root, b_size) = (self.collection(b).root, self.collection(b).size);

        let root = match (a_root, b_root) {
            (None, None) => None,
            (Some(only), None) | (None, Some(only)) => Some(only),
            (Some(a_root), Some(b_root)) => {
                let (big, small) = if a_size >= b_size { (a_root, b_root) } else { (b_root, a_root) };
                let big_delta = self.track(big).delta;
                let small_track = &mut self.tracks[small.0 as usize];
                small_track.parent = Some(big);
                small_track.delta -= big_delta;
                Some(big)
            }
        };

        let merged = self.add_collection(id);
        if let Some(root) = root {
            let root_track = &mut self.tracks[root.0 as usize];
            root_track.collection = merged;
            root_track.delta += 1;
        }

        let new_collection = &mut self.collections[merged.0 as usize];
        new_collection.root = root;
        new_collection.size = a_size + b_size;

        for source in [a, b] {
            let emptied = &mut self.collections[source.0 as usize];
            emptied.root = None;
            emptied.size = 0;
        }

        debug!(
            a = self.collection(a).id,
            b = self.collection(b).id,
            into = id,
            size = a_size + b_size,
            "merged collections"
        );
        return merged;
    }

    /// Return the root of `track`'s set, compressing the path behind it.
    ///
    /// Every node on the path is relinked to the root and given the sum of
    /// the deltas between it and the root (root excluded), which keeps each
    /// node's sum-to-root unchanged.
    pub fn find(&mut self, track: TrackIdx) -> TrackIdx {
        let mut path: SmallVec<[TrackIdx; 16]> = SmallVec::new();
        let mut current = track;
        let mut below_root = 0;
        while let Some(parent) = self.track(current).parent {
            path.push(current);
            below_root += self.track(current).delta;
            current = parent;
        }
        let root = current;

        if path.len() < 2 {
            return root;
        }

        for &node in path.iter() {
            let entry = &mut self.tracks[node.0 as usize];
            let old = entry.delta;
            entry.delta = below_root;
            entry.parent = Some(root);
            below_root -= old;
        }
        debug_assert_eq!(below_root, 0);

        trace!(track = self.track(track).id, length = path.len(), "compressed path");
        return root;
    }

    /// The collection `track` currently belongs to.
    pub fn collection_of(&mut self, track: TrackIdx) -> CollectionIdx {
        let root = self.find(track);
        return self.track(root).collection;
    }

    /// How many merges have relabelled `track`'s set since it was attached.
    pub fn reassignments(&mut self, track: TrackIdx) -> u64 {
        let root = self.find(track);
        let mut total = self.track(root).delta;
        if root != track {
            // After `find`, `track` hangs directly off the root.
            total += self.track(track).delta;
        }
        debug_assert!(total >= 0, "negative reassignment count {}", total);
        return total as u64;
    }
}

fn arena_slot(len: usize) -> u32 {
    assert!(len < u32::MAX as usize, "arena is full");
    return len as u32;
}
