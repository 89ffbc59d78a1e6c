//! The catalog: tracks grouped into collections, addressed by identifier.
//!
//! Two [`Index`] instances resolve external identifiers to arena handles and
//! a [`Forest`] holds the grouping itself. Every operation validates its
//! arguments before touching either, so a failed call changes nothing.

use tracing::debug;

use crate::error::Error;
use crate::error::Result;
use crate::forest::CollectionIdx;
use crate::forest::Forest;
use crate::forest::TrackIdx;
use crate::index::Index;

#[derive(Debug, Default)]
pub struct Catalog {
    collections: Index<CollectionIdx>,
    tracks: Index<TrackIdx>,
    forest: Forest,
}

impl Catalog {
    pub fn new() -> Catalog {
        return Catalog::default();
    }

    /// Register an empty collection.
    pub fn create_collection(&mut self, id: i64) -> Result<()> {
        positive(id)?;
        if self.collections.contains(id) {
            return Err(Error::DuplicateKey(id));
        }

        let collection = self.forest.add_collection(id);
        self.collections.insert(id, collection)?;
        debug!(collection = id, "created collection");
        return Ok(());
    }

    /// Register a track and add it to an existing collection.
    pub fn create_track(&mut self, id: i64, collection_id: i64) -> Result<()> {
        positive(id)?;
        positive(collection_id)?;
        if self.tracks.contains(id) {
            return Err(Error::DuplicateKey(id));
        }
        let collection = self.collection(collection_id)?;

        let track = self.forest.attach(id, collection);
        self.tracks.insert(id, track)?;
        return Ok(());
    }

    /// Merge collections `a` and `b` into a new collection `merged`.
    ///
    /// `a` and `b` stay registered but become permanently empty, so their
    /// identifiers can never be reused.
    pub fn merge_collections(&mut self, a: i64, b: i64, merged: i64) -> Result<()> {
        positive(a)?;
        positive(b)?;
        positive(merged)?;
        if a == b || a == merged || b == merged {
            return Err(Error::InvalidArgument("merge identifiers must be distinct"));
        }
        if self.collections.contains(merged) {
            return Err(Error::DuplicateKey(merged));
        }
        let first = self.collection(a)?;
        let second = self.collection(b)?;

        let collection = self.forest.merge(first, second, merged);
        self.collections.insert(merged, collection)?;
        return Ok(());
    }

    /// Identifier of the collection `track_id` currently belongs to.
    pub fn collection_of(&mut self, track_id: i64) -> Result<i64> {
        let track = self.track(track_id)?;
        let collection = self.forest.collection_of(track);
        return Ok(self.forest.collection(collection).id);
    }

    /// Number of tracks currently in `collection_id`.
    pub fn size_of(&self, collection_id: i64) -> Result<u64> {
        let collection = self.collection(collection_id)?;
        return Ok(self.forest.collection(collection).size());
    }

    /// Number of merges that have moved `track_id` to a new collection.
    pub fn reassignments_of(&mut self, track_id: i64) -> Result<u64> {
        let track = self.track(track_id)?;
        return Ok(self.forest.reassignments(track));
    }

    #[inline]
    pub fn contains_track(&self, id: i64) -> bool {
        return self.tracks.contains(id);
    }

    #[inline]
    pub fn contains_collection(&self, id: i64) -> bool {
        return self.collections.contains(id);
    }

    /// Number of registered tracks.
    #[inline]
    pub fn track_count(&self) -> usize {
        return self.tracks.len();
    }

    /// Number of registered collection identifiers, emptied ones included.
    #[inline]
    pub fn collection_count(&self) -> usize {
        return self.collections.len();
    }

    fn collection(&self, id: i64) -> Result<CollectionIdx> {
        positive(id)?;
        return self.collections.lookup(id).copied().ok_or(Error::NotFound(id));
    }

    fn track(&self, id: i64) -> Result<TrackIdx> {
        positive(id)?;
        return self.tracks.lookup(id).copied().ok_or(Error::NotFound(id));
    }
}

fn positive(id: i64) -> Result<()> {
    if id <= 0 {
        return Err(Error::InvalidArgument("identifiers must be positive"));
    }
    return Ok(());
}
