//! Property-based tests comparing the catalog against a naive model.

use proptest::prelude::*;
use rustc_hash::FxHashMap;
use rustc_hash::FxHashSet;

use catalog::Catalog;
use catalog::Error;
use catalog::Result;

// =============================================================================
// Reference model
// =============================================================================

/// Tracks every membership and count directly, touching every track on a merge.
#[derive(Default)]
struct Model {
    collections: FxHashSet<i64>,
    /// track -> (collection, reassignments)
    tracks: FxHashMap<i64, (i64, u64)>,
}

impl Model {
    fn create_collection(&mut self, id: i64) -> Result<()> {
        if id <= 0 {
            return Err(Error::InvalidArgument("identifiers must be positive"));
        }
        if !self.collections.insert(id) {
            return Err(Error::DuplicateKey(id));
        }
        return Ok(());
    }

    fn create_track(&mut self, id: i64, collection: i64) -> Result<()> {
        if id <= 0 || collection <= 0 {
            return Err(Error::InvalidArgument("identifiers must be positive"));
        }
        if self.tracks.contains_key(&id) {
            return Err(Error::DuplicateKey(id));
        }
        if !self.collections.contains(&collection) {
            return Err(Error::NotFound(collection));
        }
        self.tracks.insert(id, (collection, 0));
        return Ok(());
    }

    fn merge(&mut self, a: i64, b: i64, merged: i64) -> Result<()> {
        if a <= 0 || b <= 0 || merged <= 0 {
            return Err(Error::InvalidArgument("identifiers must be positive"));
        }
        if a == b || a == merged || b == merged {
            return Err(Error::InvalidArgument("merge identifiers must be distinct"));
        }
        if self.collections.contains(&merged) {
            return Err(Error::DuplicateKey(merged));
        }
        for source in [a, b] {
            if !self.collections.contains(&source) {
                return Err(Error::NotFound(source));
            }
        }
        self.collections.insert(merged);
        for (collection, count) in self.tracks.values_mut() {
            if *collection == a || *collection == b {
                *collection = merged;
                *count += 1;
            }
        }
        return Ok(());
    }

    fn size_of(&self, collection: i64) -> u64 {
        return self.tracks.values().filter(|(c, _)| *c == collection).count() as u64;
    }
}

#[derive(Clone, Debug)]
enum Op {
    CreateCollection(i64),
    CreateTrack(i64, i64),
    Merge(i64, i64, i64),
    Query(i64),
}

fn arbitrary_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        2 => (-1..25i64).prop_map(Op::CreateCollection),
        4 => (-1..60i64, -1..25i64).prop_map(|(t, c)| Op::CreateTrack(t, c)),
        3 => (0..25i64, 0..25i64, 0..40i64).prop_map(|(a, b, n)| Op::Merge(a, b, n)),
        2 => (0..60i64).prop_map(Op::Query),
    ]
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    /// Every operation agrees with the model, results and errors alike.
    #[test]
    fn matches_model(ops in prop::collection::vec(arbitrary_op(), 1..120)) {
        let mut catalog = Catalog::new();
        let mut model = Model::default();

        for op in &ops {
            match *op {
                Op::CreateCollection(id) => {
                    prop_assert_eq!(catalog.create_collection(id), model.create_collection(id));
                }
                Op::CreateTrack(id, c) => {
                    prop_assert_eq!(catalog.create_track(id, c), model.create_track(id, c));
                }
                Op::Merge(a, b, n) => {
                    prop_assert_eq!(catalog.merge_collections(a, b, n), model.merge(a, b, n));
                }
                Op::Query(track) => match model.tracks.get(&track) {
                    Some(&(collection, count)) => {
                        prop_assert_eq!(catalog.collection_of(track), Ok(collection));
                        prop_assert_eq!(catalog.reassignments_of(track), Ok(count));
                    }
                    None => {
                        prop_assert!(!catalog.contains_track(track));
                    }
                },
            }
        }

        for &collection in model.collections.iter() {
            prop_assert_eq!(catalog.size_of(collection), Ok(model.size_of(collection)));
        }
        for (&track, &(collection, count)) in model.tracks.iter() {
            prop_assert_eq!(catalog.collection_of(track), Ok(collection));
            prop_assert_eq!(catalog.reassignments_of(track), Ok(count));
        }
        prop_assert_eq!(catalog.track_count(), model.tracks.len());
        prop_assert_eq!(catalog.collection_count(), model.collections.len());
    }

    /// Extra lookups only compress paths; they never change a count.
    #[test]
    fn counts_survive_extra_finds(
        ops in prop::collection::vec(arbitrary_op(), 1..120),
        probes in prop::collection::vec(1..60i64, 0..40),
    ) {
        let mut catalog = Catalog::new();
        for op in &ops {
            let _ = match *op {
                Op::CreateCollection(id) => catalog.create_collection(id),
                Op::CreateTrack(id, c) => catalog.create_track(id, c),
                Op::Merge(a, b, n) => catalog.merge_collections(a, b, n),
                Op::Query(_) => Ok(()),
            };
        }

        let before: Vec<Result<u64>> = (1..60).map(|t| catalog.reassignments_of(t)).collect();
        for &track in &probes {
            let _ = catalog.collection_of(track);
        }
        let after: Vec<Result<u64>> = (1..60).map(|t| catalog.reassignments_of(t)).collect();
        prop_assert_eq!(before, after);
    }
}
