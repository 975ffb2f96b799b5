use modsync_core::{Manifest, ManifestEntry};
use proptest::prelude::*;

fn entries() -> impl Strategy<Value = Vec<ManifestEntry>> {
    prop::collection::btree_map(
        "[a-z0-9_]{1,6}(/[a-z0-9_]{1,6}){0,2}",
        "[0-9a-f]{32}",
        0..24,
    )
    .prop_map(|m| {
        m.into_iter()
            .map(|(path, digest)| ManifestEntry::new(path, digest))
            .collect()
    })
}

proptest! {
    #[test]
    fn test_parse_inverts_serialize(revision in any::<u64>(), entries in entries()) {
        let manifest = Manifest::new(revision, entries);
        let parsed = Manifest::parse(&manifest.serialize()).unwrap();
        prop_assert_eq!(parsed, manifest);
    }

    #[test]
    fn test_reversed_order_survives_round_trip(entries in entries()) {
        let mut reversed = entries;
        reversed.reverse();
        let manifest = Manifest::new(1, reversed.clone());
        let parsed = Manifest::parse(&manifest.serialize()).unwrap();
        prop_assert_eq!(parsed.entries, reversed);
    }

    #[test]
    fn test_parse_never_panics(text in "\\PC*") {
        let _ = Manifest::parse(&text);
    }
}
