use cellpack_intern::ContentTrie;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

#[test]
fn interning_a_word_list_is_a_perfect_hash() {
    let words: Vec<&[u8]> = vec![
        b"date", b"data", b"datum", b"da", b"d", b"date", b"dates", b"update",
        b"", b"a", b"ab", b"abc", b"abcd", b"abcde", b"abcdef",
    ];
    let mut trie = ContentTrie::new();
    let ids: Vec<u32> = words.iter().map(|w| trie.intern(w)).collect();

    // Same input, same identifier; identifier resolves back to the input.
    for (word, &id) in words.iter().zip(&ids) {
        assert_eq!(trie.content(id), Some(*word));
        assert_eq!(trie.intern(word), id);
    }
}

proptest! {
    #![proptest_config(ProptestConfig {
        failure_persistence: None,
        .. ProptestConfig::default()
    })]

    #[test]
    fn intern_then_content_is_identity(
        keys in proptest::collection::vec(proptest::collection::vec(any::<u8>(), 0..40), 0..60)
    ) {
        let mut trie = ContentTrie::new();
        let ids: Vec<u32> = keys.iter().map(|k| trie.intern(k)).collect();

        for (key, &id) in keys.iter().zip(&ids) {
            prop_assert_eq!(trie.content(id), Some(key.as_slice()));
            prop_assert_eq!(trie.intern(key), id);
        }
    }

    #[test]
    fn identifiers_are_assigned_densely_in_first_seen_order(
        keys in proptest::collection::vec(proptest::collection::vec(any::<u8>(), 0..20), 0..60)
    ) {
        let mut trie = ContentTrie::new();
        let mut seen: Vec<Vec<u8>> = vec![Vec::new()];
        for key in &keys {
            let id = trie.intern(key);
            if seen.iter().any(|s| s == key) {
                prop_assert_eq!(&seen[id as usize], key);
            } else {
                prop_assert_eq!(id as usize, seen.len());
                seen.push(key.clone());
            }
        }
        prop_assert_eq!(trie.into_contents(), seen);
    }

    #[test]
    fn shared_prefix_families_stay_distinct(
        stem in proptest::collection::vec(any::<u8>(), 1..12),
        suffixes in proptest::collection::vec(proptest::collection::vec(any::<u8>(), 0..12), 1..20)
    ) {
        // Heavy prefix sharing maximizes edge splits.
        let mut trie = ContentTrie::new();
        let keys: Vec<Vec<u8>> = suffixes
            .iter()
            .map(|s| [stem.as_slice(), s.as_slice()].concat())
            .collect();
        let ids: Vec<u32> = keys.iter().map(|k| trie.intern(k)).collect();
        for (key, &id) in keys.iter().zip(&ids) {
            prop_assert_eq!(trie.content(id), Some(key.as_slice()));
            prop_assert_eq!(trie.intern(key), id);
        }
    }
}
