//! End-to-end encoding of realistic tag corpora.

use tagset_encoding::{
    new_tag_encoder,
    reader::{read_groups, DictionaryReader},
    DictionaryTagEncoder, LiteralTagEncoder, TagEncoder as _, TagEncoderKind,
};

use crate::common::{encode_groups, fixtures};

mod common;

#[test]
fn round_trip_all_corpora() {
    for (name, groups) in fixtures::all() {
        for kind in [TagEncoderKind::V1, TagEncoderKind::V2] {
            let mut encoder = new_tag_encoder(kind);
            encode_groups(encoder.as_mut(), &groups);

            let decoded = read_groups(kind, encoder.buffer())
                .unwrap_or_else(|e| panic!("failed to read {} stream for corpus {}: {}", kind, name, e));
            assert_eq!(decoded, groups, "round trip mismatch for {} on corpus {}", kind, name);
        }
    }
}

#[test]
fn literal_records_match_distinct_tags() {
    for (name, groups) in fixtures::all() {
        let mut encoder = DictionaryTagEncoder::new();
        encode_groups(&mut encoder, &groups);

        let mut reader = DictionaryReader::new(encoder.buffer());
        while let Some(group) = reader.next_group().unwrap() {
            assert!(group.len() <= groups.iter().map(Vec::len).max().unwrap_or(0));
        }

        let distinct = fixtures::distinct_tags(&groups);
        assert_eq!(reader.literal_count(), distinct, "literal count mismatch on corpus {}", name);
        assert_eq!(
            reader.literal_count() + reader.reference_count(),
            fixtures::total_tags(&groups),
            "record count mismatch on corpus {}",
            name
        );
        assert_eq!(encoder.dictionary().len(), distinct);
    }
}

#[test]
fn dictionary_encoding_is_smaller_with_overlap() {
    for (name, groups) in fixtures::all() {
        if name == "low_dups" {
            continue;
        }

        let mut literal = LiteralTagEncoder::new();
        encode_groups(&mut literal, &groups);

        let mut dictionary = DictionaryTagEncoder::new();
        encode_groups(&mut dictionary, &groups);

        assert!(
            dictionary.buffer().len() < literal.buffer().len(),
            "dictionary encoding ({} bytes) not smaller than literal encoding ({} bytes) on corpus {}",
            dictionary.buffer().len(),
            literal.buffer().len(),
            name
        );
    }
}

#[test]
fn high_overlap_saves_most_of_the_payload() {
    let groups = fixtures::high_dups();

    let mut literal = LiteralTagEncoder::new();
    encode_groups(&mut literal, &groups);

    let mut dictionary = DictionaryTagEncoder::new();
    encode_groups(&mut dictionary, &groups);

    // Twenty of every twenty-two tags per entity are shared, so the dictionary encoding should come in well under half
    // the size of the literal encoding.
    assert!(dictionary.buffer().len() * 2 < literal.buffer().len());
}

#[test]
fn deterministic_across_instances() {
    let groups = fixtures::combined();

    for kind in [TagEncoderKind::V1, TagEncoderKind::V2] {
        let mut first = new_tag_encoder(kind);
        encode_groups(first.as_mut(), &groups);

        let mut second = new_tag_encoder(kind);
        encode_groups(second.as_mut(), &groups);

        assert_eq!(first.buffer(), second.buffer(), "encoder {} is not deterministic", kind);
    }
}

#[test]
fn incremental_snapshots_are_prefixes() {
    let groups = fixtures::high_dups_2();

    let mut encoder = new_tag_encoder(TagEncoderKind::V2);
    let mut previous = Vec::new();
    for group in &groups[..50] {
        encode_groups(encoder.as_mut(), std::slice::from_ref(group));

        let snapshot = encoder.buffer();
        assert!(snapshot.starts_with(&previous));
        previous = snapshot.to_vec();
    }

    let stats = encoder.stats();
    assert_eq!(stats.groups, 50);
    assert_eq!(stats.encoded_bytes, previous.len());
}
