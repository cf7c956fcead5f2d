use rstest::{
    fixture,
    rstest,
};

use super::*;
use crate::config::{
    EligibilityPolicy,
    LocationLayout,
};
use crate::error::ParseError;

const CONFIRMED: &str = "\
Target Gene\tT-DNA line\tHit region\tHM\tABRC\tComment
at1g25320\tSALK_019496\tExon\tHMc\tSent\tok
AT1G25320\tSALK_019496\tExon\tHMn\tSent\tduplicate
AT1G25320\tSALK_000001\tIntron\tHMc\tSent\twrong region
AT1G25320\tSALK_000002\tExon\tHEc\tSent\theterozygous
AT1G25320\tSALK_000003\tExon\tHMc\tNotSent\tnot distributed
AT1G25320\tSAIL_123_A01\tExon\tHMn\tSent\tok
AT1G25320\tSALK_000004
\tSALK_000005\tExon\tHMc\tSent\tno gene
AT2G01000\tSALK_1\tExon\tHMc\tSent\tok
";

const LOCATIONS: &str = "\
SALK_019496.1.x\tT-DNA\tChr1\t+\t8864721-8864722 vs 0-0
SALK_019496.2\tT-DNA\tChr1\t+\t8865000-8865001 vs 12-13
SALK_1\tT-DNA\tChr2\t+\t300-301 vs 0-0
SALK_10\tT-DNA\tChr2\t+\t400-401 vs 0-0
SALK_10.1\tT-DNA\tChr2\t+\t500-501 vs 0-0
SAIL_123_A01\tT-DNA\tChr1\t-\tno hit
SHORT_ROW\tT-DNA
";

#[fixture]
#[once]
fn registry() -> InsertionRegistry {
    InsertionRegistry::from_reader(CONFIRMED.as_bytes(), &EligibilityPolicy::default())
        .unwrap()
        .0
}

#[fixture]
#[once]
fn locations() -> LocationIndex {
    LocationIndex::from_reader(LOCATIONS.as_bytes(), &LocationLayout::default())
        .unwrap()
        .0
}

#[rstest]
#[case("8864721-8864722 vs 0-0", 8864721)]
#[case("8864721-8864722", 8864721)]
#[case("  123 - 456 vs 7-8", 123)]
#[case("42", 42)]
#[case("42bp-50 vs 1", 42)]
#[case("100 vs 200", 100)]
fn test_extract_primary_position(
    #[case] raw: &str,
    #[case] expected: u32,
) {
    assert_eq!(extract_primary_position(raw).unwrap(), expected);
}

#[rstest]
#[case("")]
#[case("no hit")]
#[case("-5-6 vs 1-2")]
#[case(" vs 100-200")]
#[case("99999999999-1")]
fn test_extract_primary_position_invalid(#[case] raw: &str) {
    assert!(matches!(
        extract_primary_position(raw),
        Err(ParseError::InvalidPosition(_))
    ));
}

#[test]
fn test_confirmed_insertion_new_normalizes_gene() {
    let insertion = ConfirmedInsertion::new(" at1g25320 ", "SALK_019496 ", "Exon", "HMc", "Sent");
    assert_eq!(insertion.target_gene().as_str(), "AT1G25320");
    assert_eq!(insertion.line_id().as_str(), "SALK_019496");
    assert!(insertion.is_eligible(&EligibilityPolicy::default()));
}

#[test]
fn test_registry_load_stats() {
    let (registry, stats) =
        InsertionRegistry::from_reader(CONFIRMED.as_bytes(), &EligibilityPolicy::default())
            .unwrap();
    assert_eq!(stats.rows, 9);
    assert_eq!(stats.skipped, 2);
    assert_eq!(stats.kept, 3);
    assert_eq!(stats.filtered, 4);
    assert_eq!(registry.len(), 3);
    assert_eq!(registry.n_genes(), 2);
}

#[rstest]
fn test_registry_keeps_only_eligible(registry: &InsertionRegistry) {
    let lines = registry
        .get_eligible_lines("AT1G25320")
        .iter()
        .map(|i| i.line_id().as_str())
        .collect::<Vec<_>>();
    assert_eq!(lines, vec!["SALK_019496", "SAIL_123_A01"]);

    let first = &registry.get_eligible_lines("AT1G25320")[0];
    assert_eq!(first.homozygosity_status(), "HMc");
}

#[rstest]
fn test_registry_case_insensitive_lookup(registry: &InsertionRegistry) {
    assert_eq!(
        registry.get_eligible_lines("at1g25320"),
        registry.get_eligible_lines("AT1G25320")
    );
    assert!(registry.get_eligible_lines("AT1G20330").is_empty());
}

#[test]
fn test_registry_missing_columns_is_fatal() {
    let res = InsertionRegistry::from_reader(
        "Target Gene\tT-DNA line\tHM\nAT1G1\tSALK_1\tHMc\n".as_bytes(),
        &EligibilityPolicy::default(),
    );
    match res {
        Err(err @ ParseError::MissingColumns { .. }) => {
            assert!(err.is_fatal());
            assert!(err.to_string().contains("Hit region, ABRC"));
        },
        other => panic!("unexpected result: {:?}", other.map(|(r, _)| r.len())),
    }
}

#[test]
fn test_registry_header_with_bom_and_reordered_columns() {
    let table = "\u{feff}ABRC\tHM\tHit region\tT-DNA line\tTarget Gene\nSent\tHMn\tExon\tSALK_7\tAT3G1\n";
    let (registry, _) =
        InsertionRegistry::from_reader(table.as_bytes(), &EligibilityPolicy::default()).unwrap();
    assert_eq!(registry.get_eligible_lines("AT3G1").len(), 1);
}

#[test]
fn test_registry_custom_policy() {
    let policy = EligibilityPolicy::default().with_hit_region("Intron".to_string());
    let (registry, _) = InsertionRegistry::from_reader(CONFIRMED.as_bytes(), &policy).unwrap();
    let lines = registry.get_eligible_lines("AT1G25320");
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].line_id().as_str(), "SALK_000001");
}

#[test]
fn test_location_load_stats() {
    let (index, stats) =
        LocationIndex::from_reader(LOCATIONS.as_bytes(), &LocationLayout::default()).unwrap();
    assert_eq!(stats.rows, 7);
    assert_eq!(stats.kept, 5);
    assert_eq!(stats.skipped, 2);
    assert_eq!(index.len(), 5);
}

#[rstest]
fn test_resolve_with_suffix(locations: &LocationIndex) {
    let found = locations.resolve("SALK_019496");
    assert_eq!(
        found.iter().map(|l| l.position).collect::<Vec<_>>(),
        vec![8864721, 8865000]
    );
    assert!(found.iter().all(|l| l.chromosome.is_none()));
}

#[rstest]
fn test_resolve_does_not_match_longer_ids(locations: &LocationIndex) {
    let found = locations.resolve("SALK_1");
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].line_label, "SALK_1");
    assert_eq!(found[0].position, 300);

    let found = locations.resolve("SALK_10");
    assert_eq!(
        found.iter().map(|l| l.position).collect::<Vec<_>>(),
        vec![400, 500]
    );
}

#[rstest]
#[case("salk_019496", 2)]
#[case("SALK_019496.1", 1)]
#[case("SALK_01949", 0)]
#[case("SAIL_123_A01", 0)]
#[case("", 0)]
fn test_resolve_cases(
    locations: &LocationIndex,
    #[case] line_id: &str,
    #[case] expected: usize,
) {
    assert_eq!(locations.resolve(line_id).len(), expected);
}

#[test]
fn test_location_chromosome_column() {
    let layout = LocationLayout::default().with_chromosome_column(Some(2));
    let (index, _) = LocationIndex::from_reader(LOCATIONS.as_bytes(), &layout).unwrap();
    let found = index.resolve("SALK_1");
    assert_eq!(found[0].chromosome.as_deref(), Some("Chr2"));
}

#[test]
fn test_location_table_without_position_column_is_fatal() {
    let res = LocationIndex::from_reader(
        "SALK_1\tx\tChr1\nSALK_2\ty\n".as_bytes(),
        &LocationLayout::default(),
    );
    assert!(matches!(res, Err(ParseError::NoUsableRows { rows: 2, expected: 5, .. })));
}
