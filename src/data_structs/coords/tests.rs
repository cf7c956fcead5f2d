use arcstr::ArcStr;
use rstest::rstest;

use super::*;
use crate::data_structs::enums::Strand;

#[test]
fn test_contig_basics() {
    let contig = Contig::new(ArcStr::from("Chr1"), 100, 200, Strand::Forward);
    assert_eq!(contig.start(), 100);
    assert_eq!(contig.end(), 200);
    assert_eq!(contig.strand(), Strand::Forward);
    assert_eq!(contig.to_string(), "Chr1:100-200 (+)");
}

#[test]
fn test_contig_try_new_rejects_inverted() {
    assert!(Contig::try_new(ArcStr::from("Chr1"), 10, 9, Strand::None).is_none());
    assert!(Contig::try_new(ArcStr::from("Chr1"), 10, 10, Strand::None).is_some());
}

#[test]
#[should_panic]
fn test_contig_new_panics_on_inverted() {
    Contig::new(ArcStr::from("Chr1"), 10, 9, Strand::None);
}

#[rstest]
#[case::disjoint(vec![(1, 5), (10, 20)], vec![(1, 5), (10, 20)])]
#[case::overlapping(vec![(1, 10), (5, 20)], vec![(1, 20)])]
#[case::adjacent(vec![(1, 4), (5, 9)], vec![(1, 9)])]
#[case::nested(vec![(1, 100), (20, 30)], vec![(1, 100)])]
#[case::unsorted(vec![(50, 60), (1, 10), (8, 12)], vec![(1, 12), (50, 60)])]
#[case::empty(vec![], vec![])]
fn test_interval_set_merging(
    #[case] input: Vec<(u32, u32)>,
    #[case] expected: Vec<(u32, u32)>,
) {
    let set = CdsIntervalSet::from_ranges(input);
    assert_eq!(set.intervals(), expected.as_slice());
}

#[rstest]
#[case(8863749, false)]
#[case(8863750, true)]
#[case(8864721, true)]
#[case(8866120, true)]
#[case(8866121, false)]
fn test_interval_set_closed_membership(
    #[case] pos: u32,
    #[case] expected: bool,
) {
    let set = CdsIntervalSet::from_ranges([(8863750, 8866120)]);
    assert_eq!(set.contains(pos), expected);
}

#[test]
fn test_interval_set_gap_not_covered() {
    let set = CdsIntervalSet::from_ranges([(100, 200), (300, 400)]);
    assert!(set.contains(200));
    assert!(!set.contains(250));
    assert!(set.contains(300));
    assert_eq!(set.covered(), 202);
    assert_eq!(set.len(), 2);
}

#[test]
fn test_empty_interval_set() {
    let set = CdsIntervalSet::default();
    assert!(set.is_empty());
    assert!(!set.contains(1));
    assert!(!set.contains(u32::MAX));
    assert_eq!(set.covered(), 0);
}

#[rstest]
#[case(u32::MAX - 11, false)]
#[case(u32::MAX - 10, true)]
#[case(u32::MAX - 1, true)]
#[case(u32::MAX, true)]
fn test_interval_set_reaches_last_position(
    #[case] pos: u32,
    #[case] expected: bool,
) {
    let set = CdsIntervalSet::from_ranges([(1, 5), (u32::MAX - 10, u32::MAX)]);
    assert_eq!(set.contains(pos), expected);
    assert_eq!(set.covered(), 16);
}

#[test]
fn test_interval_set_ending_before_last_position() {
    let set = CdsIntervalSet::from_ranges([(u32::MAX - 10, u32::MAX - 1)]);
    assert!(set.contains(u32::MAX - 1));
    assert!(!set.contains(u32::MAX));
}
