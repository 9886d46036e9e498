use std::collections::{BTreeSet, HashMap};

use super::table::RiskTable;
use super::RiskRecord;
use crate::graph::{RoadGraph, Segment};

/// A segment annotated with its aggregate risk and the species that
/// contributed to it. Query-time only, never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct RiskWeightedSegment {
    pub segment: Segment,
    pub risk_value: f64,
    pub species: Vec<String>,
}

/// Left-outer-joins `records` onto `segments` under the species filter.
///
/// - `selected` of `None` (or an empty list) means every species in scope.
/// - Unknown species names match zero records and are harmless.
/// - Aggregation across species is `max`: the worst-case species governs.
/// - Every segment appears in the output exactly once; segments with no
///   matching record come back with zero risk and an empty species set.
pub fn combine(
    segments: Vec<Segment>,
    records: &[RiskRecord],
    selected: Option<&[String]>,
) -> Vec<RiskWeightedSegment> {
    let selected = selected.filter(|s| !s.is_empty());

    let mut by_gid: HashMap<i64, (f64, BTreeSet<&str>)> = HashMap::new();
    for record in records {
        if let Some(names) = selected {
            if !names.contains(&record.species) {
                continue;
            }
        }
        let entry = by_gid.entry(record.gid).or_insert((0.0, BTreeSet::new()));
        entry.0 = entry.0.max(record.risk_value);
        entry.1.insert(record.species.as_str());
    }

    segments
        .into_iter()
        .map(|segment| {
            let (risk_value, species) = match by_gid.get(&segment.gid) {
                Some((max_risk, names)) => (
                    *max_risk,
                    names.iter().map(|s| s.to_string()).collect(),
                ),
                None => (0.0, Vec::new()),
            };

            RiskWeightedSegment {
                segment,
                risk_value,
                species,
            }
        })
        .collect()
}

/// The risk-weighted view of the whole road graph, as consumed by the
/// routing engine. Pure read; safe for concurrent callers between rebuilds.
pub async fn risk_weighted_graph(
    graph: &RoadGraph,
    table: &RiskTable,
    selected: Option<&[String]>,
) -> anyhow::Result<Vec<RiskWeightedSegment>> {
    let selected = selected.filter(|s| !s.is_empty());

    let segments = graph.segments().await?;
    let records = table.records(selected).await?;

    Ok(combine(segments, &records, selected))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Point, Polyline};

    fn seg(gid: i64) -> Segment {
        Segment {
            gid,
            source: gid * 10,
            target: gid * 10 + 1,
            geometry: Polyline::new(vec![
                Point { x: 0.0, y: 0.0 },
                Point { x: 1.0, y: 0.0 },
            ]),
            maxspeed_forward: 50.0,
            maxspeed_backward: 50.0,
            cost: 1.0,
            reverse_cost: 1.0,
            length_m: 100.0,
        }
    }

    fn rec(gid: i64, species: &str, risk_value: f64) -> RiskRecord {
        RiskRecord {
            gid,
            species: species.to_string(),
            risk_value,
        }
    }

    fn fixture() -> (Vec<Segment>, Vec<RiskRecord>) {
        // gid 42 overlaps two species, gid 7 overlaps none.
        let segments = vec![seg(42), seg(7)];
        let records = vec![
            rec(42, "amphibians", 0.8),
            rec(42, "reptiles", 0.3),
        ];
        (segments, records)
    }

    fn sel(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn worst_case_species_governs() {
        let (segments, records) = fixture();
        let out = combine(segments, &records, Some(&sel(&["amphibians", "reptiles"])));

        assert_eq!(out[0].segment.gid, 42);
        assert_eq!(out[0].risk_value, 0.8);
        assert_eq!(out[0].species, sel(&["amphibians", "reptiles"]));
    }

    #[test]
    fn filter_narrows_both_risk_and_species() {
        let (segments, records) = fixture();
        let out = combine(segments, &records, Some(&sel(&["reptiles"])));

        assert_eq!(out[0].risk_value, 0.3);
        assert_eq!(out[0].species, sel(&["reptiles"]));
    }

    #[test]
    fn unknown_species_filter_is_a_no_op_match() {
        let (segments, records) = fixture();
        let out = combine(segments, &records, Some(&sel(&["birds"])));

        assert_eq!(out[0].risk_value, 0.0);
        assert!(out[0].species.is_empty());
    }

    #[test]
    fn unknown_name_added_to_filter_changes_nothing() {
        let (segments, records) = fixture();
        let with = combine(
            segments.clone(),
            &records,
            Some(&sel(&["amphibians", "reptiles", "birds"])),
        );
        let without = combine(segments, &records, Some(&sel(&["amphibians", "reptiles"])));

        assert_eq!(with, without);
    }

    #[test]
    fn every_segment_appears_exactly_once() {
        let (segments, records) = fixture();
        let n = segments.len();

        for selected in [None, Some(sel(&["reptiles"])), Some(sel(&["birds"]))] {
            let out = combine(segments.clone(), &records, selected.as_deref());
            assert_eq!(out.len(), n);

            let mut gids: Vec<i64> = out.iter().map(|s| s.segment.gid).collect();
            gids.sort_unstable();
            gids.dedup();
            assert_eq!(gids.len(), n);
        }
    }

    #[test]
    fn segment_without_records_gets_zero_and_empty_species() {
        let (segments, records) = fixture();
        let out = combine(segments, &records, None);

        let gid7 = out.iter().find(|s| s.segment.gid == 7).unwrap();
        assert_eq!(gid7.risk_value, 0.0);
        assert!(gid7.species.is_empty());
    }

    #[test]
    fn empty_filter_means_all_species() {
        let (segments, records) = fixture();
        let all = combine(segments.clone(), &records, None);
        let empty = combine(segments, &records, Some(&[]));

        assert_eq!(all, empty);
        assert_eq!(all[0].risk_value, 0.8);
    }

    #[test]
    fn species_sets_are_deduplicated() {
        // Two records for the same pair should not happen after a rebuild,
        // but the query must still not echo duplicates.
        let segments = vec![seg(1)];
        let records = vec![rec(1, "amphibians", 0.2), rec(1, "amphibians", 0.5)];
        let out = combine(segments, &records, None);

        assert_eq!(out[0].species, sel(&["amphibians"]));
        assert_eq!(out[0].risk_value, 0.5);
    }

    #[test]
    fn zero_valued_record_still_lists_its_species() {
        let segments = vec![seg(5)];
        let records = vec![rec(5, "hedgehogs", 0.0)];
        let out = combine(segments, &records, None);

        assert_eq!(out[0].risk_value, 0.0);
        assert_eq!(out[0].species, sel(&["hedgehogs"]));
    }

    #[test]
    fn repeated_queries_are_identical() {
        let (segments, records) = fixture();
        let selected = sel(&["amphibians", "reptiles"]);

        let first = combine(segments.clone(), &records, Some(&selected));
        let second = combine(segments, &records, Some(&selected));
        assert_eq!(first, second);
    }
}
