pub mod aggregator;
pub mod query;
pub mod table;

/// One materialized risk value for a `(segment, species)` pair. At most one
/// record exists per pair after a materialization run; the rebuild-from-
/// scratch lifecycle enforces that, not a stored constraint.
#[derive(Debug, Clone, PartialEq)]
pub struct RiskRecord {
    pub gid: i64,
    pub species: String,
    pub risk_value: f64,
}
