use super::RiskRecord;

/// The materialized `species_risk_by_way` table.
///
/// Writes go through [`RiskTable::replace_all`] only: the new generation is
/// built into a shadow table and swapped in inside one transaction, so a
/// concurrent reader always sees exactly one complete generation, never a
/// half-rebuilt mix.
#[derive(Clone)]
pub struct RiskTable {
    pool: sqlx::PgPool,
}

const SWAP: &str = "
DROP TABLE species_risk_by_way;
ALTER TABLE species_risk_by_way_next RENAME TO species_risk_by_way;
CREATE INDEX idx_species_risk_gid ON species_risk_by_way (gid);
CREATE INDEX idx_species_risk_species ON species_risk_by_way (species);
CREATE INDEX idx_species_risk_gid_species ON species_risk_by_way (gid, species);
";

impl RiskTable {
    pub fn new(pool: sqlx::PgPool) -> Self {
        RiskTable { pool }
    }

    /// Replaces the whole table with `records` atomically.
    pub async fn replace_all(&self, records: &[RiskRecord]) -> anyhow::Result<()> {
        let mut gids = Vec::with_capacity(records.len());
        let mut species = Vec::with_capacity(records.len());
        let mut values = Vec::with_capacity(records.len());
        for r in records {
            gids.push(r.gid);
            species.push(r.species.clone());
            values.push(r.risk_value);
        }

        let mut tx = self.pool.begin().await?;

        sqlx::raw_sql(
            "DROP TABLE IF EXISTS species_risk_by_way_next;
             CREATE TABLE species_risk_by_way_next
                 (LIKE species_risk_by_way INCLUDING DEFAULTS);",
        )
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            "INSERT INTO species_risk_by_way_next (gid, species, risk_value)
             SELECT * FROM UNNEST($1::bigint[], $2::text[], $3::double precision[]);",
        )
        .bind(&gids)
        .bind(&species)
        .bind(&values)
        .execute(&mut *tx)
        .await?;

        sqlx::raw_sql(SWAP).execute(&mut *tx).await?;

        tx.commit().await?;
        Ok(())
    }

    /// Risk value for one `(segment, species)` pair, if materialized.
    pub async fn risk(&self, gid: i64, species: &str) -> anyhow::Result<Option<f64>> {
        let value = sqlx::query_scalar(
            "SELECT risk_value FROM species_risk_by_way
             WHERE gid = $1 AND species = $2;",
        )
        .bind(gid)
        .bind(species)
        .fetch_optional(&self.pool)
        .await?;

        Ok(value)
    }

    pub async fn records_for_segment(&self, gid: i64) -> anyhow::Result<Vec<RiskRecord>> {
        let rows: Vec<(i64, String, f64)> = sqlx::query_as(
            "SELECT gid, species, risk_value FROM species_risk_by_way
             WHERE gid = $1;",
        )
        .bind(gid)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(RiskRecord::from_row).collect())
    }

    pub async fn records_for_species(&self, species: &str) -> anyhow::Result<Vec<RiskRecord>> {
        let rows: Vec<(i64, String, f64)> = sqlx::query_as(
            "SELECT gid, species, risk_value FROM species_risk_by_way
             WHERE species = $1;",
        )
        .bind(species)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(RiskRecord::from_row).collect())
    }

    /// Every record whose species is in `selected`, or all records when
    /// `selected` is `None`. Unknown species names simply match nothing.
    pub async fn records(&self, selected: Option<&[String]>) -> anyhow::Result<Vec<RiskRecord>> {
        let rows: Vec<(i64, String, f64)> = sqlx::query_as(
            "SELECT gid, species, risk_value FROM species_risk_by_way
             WHERE $1::text[] IS NULL OR species = ANY($1);",
        )
        .bind(selected)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(RiskRecord::from_row).collect())
    }
}

impl RiskRecord {
    fn from_row((gid, species, risk_value): (i64, String, f64)) -> Self {
        RiskRecord {
            gid,
            species,
            risk_value,
        }
    }
}
