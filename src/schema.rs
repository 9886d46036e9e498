pub const SCHEMA: &'static str = r#"

CREATE TABLE IF NOT EXISTS ways (
    gid BIGINT PRIMARY KEY,
    source BIGINT NOT NULL,
    target BIGINT NOT NULL,
    points POINT[] NOT NULL,
    maxspeed_forward DOUBLE PRECISION NOT NULL DEFAULT 0,
    maxspeed_backward DOUBLE PRECISION NOT NULL DEFAULT 0,
    cost DOUBLE PRECISION NOT NULL,
    reverse_cost DOUBLE PRECISION NOT NULL,
    length_m DOUBLE PRECISION NOT NULL
);

CREATE TABLE IF NOT EXISTS raster_meta (
    species TEXT PRIMARY KEY,
    origin_x DOUBLE PRECISION NOT NULL,
    origin_y DOUBLE PRECISION NOT NULL,
    cell_dx DOUBLE PRECISION NOT NULL,
    cell_dy DOUBLE PRECISION NOT NULL,
    tile_cols INTEGER NOT NULL,
    tile_rows INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS raster_tile (
    species TEXT NOT NULL REFERENCES raster_meta (species),
    tx INTEGER NOT NULL,
    ty INTEGER NOT NULL,
    cells DOUBLE PRECISION[] NOT NULL,
    PRIMARY KEY (species, tx, ty)
);

CREATE TABLE IF NOT EXISTS species_risk_by_way (
    gid BIGINT NOT NULL,
    species TEXT NOT NULL,
    risk_value DOUBLE PRECISION NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_species_risk_gid ON species_risk_by_way (gid);
CREATE INDEX IF NOT EXISTS idx_species_risk_species ON species_risk_by_way (species);
CREATE INDEX IF NOT EXISTS idx_species_risk_gid_species ON species_risk_by_way (gid, species);

"#;
