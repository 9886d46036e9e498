use std::env::VarError;

use anyhow::anyhow;

pub const REQUIRED_VARIABLES: &[&str] = &["PG_URL", "LISTEN_PORT", "GEOCODER_ADDR", "SPECIES"];

/// Startup configuration, read from the environment exactly once in `main`.
/// Core logic only ever sees this struct, never ambient environment state.
pub struct Config {
    pub pg_url: String,
    pub listen_port: u16,
    /// Base URL of the Photon geocoding service.
    pub geocoder_addr: String,
    /// Species to materialize by default, comma-separated in the variable.
    pub species: Vec<String>,
}

impl Config {
    pub fn env() -> anyhow::Result<Self> {
        let pg_url = env("PG_URL")?;

        let listen_port = env("LISTEN_PORT")?
            .parse()
            .map_err(|e| anyhow!("LISTEN_PORT is not a valid port number: {e}"))?;

        let geocoder_addr = env("GEOCODER_ADDR")?;

        let species = parse_species(&env("SPECIES")?);
        if species.is_empty() {
            return Err(anyhow!("SPECIES must name at least one species"));
        }

        Ok(Self {
            pg_url,
            listen_port,
            geocoder_addr,
            species,
        })
    }

    pub fn log(&self) {
        log::info!("listen_port: {}", self.listen_port);
        log::info!("geocoder_addr: {}", self.geocoder_addr);
        log::info!("species: {}", self.species.join(", "));
    }
}

fn parse_species(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn env(name: &str) -> anyhow::Result<String> {
    std::env::var(name).map_err(|e| match e {
        VarError::NotPresent => anyhow!("{name} not set"),
        VarError::NotUnicode(_) => anyhow!("{name} value is not valid unicode"),
    })
}
