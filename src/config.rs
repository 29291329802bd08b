use std::{env, path::PathBuf};
use anyhow::{bail, Context, Result};

use crate::dispatch::ReconcilePolicy;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub data_path: PathBuf,
    pub public_dir: PathBuf,
    pub reconcile: ReconcilePolicy,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let port = match get("PORT") {
            Some(raw) => raw.parse().with_context(|| format!("invalid PORT {raw:?}"))?,
            None => 3000,
        };

        let reconcile = match get("RECONCILE_DISPATCH").map(|raw| parse_flag(&raw)).transpose()? {
            Some(true) => ReconcilePolicy::MarkNextPending,
            _ => ReconcilePolicy::LogOnly,
        };

        Ok(Self {
            port,
            data_path: get("DATA_PATH").unwrap_or_else(|| "data/patients.json".into()).into(),
            public_dir: get("PUBLIC_DIR").unwrap_or_else(|| "public".into()).into(),
            reconcile,
        })
    }
}

fn parse_flag(raw: &str) -> Result<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => bail!("invalid RECONCILE_DISPATCH value {other:?}"),
    }
}
