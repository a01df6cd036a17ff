//! Config parsing and profile/preset resolution.
//!
//! This crate is intentionally IO-free: it parses and resolves configuration provided as strings.

#![forbid(unsafe_code)]

mod model;
mod presets;
mod resolve;

pub use model::PolicheckConfigV1;
pub use presets::PROFILES;
pub use resolve::{Overrides, ResolvedConfig, parse_absent_field};

/// Parse `policheck.toml` (or equivalent) into a typed model.
pub fn parse_config_toml(input: &str) -> anyhow::Result<PolicheckConfigV1> {
    let cfg: PolicheckConfigV1 = toml::from_str(input)?;
    Ok(cfg)
}

/// Resolve the effective config used by the engine (preset, then file, then overrides).
pub fn resolve_config(
    cfg: PolicheckConfigV1,
    overrides: Overrides,
) -> anyhow::Result<ResolvedConfig> {
    resolve::resolve_config(cfg, overrides)
}
