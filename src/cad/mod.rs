pub mod parser;

pub use parser::{CadError, parse_dxf_boundary};

use anyhow::{Context, Result};
use std::path::Path;

use crate::domain::Boundary;

/// Read a DXF file and return its largest polyline outline
pub fn load_dxf_boundary(path: &Path) -> Result<Boundary> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read DXF file: {}", path.display()))?;
    parse_dxf_boundary(&text)
        .with_context(|| format!("Failed to extract site boundary from {}", path.display()))
}
