use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::layout::Layout;

pub fn to_json_string(layout: &Layout) -> Result<String> {
    serde_json::to_string_pretty(layout).context("Failed to serialize layout")
}

/// Write placements, per-type summaries and the seed as pretty JSON
pub fn write_json(path: &Path, layout: &Layout) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create JSON file: {}", path.display()))?;
    let mut writer = BufWriter::new(file);

    serde_json::to_writer_pretty(&mut writer, layout).context("Failed to serialize layout")?;
    writer.write_all(b"\n")?;
    writer.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Boundary, VenueType};
    use crate::layout::{LayoutParams, generate_layout};
    use tempfile::tempdir;

    #[test]
    fn test_json_shape() {
        let catalog = vec![
            VenueType::new("A", 10.0, 10.0, 2),
            VenueType::new("huge", 500.0, 10.0, 1),
        ];
        let layout = generate_layout(
            &catalog,
            &Boundary::rectangle(100.0, 100.0),
            &LayoutParams::default().with_seed(3),
        )
        .unwrap();

        let value: serde_json::Value = serde_json::from_str(&to_json_string(&layout).unwrap()).unwrap();

        assert_eq!(value["seed"], 3);
        assert_eq!(value["placements"].as_array().unwrap().len(), 2);
        assert_eq!(value["placements"][0]["name"], "A");
        assert_eq!(value["summaries"][1]["reason"], "does-not-fit");
        assert_eq!(value["summaries"][0]["reason"], serde_json::Value::Null);
    }

    #[test]
    fn test_write_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("layout.json");
        let layout = generate_layout(
            &[VenueType::new("A", 10.0, 10.0, 1)],
            &Boundary::rectangle(50.0, 50.0),
            &LayoutParams::default().with_seed(1),
        )
        .unwrap();

        write_json(&path, &layout).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.ends_with("}\n"));
        assert!(written.contains("\"carried_over\": 0"));
    }
}
