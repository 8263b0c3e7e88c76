pub mod dxf;
pub mod json;
pub mod svg;

pub use dxf::{DxfOptions, write_dxf};
pub use json::write_json;
pub use svg::{SvgOptions, write_svg};

/// Output files the CLI can produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ExportFormat {
    Svg,
    Dxf,
    Json,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Svg => "svg",
            ExportFormat::Dxf => "dxf",
            ExportFormat::Json => "json",
        }
    }
}
