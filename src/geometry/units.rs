use serde::Deserialize;

/// Linear units for site input and CAD export
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    #[default]
    #[value(name = "m")]
    #[serde(alias = "m")]
    Meters,
    #[value(name = "cm")]
    #[serde(alias = "cm")]
    Centimeters,
    #[value(name = "mm")]
    #[serde(alias = "mm")]
    Millimeters,
    #[value(name = "ft")]
    #[serde(alias = "ft")]
    Feet,
}

impl Unit {
    pub fn meters(self) -> f64 {
        match self {
            Unit::Meters => 1.0,
            Unit::Centimeters => 0.01,
            Unit::Millimeters => 0.001,
            Unit::Feet => 0.3048,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Unit::Meters => "m",
            Unit::Centimeters => "cm",
            Unit::Millimeters => "mm",
            Unit::Feet => "ft",
        }
    }
}

/// Factor that turns a length in `from` into a length in `to`
pub fn conversion_factor(from: Unit, to: Unit) -> f64 {
    from.meters() / to.meters()
}
