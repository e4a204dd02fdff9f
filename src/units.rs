use {
    metfor::{Celsius, HectoPascal, Kelvin, Quantity},
    serde::{Deserialize, Serialize},
    std::fmt,
};

/// metfor has no Pascal quantity
const PASCALS_PER_HECTOPASCAL: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PressureUnit {
    HectoPascal,
    Pascal,
}

impl PressureUnit {
    pub fn to_hectopascals(self, value: f64) -> HectoPascal {
        match self {
            PressureUnit::HectoPascal => HectoPascal(value),
            PressureUnit::Pascal => HectoPascal(value / PASCALS_PER_HECTOPASCAL),
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            PressureUnit::HectoPascal => "hPa",
            PressureUnit::Pascal => "Pa",
        }
    }
}

/// Unit of the values held in a field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValueUnit {
    Kelvin,
    Celsius,
    MetersPerSecond,
    /// Geopotential height
    Meters,
}

impl ValueUnit {
    /// `None` for units that are not temperatures
    pub fn to_kelvin(self, value: f64) -> Option<Kelvin> {
        match self {
            ValueUnit::Kelvin => Some(Kelvin(value)),
            ValueUnit::Celsius => Some(Kelvin::from(Celsius(value))),
            ValueUnit::MetersPerSecond | ValueUnit::Meters => None,
        }
    }

    pub fn is_temperature(self) -> bool {
        matches!(self, ValueUnit::Kelvin | ValueUnit::Celsius)
    }

    pub fn symbol(self) -> &'static str {
        match self {
            ValueUnit::Kelvin => "K",
            ValueUnit::Celsius => "°C",
            ValueUnit::MetersPerSecond => "m/s",
            ValueUnit::Meters => "m",
        }
    }
}

/// Units of a field's level coordinate and of its values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldUnits {
    pub pressure: PressureUnit,
    pub values: ValueUnit,
}

impl FieldUnits {
    /// Values in `values` on levels given in hPa
    pub fn hectopascals(values: ValueUnit) -> Self {
        FieldUnits {
            pressure: PressureUnit::HectoPascal,
            values,
        }
    }
}

impl Default for FieldUnits {
    fn default() -> Self {
        FieldUnits::hectopascals(ValueUnit::Kelvin)
    }
}

impl fmt::Display for FieldUnits {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}/{}", self.pressure.symbol(), self.values.symbol())
    }
}
