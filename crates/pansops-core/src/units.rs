//! Unit conversion and ISA true-airspeed correction.

use crate::error::{ensure_non_negative, ensure_positive, AreaError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const METERS_PER_FOOT: f64 = 0.3048;
pub const METERS_PER_NAUTICAL_MILE: f64 = 1852.0;
/// One knot in meters per second.
pub const MPS_PER_KNOT: f64 = METERS_PER_NAUTICAL_MILE / 3600.0;

/// Linear distance units accepted by the procedure forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum DistanceUnit {
    #[serde(rename = "ft")]
    Feet,
    #[serde(rename = "m")]
    Meters,
    #[serde(rename = "NM")]
    NauticalMiles,
}

impl DistanceUnit {
    pub fn as_str(self) -> &'static str {
        match self {
            DistanceUnit::Feet => "ft",
            DistanceUnit::Meters => "m",
            DistanceUnit::NauticalMiles => "NM",
        }
    }

    fn meters_per_unit(self) -> f64 {
        match self {
            DistanceUnit::Feet => METERS_PER_FOOT,
            DistanceUnit::Meters => 1.0,
            DistanceUnit::NauticalMiles => METERS_PER_NAUTICAL_MILE,
        }
    }
}

impl FromStr for DistanceUnit {
    type Err = AreaError;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_lowercase().as_str() {
            "ft" | "feet" | "foot" => Ok(Self::Feet),
            "m" | "meter" | "meters" | "metre" | "metres" => Ok(Self::Meters),
            "nm" | "nautical miles" | "nautical_miles" => Ok(Self::NauticalMiles),
            _ => Err(AreaError::InvalidUnit(value.to_string())),
        }
    }
}

impl TryFrom<String> for DistanceUnit {
    type Error = AreaError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl fmt::Display for DistanceUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Convert a strictly positive distance to meters.
pub fn to_meters(value: f64, unit: DistanceUnit) -> Result<f64> {
    let value = ensure_positive("distance", value)?;
    Ok(value * unit.meters_per_unit())
}

/// Convert an altitude to meters. Zero is allowed, negative values are not.
pub fn altitude_to_meters(value: f64, unit: DistanceUnit) -> Result<f64> {
    let value = ensure_non_negative("altitude", value)?;
    Ok(value * unit.meters_per_unit())
}

/// Convert meters into `unit`.
pub fn from_meters(meters: f64, unit: DistanceUnit) -> f64 {
    meters / unit.meters_per_unit()
}

pub fn to_feet(meters: f64) -> f64 {
    from_meters(meters, DistanceUnit::Feet)
}

pub fn to_nautical_miles(meters: f64) -> f64 {
    from_meters(meters, DistanceUnit::NauticalMiles)
}

pub fn knots_to_mps(knots: f64) -> f64 {
    knots * MPS_PER_KNOT
}

pub fn mps_to_knots(mps: f64) -> f64 {
    mps / MPS_PER_KNOT
}

/// ISA sea-level temperature in kelvin, rounded as in the conversion.
const ISA_SEA_LEVEL_TERM: f64 = 288.0;
/// ISA lapse rate in °C per meter (1.98 °C / 1000 ft).
const ISA_LAPSE_PER_M: f64 = 0.006496;
const TAS_SCALE: f64 = 171_233.0;
const TAS_EXPONENT: f64 = 2.628;

/// True airspeed in knots for a given IAS, altitude and ISA deviation.
///
/// Uses the procedure-design conversion factor
/// `171233 * sqrt((288 + VAR) - 0.006496 H) / (288 - 0.006496 H)^2.628`
/// with `H` in meters and `VAR` the ISA deviation in °C.
pub fn isa_corrected_tas(ias_kt: f64, altitude_m: f64, isa_deviation_c: f64) -> Result<f64> {
    let ias_kt = ensure_positive("indicated airspeed", ias_kt)?;
    let altitude_m = ensure_non_negative("altitude", altitude_m)?;
    if !isa_deviation_c.is_finite() {
        return Err(AreaError::magnitude("ISA deviation", isa_deviation_c));
    }

    let lapse = ISA_LAPSE_PER_M * altitude_m;
    let actual = ISA_SEA_LEVEL_TERM + isa_deviation_c - lapse;
    let standard = ISA_SEA_LEVEL_TERM - lapse;
    if actual <= 0.0 {
        return Err(AreaError::magnitude("ISA deviation", isa_deviation_c));
    }
    if standard <= 0.0 {
        return Err(AreaError::magnitude("altitude", altitude_m));
    }

    let factor = TAS_SCALE * actual.sqrt() / standard.powf(TAS_EXPONENT);
    Ok(ias_kt * factor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_accepts_the_same_spellings_as_parse() {
        for (text, unit) in [
            ("\"nm\"", DistanceUnit::NauticalMiles),
            ("\"NM\"", DistanceUnit::NauticalMiles),
            ("\"feet\"", DistanceUnit::Feet),
            ("\"meters\"", DistanceUnit::Meters),
        ] {
            assert_eq!(serde_json::from_str::<DistanceUnit>(text).unwrap(), unit);
        }
        assert!(serde_json::from_str::<DistanceUnit>("\"yards\"").is_err());
        assert_eq!(serde_json::to_string(&DistanceUnit::NauticalMiles).unwrap(), "\"NM\"");
    }

    #[test]
    fn parses_units_case_insensitively() {
        assert_eq!("ft".parse::<DistanceUnit>().unwrap(), DistanceUnit::Feet);
        assert_eq!("M".parse::<DistanceUnit>().unwrap(), DistanceUnit::Meters);
        assert_eq!("NM".parse::<DistanceUnit>().unwrap(), DistanceUnit::NauticalMiles);
        assert_eq!(
            "furlong".parse::<DistanceUnit>(),
            Err(AreaError::InvalidUnit("furlong".into()))
        );
    }

    #[test]
    fn converts_known_values() {
        assert!((to_meters(1.0, DistanceUnit::NauticalMiles).unwrap() - 1852.0).abs() < 1e-12);
        assert!((to_meters(1000.0, DistanceUnit::Feet).unwrap() - 304.8).abs() < 1e-9);
        assert!((to_meters(42.0, DistanceUnit::Meters).unwrap() - 42.0).abs() < 1e-12);
        assert!((knots_to_mps(3600.0) - 1852.0).abs() < 1e-9);
    }

    #[test]
    fn rejects_non_positive_distances() {
        assert!(matches!(
            to_meters(0.0, DistanceUnit::Feet),
            Err(AreaError::InvalidMagnitude { .. })
        ));
        assert!(to_meters(-5.0, DistanceUnit::Meters).is_err());
        assert_eq!(altitude_to_meters(0.0, DistanceUnit::Feet).unwrap(), 0.0);
        assert!(altitude_to_meters(-10.0, DistanceUnit::Feet).is_err());
    }

    #[test]
    fn feet_round_trip_is_stable() {
        for x in [1e-6, 0.3048, 1.0, 123.456, 9_999.0, 1.5e7] {
            let back = to_meters(to_feet(x), DistanceUnit::Feet).unwrap();
            assert!(((back - x) / x).abs() <= 1e-9, "{x} -> {back}");
        }
    }

    #[test]
    fn tas_equals_ias_at_sea_level_isa() {
        let tas = isa_corrected_tas(200.0, 0.0, 0.0).unwrap();
        // The conversion constant is calibrated to ~1.0 at sea level ISA.
        assert!((tas - 200.0).abs() < 0.5, "tas = {tas}");
    }

    #[test]
    fn tas_grows_with_altitude_and_temperature() {
        let low = isa_corrected_tas(220.0, 0.0, 0.0).unwrap();
        let high = isa_corrected_tas(220.0, to_meters(6000.0, DistanceUnit::Feet).unwrap(), 0.0)
            .unwrap();
        let hot = isa_corrected_tas(220.0, to_meters(6000.0, DistanceUnit::Feet).unwrap(), 15.0)
            .unwrap();
        assert!(high > low);
        assert!(hot > high);
        // Roughly 2% per 1000 ft.
        assert!(high > 235.0 && high < 250.0, "high = {high}");
    }

    #[test]
    fn tas_rejects_invalid_inputs() {
        assert!(isa_corrected_tas(0.0, 100.0, 0.0).is_err());
        assert!(isa_corrected_tas(200.0, -1.0, 0.0).is_err());
        assert!(isa_corrected_tas(200.0, 100.0, -400.0).is_err());
    }
}
