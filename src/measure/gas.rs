//! Gas concentration estimate for the MQ-series sensor on the analog input.
//!
//! The curve constants are an empirical fit for this sensor and its load
//! resistor. They are kept as literals; changing any of them changes the
//! calibration of every reported value.

/// Full-scale reading of the 12-bit ADC.
pub const ADC_MAX: u16 = 4095;

/// Supply voltage across the sensor and load resistor.
pub const VCC: f32 = 5.0;

/// Load resistor in the divider, in ohms.
pub const LOAD_RESISTANCE_OHMS: f32 = 10000.0;

/// Sensor resistance in clean air, in ohms.
pub const REFERENCE_RESISTANCE_OHMS: f32 = 10000.0;

/// Output voltage floor; keeps `VCC / vout` finite.
pub const MIN_VOUT: f32 = 0.0001;

const CURVE_SCALE: f32 = 1000.0;
const CURVE_EXPONENT: f32 = -2.3;

const METHANE_MOLAR_MASS: f32 = 16.04;
const MOLAR_VOLUME_LITRES: f32 = 24.45;
const CO2_MOLAR_MASS: f32 = 44.01;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GasEstimate {
    pub vout: f32,

    pub rs_ohms: f32,

    pub rs_ro: f32,

    pub ppm: f32,

    pub mg_per_m3: f32,

    /// CO2-equivalent density in g/m³. Infinite when the ADC is saturated.
    pub co2_density: f32,
}

/// Converts a raw ADC value to the divider output voltage, clamped to
/// [`MIN_VOUT`] from below.
pub fn adc_to_voltage(raw: u16) -> f32 {
    let vout = (raw as f32 / ADC_MAX as f32) * VCC;
    if vout <= 0.0 { MIN_VOUT } else { vout }
}

pub fn estimate_gas(raw: u16) -> GasEstimate {
    let vout = adc_to_voltage(raw);

    let rs_ohms = LOAD_RESISTANCE_OHMS * (VCC / vout - 1.0);
    let rs_ro = rs_ohms / REFERENCE_RESISTANCE_OHMS;

    // rs_ro == 0 at full scale; powf yields +inf there, which is what we report.
    let ppm = CURVE_SCALE * rs_ro.powf(CURVE_EXPONENT);
    let mg_per_m3 = ppm * METHANE_MOLAR_MASS / MOLAR_VOLUME_LITRES;
    let co2_density = (mg_per_m3 / 1000.0) * (CO2_MOLAR_MASS / METHANE_MOLAR_MASS);

    GasEstimate {
        vout,
        rs_ohms,
        rs_ro,
        ppm,
        mg_per_m3,
        co2_density,
    }
}
