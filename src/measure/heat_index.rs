//! Heat index as computed by the Adafruit DHT library in Celsius mode.

pub fn celsius_to_fahrenheit(c: f32) -> f32 {
    c * 1.8 + 32.0
}

pub fn fahrenheit_to_celsius(f: f32) -> f32 {
    (f - 32.0) * 0.55555
}

/// Steadman's approximation, switching to the Rothfusz regression (with the
/// NWS low/high humidity adjustments) once the simple estimate exceeds 79 °F.
pub fn heat_index_celsius(temperature_c: f32, humidity_percent: f32) -> f32 {
    let t = celsius_to_fahrenheit(temperature_c);
    let h = humidity_percent;

    let mut hi = 0.5 * (t + 61.0 + ((t - 68.0) * 1.2) + (h * 0.094));

    if hi > 79.0 {
        hi = -42.379 + 2.04901523 * t + 10.14333127 * h
            + -0.22475541 * t * h
            + -0.00683783 * t.powi(2)
            + -0.05481717 * h.powi(2)
            + 0.00122874 * t.powi(2) * h
            + 0.00085282 * t * h.powi(2)
            + -0.00000199 * t.powi(2) * h.powi(2);

        if h < 13.0 && (80.0..=112.0).contains(&t) {
            hi -= ((13.0 - h) * 0.25) * ((17.0 - (t - 95.0).abs()) * 0.05882).sqrt();
        } else if h > 85.0 && (80.0..=87.0).contains(&t) {
            hi += ((h - 85.0) * 0.1) * ((87.0 - t) * 0.2);
        }
    }

    fahrenheit_to_celsius(hi)
}
