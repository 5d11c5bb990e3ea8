//! Parameter descriptors for stage parameters.
//!
//! Every stage exposes a fixed table of named parameters. A [`ParamDescriptor`]
//! carries the metadata needed to list, clamp, and reset a parameter. Values
//! are expressed in the audio-node runtime's units (linear gain, seconds,
//! Hz); conversion to the offline renderer's units happens at export.
//!
//! # Example
//!
//! ```rust
//! use stemfx_core::{ParamDescriptor, ParamUnit};
//!
//! let cutoff = ParamDescriptor::frequency("frequency", 0.0, 20000.0, 20000.0);
//! assert_eq!(cutoff.unit, ParamUnit::Hertz);
//! assert_eq!(cutoff.clamp(25000.0), 20000.0);
//! assert!(cutoff.is_default(20000.0));
//! ```

/// Describes a single stage parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamDescriptor {
    /// Runtime parameter name (e.g., `"frequency"`, `"wet"`).
    pub name: &'static str,

    /// Unit type for formatting the parameter value.
    pub unit: ParamUnit,

    /// Minimum documented value.
    pub min: f64,

    /// Maximum documented value.
    pub max: f64,

    /// Neutral value the stage is created with.
    ///
    /// At this value the stage is inactive for export purposes.
    pub default: f64,
}

impl ParamDescriptor {
    /// Parameter with an explicit unit and range.
    pub const fn new(name: &'static str, unit: ParamUnit, min: f64, max: f64, default: f64) -> Self {
        Self {
            name,
            unit,
            min,
            max,
            default,
        }
    }

    /// Wet/mix parameter (0.0–1.0).
    pub const fn wet(default: f64) -> Self {
        Self::new("wet", ParamUnit::None, 0.0, 1.0, default)
    }

    /// Linear gain parameter (unity = 1.0).
    pub const fn linear_gain(name: &'static str, default: f64) -> Self {
        Self::new(name, ParamUnit::Linear, 0.0, 10.0, default)
    }

    /// Gain parameter in decibels.
    pub const fn gain_db(name: &'static str, min: f64, max: f64, default: f64) -> Self {
        Self::new(name, ParamUnit::Decibels, min, max, default)
    }

    /// Frequency parameter in Hz.
    pub const fn frequency(name: &'static str, min: f64, max: f64, default: f64) -> Self {
        Self::new(name, ParamUnit::Hertz, min, max, default)
    }

    /// Time parameter in seconds.
    pub const fn seconds(name: &'static str, min: f64, max: f64, default: f64) -> Self {
        Self::new(name, ParamUnit::Seconds, min, max, default)
    }

    /// Filter quality factor.
    pub const fn q(default: f64) -> Self {
        Self::new("q", ParamUnit::None, 0.0001, 100.0, default)
    }

    /// Clamps a value to this parameter's documented range.
    ///
    /// # Example
    ///
    /// ```rust
    /// use stemfx_core::ParamDescriptor;
    ///
    /// let wet = ParamDescriptor::wet(0.0);
    /// assert_eq!(wet.clamp(0.5), 0.5);
    /// assert_eq!(wet.clamp(-1.0), 0.0);
    /// assert_eq!(wet.clamp(3.0), 1.0);
    /// ```
    #[inline]
    pub fn clamp(&self, value: f64) -> f64 {
        if value < self.min {
            self.min
        } else if value > self.max {
            self.max
        } else {
            value
        }
    }

    /// Returns `true` if `value` lies inside the documented range.
    #[inline]
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// Returns `true` if `value` is exactly the neutral default.
    #[inline]
    pub fn is_default(&self, value: f64) -> bool {
        value == self.default
    }

    /// Formats a value with this parameter's unit suffix.
    pub fn format_value(&self, value: f64) -> String {
        match self.unit {
            ParamUnit::Hertz | ParamUnit::Bits | ParamUnit::Order => {
                format!("{value:.0}{}", self.unit.suffix())
            }
            ParamUnit::Seconds => format!("{value:.3}{}", self.unit.suffix()),
            _ => format!("{value:.2}{}", self.unit.suffix()),
        }
    }
}

/// Unit type for parameter display and formatting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamUnit {
    /// Linear amplitude multiplier (1.0 = unity).
    Linear,

    /// Decibels (dB) - thresholds and EQ gains.
    Decibels,

    /// Hertz (Hz) - filter frequencies and LFO rates.
    Hertz,

    /// Seconds - attack, release, delay, decay.
    Seconds,

    /// Milliseconds (ms) - short modulation delays.
    Milliseconds,

    /// Ratio (n:1) - for compressor and gate ratios.
    Ratio,

    /// Semitones - pitch offsets.
    Semitones,

    /// Bit depth.
    Bits,

    /// Polynomial order.
    Order,

    /// Octaves - sweep width.
    Octaves,

    /// No unit - for mix levels and other dimensionless parameters.
    None,
}

impl ParamUnit {
    /// Returns the unit suffix string for display.
    ///
    /// # Example
    ///
    /// ```rust
    /// use stemfx_core::ParamUnit;
    ///
    /// assert_eq!(ParamUnit::Decibels.suffix(), " dB");
    /// assert_eq!(ParamUnit::Hertz.suffix(), " Hz");
    /// assert_eq!(ParamUnit::None.suffix(), "");
    /// ```
    pub const fn suffix(&self) -> &'static str {
        match self {
            ParamUnit::Linear => "x",
            ParamUnit::Decibels => " dB",
            ParamUnit::Hertz => " Hz",
            ParamUnit::Seconds => " s",
            ParamUnit::Milliseconds => " ms",
            ParamUnit::Ratio => ":1",
            ParamUnit::Semitones => " st",
            ParamUnit::Bits => " bit",
            ParamUnit::Order => "",
            ParamUnit::Octaves => " oct",
            ParamUnit::None => "",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp() {
        let desc = ParamDescriptor::gain_db("threshold", -100.0, 0.0, 0.0);
        assert_eq!(desc.clamp(-24.0), -24.0);
        assert_eq!(desc.clamp(-200.0), -100.0);
        assert_eq!(desc.clamp(6.0), 0.0);
    }

    #[test]
    fn test_contains_includes_bounds() {
        let desc = ParamDescriptor::new("pan", ParamUnit::None, -1.0, 1.0, 0.0);
        assert!(desc.contains(-1.0));
        assert!(desc.contains(1.0));
        assert!(!desc.contains(1.01));
    }

    #[test]
    fn test_is_default_is_exact() {
        let desc = ParamDescriptor::frequency("frequency", 0.0, 20000.0, 20000.0);
        assert!(desc.is_default(20000.0));
        assert!(!desc.is_default(19999.999));
    }

    #[test]
    fn test_format_value() {
        let hz = ParamDescriptor::frequency("frequency", 0.0, 20000.0, 1000.0);
        assert_eq!(hz.format_value(440.0), "440 Hz");

        let secs = ParamDescriptor::seconds("attack", 0.0, 1.0, 0.003);
        assert_eq!(secs.format_value(0.003), "0.003 s");

        let wet = ParamDescriptor::wet(0.0);
        assert_eq!(wet.format_value(0.25), "0.25");
    }
}
