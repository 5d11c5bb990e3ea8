//! Tempo-relative time values.
//!
//! Delay times may be given as musical note values (`"8n"`, `"4n."`, `"8t"`)
//! instead of seconds. [`DelayTime`] keeps whichever the caller supplied and
//! resolves it to absolute seconds against a tempo.

use core::fmt;
use core::str::FromStr;

/// Musical note divisions for tempo sync.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum NoteDivision {
    /// Whole note (4 beats)
    Whole,
    /// Half note (2 beats)
    Half,
    /// Quarter note (1 beat)
    Quarter,
    /// Eighth note (1/2 beat)
    #[default]
    Eighth,
    /// Sixteenth note (1/4 beat)
    Sixteenth,
    /// Thirty-second note (1/8 beat)
    ThirtySecond,
    /// Dotted half note (3 beats)
    DottedHalf,
    /// Dotted quarter note (1.5 beats)
    DottedQuarter,
    /// Dotted eighth note (3/4 beat)
    DottedEighth,
    /// Triplet quarter note (2/3 beat)
    TripletQuarter,
    /// Triplet eighth note (1/3 beat)
    TripletEighth,
    /// Triplet sixteenth note (1/6 beat)
    TripletSixteenth,
}

impl NoteDivision {
    /// Get the number of beats this division represents.
    pub fn beats(&self) -> f64 {
        match self {
            NoteDivision::Whole => 4.0,
            NoteDivision::Half => 2.0,
            NoteDivision::Quarter => 1.0,
            NoteDivision::Eighth => 0.5,
            NoteDivision::Sixteenth => 0.25,
            NoteDivision::ThirtySecond => 0.125,
            NoteDivision::DottedHalf => 3.0,
            NoteDivision::DottedQuarter => 1.5,
            NoteDivision::DottedEighth => 0.75,
            NoteDivision::TripletQuarter => 2.0 / 3.0,
            NoteDivision::TripletEighth => 1.0 / 3.0,
            NoteDivision::TripletSixteenth => 1.0 / 6.0,
        }
    }

    /// Convert note division to seconds at given BPM.
    ///
    /// # Example
    ///
    /// ```rust
    /// use stemfx_core::NoteDivision;
    ///
    /// // At 120 BPM, an eighth note lasts 250 ms
    /// assert_eq!(NoteDivision::Eighth.to_seconds(120.0), 0.25);
    /// ```
    pub fn to_seconds(&self, bpm: f64) -> f64 {
        self.beats() * 60.0 / bpm
    }

    /// Transport notation for this division (`"8n"`, `"4n."`, `"8t"`).
    pub const fn notation(&self) -> &'static str {
        match self {
            NoteDivision::Whole => "1n",
            NoteDivision::Half => "2n",
            NoteDivision::Quarter => "4n",
            NoteDivision::Eighth => "8n",
            NoteDivision::Sixteenth => "16n",
            NoteDivision::ThirtySecond => "32n",
            NoteDivision::DottedHalf => "2n.",
            NoteDivision::DottedQuarter => "4n.",
            NoteDivision::DottedEighth => "8n.",
            NoteDivision::TripletQuarter => "4t",
            NoteDivision::TripletEighth => "8t",
            NoteDivision::TripletSixteenth => "16t",
        }
    }
}

impl fmt::Display for NoteDivision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.notation())
    }
}

/// Error returned for unrecognized time notation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid time notation: '{0}'")]
pub struct InvalidNotation(pub String);

impl FromStr for NoteDivision {
    type Err = InvalidNotation;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            // One 4/4 measure equals a whole note.
            "1n" | "1m" => Ok(NoteDivision::Whole),
            "2n" => Ok(NoteDivision::Half),
            "4n" => Ok(NoteDivision::Quarter),
            "8n" => Ok(NoteDivision::Eighth),
            "16n" => Ok(NoteDivision::Sixteenth),
            "32n" => Ok(NoteDivision::ThirtySecond),
            "2n." => Ok(NoteDivision::DottedHalf),
            "4n." => Ok(NoteDivision::DottedQuarter),
            "8n." => Ok(NoteDivision::DottedEighth),
            "4t" => Ok(NoteDivision::TripletQuarter),
            "8t" => Ok(NoteDivision::TripletEighth),
            "16t" => Ok(NoteDivision::TripletSixteenth),
            other => Err(InvalidNotation(other.to_string())),
        }
    }
}

/// A delay time in absolute or tempo-relative form.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DelayTime {
    /// Absolute time in seconds.
    Seconds(f64),
    /// Musical note value, resolved against the engine tempo.
    Note(NoteDivision),
}

impl DelayTime {
    /// Resolve to seconds at the given tempo.
    pub fn to_seconds(&self, bpm: f64) -> f64 {
        match self {
            DelayTime::Seconds(s) => *s,
            DelayTime::Note(division) => division.to_seconds(bpm),
        }
    }
}

impl Default for DelayTime {
    fn default() -> Self {
        DelayTime::Note(NoteDivision::Eighth)
    }
}

impl From<NoteDivision> for DelayTime {
    fn from(division: NoteDivision) -> Self {
        DelayTime::Note(division)
    }
}

impl FromStr for DelayTime {
    type Err = InvalidNotation;

    /// Parses `"8n"`-style notation, `"250ms"`, `"0.25s"`, or a bare number of seconds.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim();
        if let Ok(division) = value.parse::<NoteDivision>() {
            return Ok(DelayTime::Note(division));
        }
        let seconds = if let Some(ms) = value.strip_suffix("ms") {
            ms.trim().parse::<f64>().ok().map(|v| v / 1000.0)
        } else if let Some(s) = value.strip_suffix('s') {
            s.trim().parse::<f64>().ok()
        } else {
            value.parse::<f64>().ok()
        };
        seconds
            .filter(|v| v.is_finite())
            .map(DelayTime::Seconds)
            .ok_or_else(|| InvalidNotation(value.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eighth_at_120_bpm() {
        assert_eq!(NoteDivision::Eighth.to_seconds(120.0), 0.25);
        assert_eq!(NoteDivision::Quarter.to_seconds(60.0), 1.0);
    }

    #[test]
    fn test_dotted_and_triplet() {
        assert!((NoteDivision::DottedEighth.to_seconds(120.0) - 0.375).abs() < 1e-12);
        assert!((NoteDivision::TripletEighth.to_seconds(120.0) - 1.0 / 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_notation_roundtrip() {
        for division in [
            NoteDivision::Whole,
            NoteDivision::Half,
            NoteDivision::Quarter,
            NoteDivision::Eighth,
            NoteDivision::Sixteenth,
            NoteDivision::ThirtySecond,
            NoteDivision::DottedHalf,
            NoteDivision::DottedQuarter,
            NoteDivision::DottedEighth,
            NoteDivision::TripletQuarter,
            NoteDivision::TripletEighth,
            NoteDivision::TripletSixteenth,
        ] {
            assert_eq!(division.notation().parse::<NoteDivision>(), Ok(division));
        }
        assert_eq!("1m".parse::<NoteDivision>(), Ok(NoteDivision::Whole));
    }

    #[test]
    fn test_delay_time_parse() {
        assert_eq!("8n".parse::<DelayTime>(), Ok(DelayTime::Note(NoteDivision::Eighth)));
        assert_eq!("250ms".parse::<DelayTime>(), Ok(DelayTime::Seconds(0.25)));
        assert_eq!("0.5s".parse::<DelayTime>(), Ok(DelayTime::Seconds(0.5)));
        assert_eq!("0.3".parse::<DelayTime>(), Ok(DelayTime::Seconds(0.3)));
        assert!("9x".parse::<DelayTime>().is_err());
    }

    #[test]
    fn test_delay_time_default_is_eighth() {
        assert_eq!(DelayTime::default().to_seconds(120.0), 0.25);
        assert_eq!(DelayTime::Seconds(0.4).to_seconds(90.0), 0.4);
    }
}
