/// Time-scale tokens understood by the telemetry API
use std::fmt;
use std::str::FromStr;

use crate::error::PipelineError;

/// Every token any backend revision has accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeScale {
    Raw,
    Seconds30,
    Minutes1,
    Minutes5,
    Minutes30,
    Hours1,
    Hours6,
    Hours24,
    Days7,
    Days30,
    All,
}

impl TimeScale {
    /// Token as sent on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            TimeScale::Raw => "raw",
            TimeScale::Seconds30 => "30s",
            TimeScale::Minutes1 => "1m",
            TimeScale::Minutes5 => "5m",
            TimeScale::Minutes30 => "30m",
            TimeScale::Hours1 => "1h",
            TimeScale::Hours6 => "6h",
            TimeScale::Hours24 => "24h",
            TimeScale::Days7 => "7d",
            TimeScale::Days30 => "30d",
            TimeScale::All => "all",
        }
    }

    /// Value of the `timeScale` query parameter; the token verbatim.
    pub fn query_param(self) -> &'static str {
        self.as_str()
    }
}

impl fmt::Display for TimeScale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeScale {
    type Err = PipelineError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        match token {
            "raw" => Ok(TimeScale::Raw),
            "30s" => Ok(TimeScale::Seconds30),
            "1m" => Ok(TimeScale::Minutes1),
            "5m" => Ok(TimeScale::Minutes5),
            "30m" => Ok(TimeScale::Minutes30),
            "1h" => Ok(TimeScale::Hours1),
            "6h" => Ok(TimeScale::Hours6),
            "24h" => Ok(TimeScale::Hours24),
            "7d" => Ok(TimeScale::Days7),
            "30d" => Ok(TimeScale::Days30),
            "all" => Ok(TimeScale::All),
            other => Err(PipelineError::UnsupportedTimeScale(other.to_string())),
        }
    }
}

/// Token set accepted by a given backend deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScaleSet {
    /// Window selector: 30m, 1h, 6h, 24h, 7d, 30d, all
    Windowed,
    /// Bucket granularity: raw, 30s, 1m, 5m, 1h, 6h, 24h, 7d, 30d
    Granular,
}

const WINDOWED: &[TimeScale] = &[
    TimeScale::Minutes30,
    TimeScale::Hours1,
    TimeScale::Hours6,
    TimeScale::Hours24,
    TimeScale::Days7,
    TimeScale::Days30,
    TimeScale::All,
];

const GRANULAR: &[TimeScale] = &[
    TimeScale::Raw,
    TimeScale::Seconds30,
    TimeScale::Minutes1,
    TimeScale::Minutes5,
    TimeScale::Hours1,
    TimeScale::Hours6,
    TimeScale::Hours24,
    TimeScale::Days7,
    TimeScale::Days30,
];

impl ScaleSet {
    pub fn members(self) -> &'static [TimeScale] {
        match self {
            ScaleSet::Windowed => WINDOWED,
            ScaleSet::Granular => GRANULAR,
        }
    }

    /// Resolve a token against this set.
    ///
    /// Tokens outside the set are rejected even when another revision knows
    /// them, so the caller never builds a request for them.
    pub fn resolve(self, token: &str) -> Result<TimeScale, PipelineError> {
        let scale = TimeScale::from_str(token.trim())?;
        if self.members().contains(&scale) {
            Ok(scale)
        } else {
            Err(PipelineError::UnsupportedTimeScale(token.trim().to_string()))
        }
    }

    /// Tokens offered to the user, in display order.
    pub fn tokens(self) -> Vec<&'static str> {
        self.members().iter().map(|s| s.as_str()).collect()
    }
}

impl FromStr for ScaleSet {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "windowed" => Ok(ScaleSet::Windowed),
            "granular" => Ok(ScaleSet::Granular),
            other => Err(format!(
                "Unknown time scale set '{}', expected 'windowed' or 'granular'",
                other
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_within_set() {
        assert_eq!(ScaleSet::Windowed.resolve("24h").unwrap(), TimeScale::Hours24);
        assert_eq!(ScaleSet::Windowed.resolve(" all ").unwrap(), TimeScale::All);
        assert_eq!(ScaleSet::Granular.resolve("30s").unwrap(), TimeScale::Seconds30);
    }

    #[test]
    fn test_resolve_rejects_other_revision_tokens() {
        assert!(matches!(
            ScaleSet::Windowed.resolve("raw"),
            Err(PipelineError::UnsupportedTimeScale(t)) if t == "raw"
        ));
        assert!(ScaleSet::Granular.resolve("all").is_err());
        assert!(ScaleSet::Granular.resolve("30m").is_err());
        assert!(ScaleSet::Windowed.resolve("2h").is_err());
        assert!(ScaleSet::Windowed.resolve("").is_err());
    }

    #[test]
    fn test_query_param_is_verbatim() {
        for set in [ScaleSet::Windowed, ScaleSet::Granular] {
            for token in set.tokens() {
                assert_eq!(set.resolve(token).unwrap().query_param(), token);
            }
        }
    }

    #[test]
    fn test_scale_set_parsing() {
        assert_eq!("Granular".parse::<ScaleSet>().unwrap(), ScaleSet::Granular);
        assert!("hourly".parse::<ScaleSet>().is_err());
        assert_eq!(
            ScaleSet::Windowed.tokens(),
            vec!["30m", "1h", "6h", "24h", "7d", "30d", "all"]
        );
    }
}
