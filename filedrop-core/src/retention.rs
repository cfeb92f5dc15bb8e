use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

/// How long an uploaded file is retained before it expires.
///
/// The wire keys (`"1hour"`, `"7days"`, ...) are the values accepted in the
/// upload form's `duration` field; anything else is rejected by
/// deserialization before it reaches the lifecycle layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub enum RetentionPeriod {
    #[serde(rename = "1hour")]
    OneHour,
    #[serde(rename = "6hours")]
    SixHours,
    #[serde(rename = "12hours")]
    TwelveHours,
    #[serde(rename = "1day")]
    OneDay,
    #[default]
    #[serde(rename = "7days")]
    SevenDays,
    #[serde(rename = "14days")]
    FourteenDays,
    #[serde(rename = "30days")]
    ThirtyDays,
    #[serde(rename = "unlimited")]
    Unlimited,
}

impl RetentionPeriod {
    /// Resolve this period into an absolute expiry instant.
    ///
    /// Returns `None` for [`Unlimited`](Self::Unlimited): the file never
    /// expires.
    pub fn resolve(self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.offset().map(|delta| now + delta)
    }

    /// Parse a wire key like `"6hours"`. Returns `None` for unknown keys.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "1hour" => Some(Self::OneHour),
            "6hours" => Some(Self::SixHours),
            "12hours" => Some(Self::TwelveHours),
            "1day" => Some(Self::OneDay),
            "7days" => Some(Self::SevenDays),
            "14days" => Some(Self::FourteenDays),
            "30days" => Some(Self::ThirtyDays),
            "unlimited" => Some(Self::Unlimited),
            _ => None,
        }
    }

    /// The wire key for this period.
    pub fn as_key(self) -> &'static str {
        match self {
            Self::OneHour => "1hour",
            Self::SixHours => "6hours",
            Self::TwelveHours => "12hours",
            Self::OneDay => "1day",
            Self::SevenDays => "7days",
            Self::FourteenDays => "14days",
            Self::ThirtyDays => "30days",
            Self::Unlimited => "unlimited",
        }
    }

    fn offset(self) -> Option<TimeDelta> {
        match self {
            Self::OneHour => Some(TimeDelta::hours(1)),
            Self::SixHours => Some(TimeDelta::hours(6)),
            Self::TwelveHours => Some(TimeDelta::hours(12)),
            Self::OneDay => Some(TimeDelta::days(1)),
            Self::SevenDays => Some(TimeDelta::days(7)),
            Self::FourteenDays => Some(TimeDelta::days(14)),
            Self::ThirtyDays => Some(TimeDelta::days(30)),
            Self::Unlimited => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unlimited_never_resolves() {
        assert_eq!(RetentionPeriod::Unlimited.resolve(Utc::now()), None);
    }

    #[test]
    fn fixed_periods_offset_from_now() {
        let now = Utc::now();
        assert_eq!(
            RetentionPeriod::OneHour.resolve(now),
            Some(now + TimeDelta::hours(1))
        );
        assert_eq!(
            RetentionPeriod::ThirtyDays.resolve(now),
            Some(now + TimeDelta::days(30))
        );
    }

    #[test]
    fn default_is_seven_days() {
        assert_eq!(RetentionPeriod::default(), RetentionPeriod::SevenDays);
    }

    #[test]
    fn keys_round_trip() {
        for key in [
            "1hour", "6hours", "12hours", "1day", "7days", "14days", "30days", "unlimited",
        ] {
            let period = RetentionPeriod::from_key(key).unwrap();
            assert_eq!(period.as_key(), key);
        }
        assert_eq!(RetentionPeriod::from_key("2weeks"), None);
    }

    #[test]
    fn wire_keys_deserialize() {
        let period: RetentionPeriod = serde_json::from_str("\"14days\"").unwrap();
        assert_eq!(period, RetentionPeriod::FourteenDays);
        assert!(serde_json::from_str::<RetentionPeriod>("\"forever\"").is_err());
    }
}
