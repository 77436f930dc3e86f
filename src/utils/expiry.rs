//! Expiration and view-limit option parsing.
//!
//! Both options arrive from clients as the fixed vocabulary the UI offers;
//! anything outside it is a validation failure, not a best-effort guess.

use chrono::{DateTime, Duration, Utc};

/// Relative expiration options, applied against call time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpirationOption {
    FiveMinutes,
    OneHour,
    OneDay,
    OneWeek,
    Never,
}

impl ExpirationOption {
    pub fn parse(input: &str) -> Result<Self, String> {
        match input.trim() {
            "5m" => Ok(Self::FiveMinutes),
            "1h" => Ok(Self::OneHour),
            "1d" => Ok(Self::OneDay),
            "1w" => Ok(Self::OneWeek),
            "never" => Ok(Self::Never),
            other => Err(format!(
                "Invalid expiration option '{}'. Expected one of: 5m, 1h, 1d, 1w, never",
                other
            )),
        }
    }

    /// Absolute deadline relative to `now`; `None` means the snippet never expires.
    pub fn expires_at(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self {
            Self::FiveMinutes => Some(now + Duration::minutes(5)),
            Self::OneHour => Some(now + Duration::hours(1)),
            Self::OneDay => Some(now + Duration::days(1)),
            Self::OneWeek => Some(now + Duration::days(7)),
            Self::Never => None,
        }
    }
}

/// Finite view quota or the "unlimited" sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewLimitOption {
    Limited(i64),
    Unlimited,
}

impl ViewLimitOption {
    pub fn parse(input: &str) -> Result<Self, String> {
        let input = input.trim();
        if input.eq_ignore_ascii_case("unlimited") {
            return Ok(Self::Unlimited);
        }

        match input.parse::<i64>() {
            Ok(n) if n > 0 => Ok(Self::Limited(n)),
            _ => Err(format!(
                "Invalid view limit '{}'. Expected a positive number or 'unlimited'",
                input
            )),
        }
    }

    pub fn as_limit(&self) -> Option<i64> {
        match self {
            Self::Limited(n) => Some(*n),
            Self::Unlimited => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_expiration_options() {
        assert_eq!(ExpirationOption::parse("5m").unwrap(), ExpirationOption::FiveMinutes);
        assert_eq!(ExpirationOption::parse(" 1h ").unwrap(), ExpirationOption::OneHour);
        assert_eq!(ExpirationOption::parse("1d").unwrap(), ExpirationOption::OneDay);
        assert_eq!(ExpirationOption::parse("1w").unwrap(), ExpirationOption::OneWeek);
        assert_eq!(ExpirationOption::parse("never").unwrap(), ExpirationOption::Never);
        assert!(ExpirationOption::parse("2h").is_err());
        assert!(ExpirationOption::parse("").is_err());
    }

    #[test]
    fn test_expires_at_offsets() {
        let now = Utc::now();
        let at = ExpirationOption::FiveMinutes.expires_at(now).unwrap();
        assert_eq!((at - now).num_minutes(), 5);

        let at = ExpirationOption::OneWeek.expires_at(now).unwrap();
        assert_eq!((at - now).num_days(), 7);

        assert!(ExpirationOption::Never.expires_at(now).is_none());
    }

    #[test]
    fn test_parse_view_limit() {
        assert_eq!(ViewLimitOption::parse("1").unwrap(), ViewLimitOption::Limited(1));
        assert_eq!(ViewLimitOption::parse("100").unwrap(), ViewLimitOption::Limited(100));
        assert_eq!(ViewLimitOption::parse("unlimited").unwrap(), ViewLimitOption::Unlimited);
        assert_eq!(ViewLimitOption::parse("UNLIMITED").unwrap(), ViewLimitOption::Unlimited);
        assert!(ViewLimitOption::parse("0").is_err());
        assert!(ViewLimitOption::parse("-3").is_err());
        assert!(ViewLimitOption::parse("many").is_err());
    }
}
