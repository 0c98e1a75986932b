//! Serde form for persisted dates: RFC 3339 in UTC with exactly three
//! fractional digits, so stored strings sort and range-compare in time order.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serializer};

pub fn format(date: &DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub fn serialize<S>(date: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&format(date))
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    DateTime::<Utc>::deserialize(deserializer)
}

pub mod option {
    use super::*;

    pub fn serialize<S>(date: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match date {
            Some(date) => serializer.serialize_some(&format(date)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<DateTime<Utc>>::deserialize(deserializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use serde::Serialize;

    #[derive(Serialize, Deserialize)]
    struct Stamped {
        #[serde(with = "super")]
        at: DateTime<Utc>,
        #[serde(default, with = "super::option")]
        seen: Option<DateTime<Utc>>,
    }

    #[test]
    fn test_fixed_width_strings_sort_in_time_order() {
        let whole = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let half = whole + Duration::milliseconds(500);
        let micros = whole + Duration::microseconds(1);

        assert_eq!(format(&whole), "2024-06-01T00:00:00.000Z");
        assert_eq!(format(&half), "2024-06-01T00:00:00.500Z");
        assert_eq!(format(&whole).len(), format(&half).len());
        assert!(format(&half) > format(&whole));
        assert!(format(&micros) >= format(&whole));
    }

    #[test]
    fn test_accepts_any_rfc3339_input() {
        let parsed: Stamped =
            serde_json::from_str(r#"{"at":"2024-06-01T02:00:00+02:00"}"#).unwrap();
        assert_eq!(parsed.at, Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap());
        assert!(parsed.seen.is_none());

        let json = serde_json::to_value(&parsed).unwrap();
        assert_eq!(json["at"], "2024-06-01T00:00:00.000Z");
        assert!(json["seen"].is_null());
    }
}
