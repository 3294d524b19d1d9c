//! Trip advice from weather at both ends and the local time of day

use chrono::{DateTime, FixedOffset, Offset, Timelike, Utc};

pub const DELAY_MESSAGE: &str = "Consider delaying your trip due to bad weather.";
pub const GOOD_TIME_MESSAGE: &str = "Good time to start your trip!";

const BAD_WEATHER_CONDITIONS: [&str; 4] = ["rain", "snow", "storm", "thunderstorm"];

/// BC local time, fixed UTC-8 without DST
const PACIFIC_OFFSET_SECONDS: i32 = 8 * 3600;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advice {
    BadWeather,
    LateHour,
    GoodTime,
}

impl Advice {
    /// Text shown to the user.
    ///
    /// `LateHour` shares the bad-weather wording, so the two reasons look the
    /// same on the page even though callers can tell them apart here.
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            Advice::BadWeather | Advice::LateHour => DELAY_MESSAGE,
            Advice::GoodTime => GOOD_TIME_MESSAGE,
        }
    }
}

impl std::fmt::Display for Advice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

/// Case-insensitive substring match against the bad-weather keywords
#[must_use]
pub fn is_bad_weather(description: &str) -> bool {
    let description = description.to_lowercase();
    BAD_WEATHER_CONDITIONS
        .iter()
        .any(|condition| description.contains(condition))
}

/// 23:00 through 04:59
#[must_use]
pub fn is_late_hour(hour: u32) -> bool {
    hour >= 23 || hour <= 4
}

/// Weather is checked before the hour
#[must_use]
pub fn travel_advice(
    start_description: &str,
    end_description: &str,
    now: DateTime<FixedOffset>,
) -> Advice {
    if is_bad_weather(start_description) || is_bad_weather(end_description) {
        Advice::BadWeather
    } else if is_late_hour(now.hour()) {
        Advice::LateHour
    } else {
        Advice::GoodTime
    }
}

#[must_use]
pub fn pacific_offset() -> FixedOffset {
    FixedOffset::west_opt(PACIFIC_OFFSET_SECONDS).unwrap_or_else(|| Utc.fix())
}

/// Current time at UTC-8
#[must_use]
pub fn pacific_now() -> DateTime<FixedOffset> {
    Utc::now().with_timezone(&pacific_offset())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;

    fn at_hour(hour: u32) -> DateTime<FixedOffset> {
        pacific_offset()
            .with_ymd_and_hms(2024, 3, 15, hour, 30, 0)
            .unwrap()
    }

    #[rstest]
    #[case("light rain", "clear sky", 10, Advice::BadWeather)]
    #[case("clear sky", "Heavy SNOW", 12, Advice::BadWeather)]
    #[case("thunderstorm with rain", "clear sky", 2, Advice::BadWeather)]
    #[case("clear", "clear", 2, Advice::LateHour)]
    #[case("clear", "clear", 23, Advice::LateHour)]
    #[case("clear", "clear", 0, Advice::LateHour)]
    #[case("clear", "clear", 4, Advice::LateHour)]
    #[case("clear", "clear", 5, Advice::GoodTime)]
    #[case("clear", "clear", 10, Advice::GoodTime)]
    #[case("clear", "clear", 22, Advice::GoodTime)]
    #[case("", "", 14, Advice::GoodTime)]
    fn test_travel_advice(
        #[case] start: &str,
        #[case] end: &str,
        #[case] hour: u32,
        #[case] expected: Advice,
    ) {
        assert_eq!(travel_advice(start, end, at_hour(hour)), expected);
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            travel_advice("light rain", "clear", at_hour(10)).message(),
            "Consider delaying your trip due to bad weather."
        );
        assert_eq!(
            travel_advice("clear", "clear", at_hour(2)).message(),
            "Consider delaying your trip due to bad weather."
        );
        assert_eq!(
            travel_advice("clear", "clear", at_hour(10)).message(),
            "Good time to start your trip!"
        );
    }

    #[test]
    fn test_pacific_now_offset() {
        let now = pacific_now();
        assert_eq!(now.offset().local_minus_utc(), -8 * 3600);
    }

    #[test]
    fn test_hour_is_taken_in_local_time() {
        // 10:00 UTC is 02:00 in UTC-8
        let utc = Utc.with_ymd_and_hms(2024, 3, 15, 10, 0, 0).unwrap();
        let local = utc.with_timezone(&pacific_offset());
        assert_eq!(travel_advice("clear", "clear", local), Advice::LateHour);
    }
}
