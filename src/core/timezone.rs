use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};

/// Hours Brasília lags behind UTC. Brazil has not observed DST since 2019.
const BRASILIA_UTC_LAG_HOURS: i64 = 3;

/// Start of a calendar day in Brasília, as a UTC timestamp
///
/// Used when a caller reports a payment by date only.
pub fn brasilia_start_of_day(date: NaiveDate) -> DateTime<Utc> {
    let utc_midnight = Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN));
    utc_midnight + Duration::hours(BRASILIA_UTC_LAG_HOURS)
}

/// Current calendar date in Brasília
pub fn brasilia_today() -> NaiveDate {
    (Utc::now() - Duration::hours(BRASILIA_UTC_LAG_HOURS)).date_naive()
}
