// Oberon packed date/time decoding
// Date: bits 15-9: year since 1900, bits 8-5: month, bits 4-0: day
// Time: bits 15-11: hours, bits 10-5: minutes, bits 4-0: seconds/2
//
// Field values are not range checked. Out-of-range values carry over the
// way calendar arithmetic does: month 13 is January of the next year, day 0
// is the last day of the previous month, hour 24 is midnight of the next day.

use super::constants::YEAR_BASE;
use chrono::{DateTime, Duration, Local, Months, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};

/// Raw fields of a packed date/time pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateTimeFields {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
}

impl DateTimeFields {
    pub fn unpack(date: u16, time: u16) -> Self {
        Self {
            year: YEAR_BASE + i32::from((date >> 9) & 0x7F),
            month: u32::from((date >> 5) & 0x0F),
            day: u32::from(date & 0x1F),
            hour: u32::from((time >> 11) & 0x1F),
            minute: u32::from((time >> 5) & 0x3F),
            // The lowest seconds bit is not stored on floppies
            second: u32::from(time & 0x1F) * 2,
        }
    }

    /// Calendar date/time without a zone, normalizing out-of-range fields
    pub fn to_naive(&self) -> Option<NaiveDateTime> {
        let first_of_year = NaiveDate::from_ymd_opt(self.year, 1, 1)?;
        let month_start = match self.month {
            0 => first_of_year.checked_sub_months(Months::new(1))?,
            m => first_of_year.checked_add_months(Months::new(m - 1))?,
        };
        let date = month_start.checked_add_signed(Duration::days(i64::from(self.day) - 1))?;

        let offset = Duration::hours(i64::from(self.hour))
            + Duration::minutes(i64::from(self.minute))
            + Duration::seconds(i64::from(self.second));
        NaiveDateTime::new(date, NaiveTime::from_hms_opt(0, 0, 0)?).checked_add_signed(offset)
    }
}

/// Decode a packed pair to a calendar timestamp in the local timezone
pub fn oberon_datetime_to_local(date: u16, time: u16) -> Option<DateTime<Local>> {
    let naive = DateTimeFields::unpack(date, time).to_naive()?;
    naive_to_local(&naive)
}

fn naive_to_local(naive: &NaiveDateTime) -> Option<DateTime<Local>> {
    // A wall-clock time skipped by a DST transition moves forward past the gap
    Local
        .from_local_datetime(naive)
        .earliest()
        .or_else(|| Local.from_local_datetime(&(*naive + Duration::hours(1))).earliest())
}
