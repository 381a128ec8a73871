//! Issue date extraction for UAE invoices.

use chrono::NaiveDate;
use regex::Captures;

use crate::models::fields::{DateFormat, InvoiceDate};

use super::patterns::{
    DATE_DAY_MONTH_NAME, DATE_DMY, DATE_LABEL, DATE_MONTH_NAME_DAY, DATE_YMD,
};
use super::{FieldExtractor, first_match};

/// Date field extractor.
///
/// A labeled date (`Date: ...`, `Invoice Date: ...`) is preferred; otherwise
/// the first date anywhere in the text is taken. Within either scope the
/// layouts are tried in a fixed order and the first match wins.
pub struct DateExtractor;

impl DateExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Rest of the line after the first date label that is not a due date.
    fn labeled_window(text: &str) -> Option<&str> {
        DATE_LABEL.captures_iter(text).find_map(|caps| {
            let label = caps.get(0)?;
            let preceding = text[..label.start()].trim_end();
            if ends_with_word(preceding, "due") || ends_with_word(preceding, "expiry") {
                return None;
            }
            caps.get(1).map(|m| m.as_str())
        })
    }

    fn dmy(text: &str) -> Option<InvoiceDate> {
        DATE_DMY.captures(text).map(|caps| {
            build(&caps, DateFormat::DayMonthYear, |c| {
                ymd(&c[3], month_number(&c[2]), &c[1])
            })
        })
    }

    fn ymd(text: &str) -> Option<InvoiceDate> {
        DATE_YMD.captures(text).map(|caps| {
            build(&caps, DateFormat::YearMonthDay, |c| {
                ymd(&c[1], month_number(&c[2]), &c[3])
            })
        })
    }

    fn day_month_name(text: &str) -> Option<InvoiceDate> {
        DATE_DAY_MONTH_NAME.captures(text).map(|caps| {
            build(&caps, DateFormat::DayMonthName, |c| {
                ymd(&c[3], month_name_to_number(&c[2]), &c[1])
            })
        })
    }

    fn month_name_day(text: &str) -> Option<InvoiceDate> {
        DATE_MONTH_NAME_DAY.captures(text).map(|caps| {
            build(&caps, DateFormat::MonthNameDay, |c| {
                ymd(&c[3], month_name_to_number(&c[1]), &c[2])
            })
        })
    }

    fn any_layout(text: &str) -> Option<InvoiceDate> {
        first_match::<InvoiceDate>(
            text,
            &[
                &Self::dmy,
                &Self::ymd,
                &Self::day_month_name,
                &Self::month_name_day,
            ],
        )
    }
}

impl Default for DateExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for DateExtractor {
    type Output = InvoiceDate;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        Self::labeled_window(text)
            .and_then(Self::any_layout)
            .or_else(|| Self::any_layout(text))
    }
}

/// Case-insensitive suffix check that only looks at the tail of `s`.
fn ends_with_word(s: &str, word: &str) -> bool {
    s.len()
        .checked_sub(word.len())
        .and_then(|start| s.get(start..))
        .is_some_and(|tail| tail.eq_ignore_ascii_case(word))
}

fn build(
    caps: &Captures<'_>,
    format: DateFormat,
    parse: impl Fn(&Captures<'_>) -> Option<NaiveDate>,
) -> InvoiceDate {
    InvoiceDate {
        raw: caps[0].to_string(),
        format,
        parsed: parse(caps),
    }
}

fn ymd(year: &str, month: Option<u32>, day: &str) -> Option<NaiveDate> {
    let year: i32 = year.parse().ok()?;
    let day: u32 = day.parse().ok()?;
    NaiveDate::from_ymd_opt(year, month?, day)
}

fn month_number(s: &str) -> Option<u32> {
    s.parse().ok()
}

fn month_name_to_number(month: &str) -> Option<u32> {
    let month = month.to_lowercase();
    let number = match month.get(..3)? {
        "jan" => 1,
        "feb" => 2,
        "mar" => 3,
        "apr" => 4,
        "may" => 5,
        "jun" => 6,
        "jul" => 7,
        "aug" => 8,
        "sep" => 9,
        "oct" => 10,
        "nov" => 11,
        "dec" => 12,
        _ => return None,
    };
    Some(number)
}
