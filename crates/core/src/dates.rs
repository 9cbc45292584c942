use chrono::{DateTime, Datelike, Local, Locale};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub const DEFAULT_LOCALE: &str = "en-US";

/// Region used for a bare language tag whose region code differs from the
/// language code.
const DEFAULT_REGIONS: &[(&str, &str)] = &[
    ("ar", "EG"),
    ("be", "BY"),
    ("ca", "ES"),
    ("cs", "CZ"),
    ("da", "DK"),
    ("el", "GR"),
    ("en", "US"),
    ("et", "EE"),
    ("fa", "IR"),
    ("he", "IL"),
    ("hi", "IN"),
    ("hy", "AM"),
    ("ja", "JP"),
    ("ka", "GE"),
    ("kk", "KZ"),
    ("ko", "KR"),
    ("ms", "MY"),
    ("nb", "NO"),
    ("sl", "SI"),
    ("sq", "AL"),
    ("sr", "RS"),
    ("sv", "SE"),
    ("uk", "UA"),
    ("vi", "VN"),
    ("zh", "CN"),
];

/// One of the fixed date layouts that can be substituted for `{date}`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum DateFormat {
    DayShortMonthYear,
    DayLongMonthYear,
    DayMonthShortYear,
    #[default]
    MonthDayShortYear,
    ShortMonthDayYear,
    LongMonthDayYear,
    ShortYearMonthDay,
    YearMonthDayUnderscored,
    YearMonthDay,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Unknown date format \"{0}\"")]
pub struct UnknownDateFormat(pub String);

impl DateFormat {
    pub const ALL: [DateFormat; 9] = [
        DateFormat::DayShortMonthYear,
        DateFormat::DayLongMonthYear,
        DateFormat::DayMonthShortYear,
        DateFormat::MonthDayShortYear,
        DateFormat::ShortMonthDayYear,
        DateFormat::LongMonthDayYear,
        DateFormat::ShortYearMonthDay,
        DateFormat::YearMonthDayUnderscored,
        DateFormat::YearMonthDay,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            DateFormat::DayShortMonthYear => "DD_MMM_YYYY",
            DateFormat::DayLongMonthYear => "DD_MMMM_YYYY",
            DateFormat::DayMonthShortYear => "DDMMYY",
            DateFormat::MonthDayShortYear => "MMDDYY",
            DateFormat::ShortMonthDayYear => "MMM_DD_YYYY",
            DateFormat::LongMonthDayYear => "MMMM_DD_YYYY",
            DateFormat::ShortYearMonthDay => "YYMMDD",
            DateFormat::YearMonthDayUnderscored => "YYYY_MM_DD",
            DateFormat::YearMonthDay => "YYYYMMDD",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            DateFormat::DayShortMonthYear => "Day with abbreviated month",
            DateFormat::DayLongMonthYear => "Day with full month",
            DateFormat::DayMonthShortYear => "Day-Month-Year (2 digits each)",
            DateFormat::MonthDayShortYear => "Month-Day-Year (2 digits each)",
            DateFormat::ShortMonthDayYear => "Abbreviated month name",
            DateFormat::LongMonthDayYear => "Full month name",
            DateFormat::ShortYearMonthDay => "Year-Month-Day (2 digits each)",
            DateFormat::YearMonthDayUnderscored => "ISO-like format with underscores",
            DateFormat::YearMonthDay => "Full Year-Month-Day",
        }
    }

    /// Rendering of 2024-01-15 in `en-US`.
    pub fn example(self) -> &'static str {
        match self {
            DateFormat::DayShortMonthYear => "15_Jan_2024",
            DateFormat::DayLongMonthYear => "15_January_2024",
            DateFormat::DayMonthShortYear => "150124",
            DateFormat::MonthDayShortYear => "011524",
            DateFormat::ShortMonthDayYear => "Jan_15_2024",
            DateFormat::LongMonthDayYear => "January_15_2024",
            DateFormat::ShortYearMonthDay => "240115",
            DateFormat::YearMonthDayUnderscored => "2024_01_15",
            DateFormat::YearMonthDay => "20240115",
        }
    }

    pub fn render(self, timestamp: &DateTime<Local>, locale: &str) -> String {
        let fields = DateFields::new(timestamp, resolve_locale(locale));
        let DateFields {
            day,
            month,
            short_year,
            full_year,
            month_short,
            month_long,
        } = fields;

        match self {
            DateFormat::DayShortMonthYear => format!("{day}_{month_short}_{full_year}"),
            DateFormat::DayLongMonthYear => format!("{day}_{month_long}_{full_year}"),
            DateFormat::DayMonthShortYear => format!("{day}{month}{short_year}"),
            DateFormat::MonthDayShortYear => format!("{month}{day}{short_year}"),
            DateFormat::ShortMonthDayYear => format!("{month_short}_{day}_{full_year}"),
            DateFormat::LongMonthDayYear => format!("{month_long}_{day}_{full_year}"),
            DateFormat::ShortYearMonthDay => format!("{short_year}{month}{day}"),
            DateFormat::YearMonthDayUnderscored => format!("{full_year}_{month}_{day}"),
            DateFormat::YearMonthDay => format!("{full_year}{month}{day}"),
        }
    }
}

impl FromStr for DateFormat {
    type Err = UnknownDateFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DateFormat::ALL
            .into_iter()
            .find(|format| format.as_str() == s)
            .ok_or_else(|| UnknownDateFormat(s.to_string()))
    }
}

impl fmt::Display for DateFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Formats `timestamp` with the layout named by `format`.
///
/// An unrecognised identifier renders with the default `MMDDYY` layout
/// instead of failing.
pub fn format_date(timestamp: &DateTime<Local>, format: &str, locale: &str) -> String {
    format
        .parse::<DateFormat>()
        .unwrap_or_default()
        .render(timestamp, locale)
}

struct DateFields {
    day: String,
    month: String,
    short_year: String,
    full_year: String,
    month_short: String,
    month_long: String,
}

impl DateFields {
    fn new(timestamp: &DateTime<Local>, locale: Locale) -> Self {
        let year = timestamp.year();
        Self {
            day: format!("{:02}", timestamp.day()),
            month: format!("{:02}", timestamp.month()),
            short_year: format!("{:02}", year.rem_euclid(100)),
            full_year: format!("{:04}", year),
            month_short: timestamp.format_localized("%b", locale).to_string(),
            month_long: timestamp.format_localized("%B", locale).to_string(),
        }
    }
}

/// Maps tags like `en-US`, `fr_fr` or `de` onto the locale table.
fn resolve_locale(tag: &str) -> Locale {
    let normalized = normalize_locale_tag(tag);
    if let Ok(locale) = Locale::try_from(normalized.as_str()) {
        return locale;
    }

    if !normalized.contains('_') {
        let region = DEFAULT_REGIONS
            .iter()
            .find(|(language, _)| *language == normalized)
            .map(|(_, region)| region.to_string())
            .unwrap_or_else(|| normalized.to_ascii_uppercase());
        let guessed = format!("{normalized}_{region}");
        if let Ok(locale) = Locale::try_from(guessed.as_str()) {
            return locale;
        }
    }

    log::warn!("unknown locale {tag:?}, month names fall back to en_US");
    Locale::en_US
}

/// `zh-Hant-TW` becomes `zh_TW`: script subtags are dropped.
fn normalize_locale_tag(tag: &str) -> String {
    let mut pieces = tag.trim().split(['-', '_']);
    let language = pieces.next().unwrap_or_default().to_ascii_lowercase();
    let mut pieces = pieces.skip_while(|piece| is_script_subtag(piece));
    match pieces.next() {
        Some(region) if region.len() == 2 => {
            format!("{}_{}", language, region.to_ascii_uppercase())
        }
        Some(region) => format!("{language}_{region}"),
        None => language,
    }
}

fn is_script_subtag(piece: &str) -> bool {
    piece.len() == 4 && piece.chars().all(|c| c.is_ascii_alphabetic())
}
