/*
[INPUT]:  User-typed stock codes, optional date range, look-back years
[OUTPUT]: Validated QueryParams and the QueryRequest sent to the service
[POS]:    Submission input layer - local validation before any request
[UPDATE]: When code formats or query limits change
*/

use chrono::NaiveDate;
use std::fmt;
use std::str::FromStr;
use stock_fetch_adapter::QueryRequest;
use thiserror::Error;

pub const MIN_YEARS: u32 = 1;
pub const MAX_YEARS: u32 = 30;
pub const DEFAULT_YEARS: u32 = 3;
const MAX_CODES_LEN: usize = 5000;
const DATE_FORMAT: &str = "%Y%m%d";

/// Submission parameters rejected before anything is sent
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("add at least one stock code")]
    NoCodes,
    #[error("invalid stock code: {0}")]
    InvalidCode(String),
    #[error("too many stock codes ({len} characters, limit {limit})")]
    TooManyCodes { len: usize, limit: usize },
    #[error("years must be between 1 and 30, got {0}")]
    YearsOutOfRange(u32),
    #[error("start date {start} is after end date {end}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },
    #[error("invalid date {0}, expected YYYYMMDD or YYYY-MM-DD")]
    InvalidDate(String),
}

/// Exchange-suffixed A-share code such as `600519.SH`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StockCode(String);

impl StockCode {
    /// Normalize user input
    ///
    /// Six digits with a `.SH`/`.SZ` suffix are kept; bare six digits get
    /// `.SH` when they start with 6 or 9 and `.SZ` otherwise.
    pub fn normalize(raw: &str) -> Result<Self, ValidationError> {
        let code = raw.trim().to_uppercase();
        let invalid = || ValidationError::InvalidCode(raw.trim().to_string());

        let (digits, suffix) = match code.split_once('.') {
            Some((digits, suffix @ ("SH" | "SZ"))) => (digits, Some(suffix)),
            Some(_) => return Err(invalid()),
            None => (code.as_str(), None),
        };
        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }

        let suffix = suffix.unwrap_or(if digits.starts_with(['6', '9']) { "SH" } else { "SZ" });
        Ok(Self(format!("{digits}.{suffix}")))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for StockCode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::normalize(s)
    }
}

impl fmt::Display for StockCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Parse `YYYYMMDD` or `YYYY-MM-DD`
pub fn parse_date(raw: &str) -> Result<NaiveDate, ValidationError> {
    let compact = raw.trim().replace('-', "");
    NaiveDate::parse_from_str(&compact, DATE_FORMAT)
        .map_err(|_| ValidationError::InvalidDate(raw.trim().to_string()))
}

/// Parameters of one fetch task
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryParams {
    pub codes: Vec<StockCode>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub years: u32,
}

impl Default for QueryParams {
    fn default() -> Self {
        Self {
            codes: Vec::new(),
            start_date: None,
            end_date: None,
            years: DEFAULT_YEARS,
        }
    }
}

impl QueryParams {
    /// Parse a comma/whitespace separated code list, dropping duplicates
    pub fn parse_codes(input: &str) -> Result<Vec<StockCode>, ValidationError> {
        let mut codes: Vec<StockCode> = Vec::new();
        for raw in input
            .split(|c: char| c == ',' || c == '，' || c.is_whitespace())
            .filter(|part| !part.is_empty())
        {
            let code = StockCode::normalize(raw)?;
            if !codes.contains(&code) {
                codes.push(code);
            }
        }
        Ok(codes)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.codes.is_empty() {
            return Err(ValidationError::NoCodes);
        }
        let len = self.joined_codes().len();
        if len > MAX_CODES_LEN {
            return Err(ValidationError::TooManyCodes {
                len,
                limit: MAX_CODES_LEN,
            });
        }
        if !(MIN_YEARS..=MAX_YEARS).contains(&self.years) {
            return Err(ValidationError::YearsOutOfRange(self.years));
        }
        if let (Some(start), Some(end)) = (self.start_date, self.end_date)
            && start > end
        {
            return Err(ValidationError::InvalidDateRange { start, end });
        }
        Ok(())
    }

    /// Validate and build the wire request
    pub fn to_request(&self) -> Result<QueryRequest, ValidationError> {
        self.validate()?;
        Ok(QueryRequest {
            codes: self.joined_codes(),
            start_date: self.start_date.map(|d| d.format(DATE_FORMAT).to_string()),
            end_date: self.end_date.map(|d| d.format(DATE_FORMAT).to_string()),
            years: self.years,
        })
    }

    fn joined_codes(&self) -> String {
        self.codes
            .iter()
            .map(StockCode::as_str)
            .collect::<Vec<_>>()
            .join(",")
    }
}
