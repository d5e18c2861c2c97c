//! The pair of timestamp strings a SigV4 signature is bound to.

use {
    crate::{
        constants::{DATE_STAMP_FORMAT, ISO8601_COMPACT_FORMAT},
        SignatureError,
    },
    chrono::{DateTime, Datelike, NaiveDate, Utc},
    lazy_static::lazy_static,
    regex::Regex,
    std::{
        fmt::{Display, Formatter, Result as FmtResult},
        str::FromStr,
    },
};

lazy_static! {
    /// Compact ISO 8601 timestamp in UTC, e.g. `20150830T123600Z`.
    static ref AMZ_DATE_REGEX: Regex = Regex::new(
        r"(?x)^
        (?P<year>\d{4})
        (?P<month>0[1-9]|1[0-2])
        (?P<day>0[1-9]|[12][0-9]|3[01])
        T
        (?P<hour>[01][0-9]|2[0-3])
        (?P<minute>[0-5][0-9])
        (?P<second>[0-5][0-9]|60)
        Z$").unwrap();

    /// Date stamp used in the credential scope, e.g. `20150830`.
    static ref DATE_STAMP_REGEX: Regex = Regex::new(r"^\d{8}$").unwrap();
}

/// The `x-amz-date` timestamp and the credential scope date stamp for a single signing call.
///
/// Both strings always describe the same UTC day; a pair that does not is rejected by
/// [`SigningDate::new`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SigningDate {
    /// `YYYYMMDD'T'HHMMSS'Z'`
    amz_date: String,

    /// `YYYYMMDD`
    date_stamp: String,
}

impl SigningDate {
    /// Create a `SigningDate` from precomputed `amz_date` (`YYYYMMDD'T'HHMMSS'Z'`) and `date_stamp`
    /// (`YYYYMMDD`) strings.
    ///
    /// # Errors
    /// Returns [`SignatureError::InvalidSigningDate`] if either string is malformed, names a day that does
    /// not exist, or if the two strings are not derived from the same day.
    pub fn new(amz_date: impl Into<String>, date_stamp: impl Into<String>) -> Result<Self, SignatureError> {
        let amz_date = amz_date.into();
        let date_stamp = date_stamp.into();

        let Some(cap) = AMZ_DATE_REGEX.captures(&amz_date) else {
            return Err(SignatureError::InvalidSigningDate(format!(
                "Date must be in ISO-8601 'basic format' (YYYYMMDD'T'HHMMSS'Z'). Got '{}'",
                amz_date
            )));
        };

        let year = i32::from_str(&cap["year"]).unwrap_or_default();
        let month = u32::from_str(&cap["month"]).unwrap_or_default();
        let day = u32::from_str(&cap["day"]).unwrap_or_default();
        if NaiveDate::from_ymd_opt(year, month, day).is_none() {
            return Err(SignatureError::InvalidSigningDate(format!("Date does not exist: {}", amz_date)));
        }

        if !DATE_STAMP_REGEX.is_match(&date_stamp) {
            return Err(SignatureError::InvalidSigningDate(format!(
                "Date stamp must be in YYYYMMDD format. Got '{}'",
                date_stamp
            )));
        }

        if amz_date[..8] != date_stamp {
            return Err(SignatureError::InvalidSigningDate(format!(
                "Date stamp '{}' does not match x-amz-date '{}'",
                date_stamp, amz_date
            )));
        }

        Ok(Self {
            amz_date,
            date_stamp,
        })
    }

    /// Derive both strings from a single instant.
    ///
    /// # Errors
    /// Returns [`SignatureError::InvalidSigningDate`] if the year does not fit in four digits.
    pub fn from_datetime(timestamp: DateTime<Utc>) -> Result<Self, SignatureError> {
        if !(0..=9999).contains(&timestamp.year()) {
            return Err(SignatureError::InvalidSigningDate(format!(
                "Year must be between 0000 and 9999. Got {}",
                timestamp.year()
            )));
        }

        Ok(Self {
            amz_date: timestamp.format(ISO8601_COMPACT_FORMAT).to_string(),
            date_stamp: timestamp.format(DATE_STAMP_FORMAT).to_string(),
        })
    }

    /// The timestamp in `YYYYMMDD'T'HHMMSS'Z'` format, sent as `x-amz-date`.
    #[inline]
    pub fn amz_date(&self) -> &str {
        &self.amz_date
    }

    /// The date in `YYYYMMDD` format, used in the credential scope.
    #[inline]
    pub fn date_stamp(&self) -> &str {
        &self.date_stamp
    }
}

impl TryFrom<DateTime<Utc>> for SigningDate {
    type Error = SignatureError;

    fn try_from(timestamp: DateTime<Utc>) -> Result<Self, Self::Error> {
        Self::from_datetime(timestamp)
    }
}

impl Display for SigningDate {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.amz_date)
    }
}
