//! Voucher number formatting.
//!
//! Voucher numbers look like `JV-20250606-0001`: a prefix, the posting date
//! and the per-date sequence zero-padded to four digits. The sequence itself
//! is allocated by the repository from a per-date counter row.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;

use crate::error::LedgerError;

/// Prefix of journal voucher numbers.
pub const VOUCHER_PREFIX: &str = "JV";

/// Highest per-date sequence that fits the four-digit field.
pub const MAX_SEQ: u32 = 9999;

/// Parsed voucher number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VoucherNo {
    /// Posting date encoded in the number.
    pub date: NaiveDate,
    /// 1-based sequence within the date.
    pub seq: u32,
}

impl VoucherNo {
    /// Creates a voucher number.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for a zero sequence and `SequenceExhausted`
    /// past [`MAX_SEQ`].
    pub fn new(date: NaiveDate, seq: u32) -> Result<Self, LedgerError> {
        if seq == 0 {
            return Err(LedgerError::InvalidInput(
                "voucher sequence starts at 1".into(),
            ));
        }
        if seq > MAX_SEQ {
            return Err(LedgerError::SequenceExhausted { date, max: MAX_SEQ });
        }
        Ok(Self { date, seq })
    }

    /// Renders the number with another document prefix, e.g. `TI`.
    #[must_use]
    pub fn with_prefix(&self, prefix: &str) -> String {
        format!("{prefix}-{}-{:04}", self.date.format("%Y%m%d"), self.seq)
    }
}

impl fmt::Display for VoucherNo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.with_prefix(VOUCHER_PREFIX))
    }
}

impl FromStr for VoucherNo {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || LedgerError::InvalidInput(format!("malformed voucher number '{s}'"));

        let mut parts = s.splitn(3, '-');
        let (Some(prefix), Some(date), Some(seq)) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(invalid());
        };
        if prefix != VOUCHER_PREFIX || date.len() != 8 || seq.len() != 4 {
            return Err(invalid());
        }

        let date = NaiveDate::parse_from_str(date, "%Y%m%d").map_err(|_| invalid())?;
        let seq = seq.parse::<u32>().map_err(|_| invalid())?;
        Self::new(date, seq).map_err(|_| invalid())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_format_pads_to_four_digits() {
        let format = |seq| VoucherNo::new(date(2025, 6, 6), seq).unwrap().to_string();
        assert_eq!(format(1), "JV-20250606-0001");
        assert_eq!(format(42), "JV-20250606-0042");
        assert_eq!(format(MAX_SEQ), "JV-20250606-9999");
    }

    #[test]
    fn test_sequence_past_four_digits_is_exhausted() {
        let err = VoucherNo::new(date(2025, 12, 31), MAX_SEQ + 1).unwrap_err();
        assert!(matches!(err, LedgerError::SequenceExhausted { max: MAX_SEQ, .. }));
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_parse_round_trip() {
        let no: VoucherNo = "JV-20250606-0002".parse().unwrap();
        assert_eq!(no.date, date(2025, 6, 6));
        assert_eq!(no.seq, 2);
        assert_eq!(no.with_prefix("TI"), "TI-20250606-0002");
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for bad in [
            "",
            "JV-20250606",
            "TI-20250606-0001",
            "JV-2025066-0001",
            "JV-20251301-0001",
            "JV-20250606-1",
            "JV-20250606-0000",
            "JV-20250606-00x1",
            "JV-20250606-10000",
        ] {
            assert!(bad.parse::<VoucherNo>().is_err(), "{bad} should not parse");
        }
    }
}
