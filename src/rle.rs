//! Run-length coding of 64-value scans
//!
//! A scan is stored as `(count, value)` pairs, one per maximal run of equal
//! consecutive values. The counts of a well-formed scan sum to exactly 64.

use std::fmt;

use crate::consts::DCTSIZE2;

/// One run of identical values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Run {
    /// Number of repetitions (1..=64)
    pub count: u8,
    /// Repeated value
    pub value: i16,
}

impl Run {
    #[inline]
    pub const fn new(count: u8, value: i16) -> Self {
        Self { count, value }
    }
}

/// Reason a run sequence could not be decoded
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunError {
    /// A loose entry had neither one nor two elements
    EntryShape { len: usize },
    /// A run of length zero
    ZeroCount,
    /// A count that does not fit in a single block
    CountOutOfRange { count: i64 },
    /// A value outside the i16 range
    ValueOutOfRange { value: i64 },
    /// Counts that do not add up to one block
    WrongTotal { total: usize },
}

impl fmt::Display for RunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunError::EntryShape { len } => {
                write!(f, "entry has {} elements, expected (count, value) or (value)", len)
            }
            RunError::ZeroCount => write!(f, "run of length zero"),
            RunError::CountOutOfRange { count } => {
                write!(f, "run count {} out of range 1..={}", count, DCTSIZE2)
            }
            RunError::ValueOutOfRange { value } => {
                write!(f, "value {} does not fit in 16 bits", value)
            }
            RunError::WrongTotal { total } => {
                write!(f, "run counts sum to {}, expected {}", total, DCTSIZE2)
            }
        }
    }
}

impl std::error::Error for RunError {}

/// Parse a loose entry: `[count, value]` or a bare `[value]` (a run of one)
impl TryFrom<&[i64]> for Run {
    type Error = RunError;

    fn try_from(entry: &[i64]) -> Result<Self, Self::Error> {
        let (count, value) = match *entry {
            [count, value] => (count, value),
            [value] => (1, value),
            _ => return Err(RunError::EntryShape { len: entry.len() }),
        };
        if count == 0 {
            return Err(RunError::ZeroCount);
        }
        let count = u8::try_from(count)
            .ok()
            .filter(|&c| c as usize <= DCTSIZE2)
            .ok_or(RunError::CountOutOfRange { count })?;
        let value = i16::try_from(value).map_err(|_| RunError::ValueOutOfRange { value })?;
        Ok(Run::new(count, value))
    }
}

/// Encode a scan as maximal runs, left to right
pub fn encode_runs(scan: &[i16; DCTSIZE2]) -> Vec<Run> {
    let mut runs = Vec::new();
    let mut current = scan[0];
    let mut count = 1u8;

    for &value in &scan[1..] {
        if value == current {
            count += 1;
        } else {
            runs.push(Run::new(count, current));
            current = value;
            count = 1;
        }
    }
    runs.push(Run::new(count, current));

    runs
}

/// Expand runs back into a 64-value scan
pub fn decode_runs(runs: &[Run]) -> Result<[i16; DCTSIZE2], RunError> {
    let total: usize = runs.iter().map(|r| r.count as usize).sum();
    if total != DCTSIZE2 {
        return Err(RunError::WrongTotal { total });
    }

    let mut scan = [0i16; DCTSIZE2];
    let mut pos = 0;
    for run in runs {
        if run.count == 0 {
            return Err(RunError::ZeroCount);
        }
        let end = pos + run.count as usize;
        scan[pos..end].fill(run.value);
        pos = end;
    }

    Ok(scan)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_scan_is_one_run() {
        let runs = encode_runs(&[7i16; DCTSIZE2]);
        assert_eq!(runs, vec![Run::new(64, 7)]);
    }

    #[test]
    fn test_runs_split_on_change() {
        let mut scan = [0i16; DCTSIZE2];
        scan[0] = 5;
        scan[1] = 5;
        scan[2] = -3;
        let runs = encode_runs(&scan);
        assert_eq!(runs, vec![Run::new(2, 5), Run::new(1, -3), Run::new(61, 0)]);
    }

    #[test]
    fn test_decode_inverts_encode() {
        let mut scan = [0i16; DCTSIZE2];
        for (i, v) in scan.iter_mut().enumerate() {
            *v = ((i / 3) % 4) as i16 - 2;
        }
        let runs = encode_runs(&scan);
        assert_eq!(runs.iter().map(|r| r.count as usize).sum::<usize>(), DCTSIZE2);
        assert_eq!(decode_runs(&runs).unwrap(), scan);
    }

    #[test]
    fn test_alternating_scan_is_worst_case() {
        let mut scan = [0i16; DCTSIZE2];
        for (i, v) in scan.iter_mut().enumerate() {
            *v = (i % 2) as i16;
        }
        assert_eq!(encode_runs(&scan).len(), DCTSIZE2);
    }

    #[test]
    fn test_decode_rejects_wrong_total() {
        let err = decode_runs(&[Run::new(60, 0)]).unwrap_err();
        assert_eq!(err, RunError::WrongTotal { total: 60 });
        let err = decode_runs(&[Run::new(64, 0), Run::new(1, 0)]).unwrap_err();
        assert_eq!(err, RunError::WrongTotal { total: 65 });
    }

    #[test]
    fn test_decode_rejects_zero_count() {
        let err = decode_runs(&[Run::new(0, 1), Run::new(64, 0)]).unwrap_err();
        assert_eq!(err, RunError::ZeroCount);
    }

    #[test]
    fn test_loose_entries() {
        assert_eq!(Run::try_from(&[3i64, -2][..]), Ok(Run::new(3, -2)));
        assert_eq!(Run::try_from(&[9i64][..]), Ok(Run::new(1, 9)));
        assert_eq!(
            Run::try_from(&[1i64, 2, 3][..]),
            Err(RunError::EntryShape { len: 3 })
        );
        assert_eq!(Run::try_from(&[0i64; 0][..]), Err(RunError::EntryShape { len: 0 }));
        assert_eq!(
            Run::try_from(&[65i64, 0][..]),
            Err(RunError::CountOutOfRange { count: 65 })
        );
        assert_eq!(
            Run::try_from(&[-1i64, 0][..]),
            Err(RunError::CountOutOfRange { count: -1 })
        );
        assert_eq!(
            Run::try_from(&[1i64, 40_000][..]),
            Err(RunError::ValueOutOfRange { value: 40_000 })
        );
    }
}
