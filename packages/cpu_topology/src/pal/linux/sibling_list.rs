//! Reads the Linux cpulist format used by the processor lists in sysfs (`0-3,8,10-15:2`) as
//! contiguous ranges of processor IDs.

use std::ops::Range;

use itertools::Itertools;

use crate::ProcessorId;

/// Parses a cpulist into sorted, non-adjacent half-open ranges of processor IDs.
///
/// The trailing newline of sysfs files is ignored. An empty list is valid and returns no
/// ranges. `ProcessorId::MAX` has no half-open range and is dropped.
pub(crate) fn parse(contents: &str) -> Result<Vec<Range<ProcessorId>>, cpulist::Error> {
    let ids = cpulist::parse(contents.trim())?;

    Ok(ids
        .into_iter()
        .filter_map(|id| Some(id..id.checked_add(1)?))
        .coalesce(|previous, next| {
            if next.start == previous.end {
                Ok(previous.start..next.end)
            } else {
                Err((previous, next))
            }
        })
        .collect())
}

#[allow(clippy::arithmetic_side_effects, reason = "we need not worry in tests")]
#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn single_ids_and_ranges() {
        assert_eq!(parse("5").unwrap(), vec![5..6]);
        assert_eq!(parse("0-3").unwrap(), vec![0..4]);
        assert_eq!(parse("0-3,8,10-11").unwrap(), vec![0..4, 8..9, 10..12]);
    }

    #[test]
    fn split_group() {
        assert_eq!(parse("1,10-12").unwrap(), vec![1..2, 10..13]);
    }

    #[test]
    fn trailing_newline_and_empty() {
        assert_eq!(parse("0-1\n").unwrap(), vec![0..2]);
        assert!(parse("").unwrap().is_empty());
        assert!(parse("\n").unwrap().is_empty());
    }

    #[test]
    fn unordered_and_overlapping_are_merged() {
        assert_eq!(parse("8,0-3,2-5").unwrap(), vec![0..6, 8..9]);
        assert_eq!(parse("0,1,2,3").unwrap(), vec![0..4]);
    }

    #[test]
    fn stride() {
        assert_eq!(parse("0-6:2").unwrap(), vec![0..1, 2..3, 4..5, 6..7]);
        assert_eq!(parse("0-3:1").unwrap(), vec![0..4]);
        assert_eq!(parse("4-4:3").unwrap(), vec![4..5]);
    }

    #[test]
    fn largest_id() {
        let max = ProcessorId::MAX - 1;

        assert_eq!(parse(&max.to_string()).unwrap(), vec![max..ProcessorId::MAX]);
        assert!(parse(&ProcessorId::MAX.to_string()).unwrap().is_empty());
    }

    #[test]
    fn invalid_syntax_is_error() {
        parse("foo").unwrap_err();
        parse("1-foo").unwrap_err();
        parse("foo-1").unwrap_err();
        parse("3-1").unwrap_err();
        parse("1-4:0").unwrap_err();
        parse("1-4:x").unwrap_err();
        parse("-1").unwrap_err();
        parse(" 2 , 4 ").unwrap_err();
    }

    #[test]
    fn error_names_the_invalid_part() {
        let error = parse("0-3,7-5").unwrap_err();

        assert!(error.to_string().contains("7-5"));
    }
}
