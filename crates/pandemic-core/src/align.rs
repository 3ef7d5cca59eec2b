use crate::model::Dated;
use chrono::NaiveDate;

/// Two series cut to a common last date.
#[derive(Debug, Clone, PartialEq)]
pub struct Aligned<A, B> {
    pub left: Vec<A>,
    pub right: Vec<B>,
    /// `min(max(left), max(right), cutoff)`, computed before truncation.
    pub limit: NaiveDate,
}

/// Latest date of a series; `None` when it is empty.
pub fn last_date<T: Dated>(series: &[T]) -> Option<NaiveDate> {
    series.iter().map(Dated::date).max()
}

/// Earliest date of a series; `None` when it is empty.
pub fn first_date<T: Dated>(series: &[T]) -> Option<NaiveDate> {
    series.iter().map(Dated::date).min()
}

/// Smallest of `cutoff` and every present maximum. Absent maxima (empty series) are skipped.
pub fn limit<I>(maxima: I, cutoff: NaiveDate) -> NaiveDate
where
    I: IntoIterator<Item = Option<NaiveDate>>,
{
    maxima.into_iter().flatten().fold(cutoff, std::cmp::min)
}

/// Keep the rows dated on or before `limit`, preserving order.
pub fn truncate<T: Dated + Clone>(series: &[T], limit: NaiveDate) -> Vec<T> {
    series
        .iter()
        .filter(|row| row.date() <= limit)
        .cloned()
        .collect()
}

/// Truncate both series to `min(max(a), max(b), cutoff)`.
///
/// Each side is cut independently, so the two outputs end on their own last date at or
/// before the limit.
pub fn align<A, B>(a: &[A], b: &[B], cutoff: NaiveDate) -> Aligned<A, B>
where
    A: Dated + Clone,
    B: Dated + Clone,
{
    let limit = limit([last_date(a), last_date(b)], cutoff);
    Aligned {
        left: truncate(a, limit),
        right: truncate(b, limit),
        limit,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Row(NaiveDate);

    impl Dated for Row {
        fn date(&self) -> NaiveDate {
            self.0
        }
    }

    fn day(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn rows(days: &[&str]) -> Vec<Row> {
        days.iter().map(|d| Row(day(d))).collect()
    }

    #[test]
    fn cuts_to_shortest_series() {
        let a = rows(&["2020-03-01", "2020-03-02", "2020-03-03", "2020-03-04"]);
        let b = rows(&["2020-03-01", "2020-03-03"]);
        let aligned = align(&a, &b, day("2022-07-08"));
        assert_eq!(aligned.limit, day("2020-03-03"));
        assert_eq!(aligned.left.len(), 3);
        assert_eq!(aligned.right.len(), 2);
    }

    #[test]
    fn cutoff_wins_when_earlier() {
        let a = rows(&["2020-03-01", "2020-03-05"]);
        let b = rows(&["2020-03-02", "2020-03-06"]);
        let aligned = align(&a, &b, day("2020-03-03"));
        assert_eq!(aligned.limit, day("2020-03-03"));
        assert_eq!(aligned.left, rows(&["2020-03-01"]));
        assert_eq!(aligned.right, rows(&["2020-03-02"]));
    }

    #[test]
    fn outputs_may_end_on_different_dates() {
        let a = rows(&["2020-03-01", "2020-03-04"]);
        let b = rows(&["2020-03-02", "2020-03-03", "2020-03-05"]);
        let aligned = align(&a, &b, day("2022-07-08"));
        assert_eq!(aligned.limit, day("2020-03-04"));
        assert_eq!(aligned.left.last(), Some(&Row(day("2020-03-04"))));
        assert_eq!(aligned.right.last(), Some(&Row(day("2020-03-03"))));
    }

    #[test]
    fn empty_series_is_left_out_of_the_limit() {
        let a = rows(&["2020-03-01", "2020-03-02"]);
        let b: Vec<Row> = Vec::new();
        let aligned = align(&a, &b, day("2022-07-08"));
        assert_eq!(aligned.limit, day("2020-03-02"));
        assert_eq!(aligned.left.len(), 2);
        assert!(aligned.right.is_empty());
    }

    #[test]
    fn both_empty_falls_back_to_cutoff() {
        let empty: Vec<Row> = Vec::new();
        let aligned = align(&empty, &empty, day("2022-07-08"));
        assert_eq!(aligned.limit, day("2022-07-08"));
        assert!(aligned.left.is_empty() && aligned.right.is_empty());
    }

    #[test]
    fn nothing_survives_past_the_limit() {
        let a = rows(&["2020-01-01", "2020-06-01", "2021-01-01", "2023-01-01"]);
        let b = rows(&["2020-02-01", "2021-06-01", "2022-12-01"]);
        for cutoff in ["2019-12-31", "2020-06-01", "2021-03-01", "2024-01-01"] {
            let aligned = align(&a, &b, day(cutoff));
            let bound = limit([last_date(&a), last_date(&b)], day(cutoff));
            assert!(aligned.left.iter().all(|r| r.0 <= bound));
            assert!(aligned.right.iter().all(|r| r.0 <= bound));
        }
    }
}
