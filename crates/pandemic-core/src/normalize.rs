use crate::model::{IndexedPriceBar, PriceBar};

/// Base value every indexed series starts from.
pub const BASE: f64 = 100.0;

/// Rescale a date-ordered series so that its first close reads exactly [`BASE`].
///
/// An empty series stays empty. The `close` of each bar is carried through untouched.
pub fn normalize(series: &[PriceBar]) -> Vec<IndexedPriceBar> {
    let Some(first) = series.first() else {
        return Vec::new();
    };
    let base_close = first.close;

    let mut indexed: Vec<IndexedPriceBar> = series
        .iter()
        .map(|bar| IndexedPriceBar {
            bar: bar.clone(),
            indexed_close: bar.close / base_close * BASE,
        })
        .collect();

    // remove rounding drift on the base row
    if let Some(first) = indexed.first_mut() {
        first.indexed_close = BASE;
    }

    indexed
}
