//! Selector-based item counting
//!
//! Default exhaustion input for fetchers that return raw markup without an
//! explicit item count.

use scraper::{Html, Selector};

use crate::error::PagerError;

/// Count elements matching `selector` in a markup fragment
pub fn count_items(markup: &str, selector: &str) -> Result<usize, PagerError> {
    let selector = Selector::parse(selector)
        .map_err(|e| PagerError::Configuration(format!("invalid result selector: {e}")))?;
    let fragment = Html::parse_fragment(markup);
    Ok(fragment.select(&selector).count())
}
