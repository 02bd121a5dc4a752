pub mod form;
pub mod table;

use crate::error::NavigationError;
use scraper::{Html, Selector};

pub(crate) fn css(selector: &str) -> Result<Selector, NavigationError> {
    Selector::parse(selector).map_err(|_| NavigationError::InvalidSelector(selector.to_string()))
}

/// Whether anything on the page matches `selector`.
pub fn page_matches(html: &str, selector: &str) -> Result<bool, NavigationError> {
    let selector = css(selector)?;
    let document = Html::parse_document(html);
    Ok(document.select(&selector).next().is_some())
}
