//! Two-pattern address matcher: the product collection, or one product by id.

use inventory_contract::{CONTENT_AUTHORITY, CONTENT_SCHEME, PATH_PRODUCTS};
use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressMatch {
    /// `content://xyz.kbalto.inventory/products`
    Collection,
    /// `content://xyz.kbalto.inventory/products/<id>`, id > 0
    Item(i64),
}

pub fn match_address(address: &Url) -> Option<AddressMatch> {
    if address.scheme() != CONTENT_SCHEME
        || address.host_str() != Some(CONTENT_AUTHORITY)
        || address.port().is_some()
        || !address.username().is_empty()
        || address.query().is_some()
        || address.fragment().is_some()
    {
        return None;
    }

    let mut segments = address.path_segments()?;
    if segments.next()? != PATH_PRODUCTS {
        return None;
    }

    match (segments.next(), segments.next()) {
        (None, _) => Some(AddressMatch::Collection),
        (Some(id), None) => parse_positive_id(id).map(AddressMatch::Item),
        _ => None,
    }
}

fn parse_positive_id(segment: &str) -> Option<i64> {
    if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    segment.parse::<i64>().ok().filter(|id| *id > 0)
}
