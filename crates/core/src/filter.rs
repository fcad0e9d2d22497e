use crate::product::Product;

/// Apply the category and search filters to the full product list.
///
/// The category filter is an exact match; the search query matches
/// case-insensitively as a substring of the title or the description.
/// The filters compose conjunctively and input order is preserved.
/// `None` category and an empty query each mean "no filter".
pub fn visible_products(products: &[Product], category: Option<&str>, query: &str) -> Vec<Product> {
    let needle = query.to_lowercase();

    products
        .iter()
        .filter(|p| category.is_none_or(|c| p.category == c))
        .filter(|p| {
            needle.is_empty()
                || p.title.to_lowercase().contains(&needle)
                || p.description.to_lowercase().contains(&needle)
        })
        .cloned()
        .collect()
}
