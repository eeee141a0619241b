//! CSS selectors for eBay pages.
//!
//! Update this file when eBay changes its HTML structure.

/// Selectors for the landing page.
pub mod home {
    /// Search box candidates, tried in order. The first present one wins.
    pub const SEARCH_INPUT: [&str; 5] = [
        "input#gh-ac",
        "input[name='_nkw']",
        "input.search-box",
        "input[type='text']",
        "input[placeholder='Buscar artículos']",
    ];
}

/// Selectors for search results pages.
pub mod results {
    /// Result item container.
    pub const ITEM: &str = ".s-item";

    /// Listing title, scoped to an item.
    pub const TITLE: &str = ".s-item__title";

    /// Price text, scoped to an item.
    pub const PRICE: &str = ".s-item__price";

    /// Sales/hotness indicator, scoped to an item.
    pub const SALES: &str = ".s-item__hotness";

    /// Pagination "next" control.
    pub const NEXT_PAGE: &str = ".pagination__next";

    /// Class token marking the next control as inactive.
    pub const DISABLED_CLASS: &str = "disabled";
}

/// Selector for the document title, used in diagnostics.
pub const PAGE_TITLE: &str = "title";
