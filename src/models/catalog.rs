use serde::Serialize;

/// Donation source ("Safeway", "Food for Neighbors", ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Source {
    pub id: i64,
    pub name: String,
}

/// Food category. Displayed by `sort_order`, not by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub sort_order: i64,
}

pub const DEFAULT_SOURCES: [&str; 7] = [
    "Food for Neighbors",
    "Trader Joe's",
    "Whole Foods",
    "Wegmans",
    "Safeway",
    "Good Shepherd donations",
    "FreshFarm St John Neumann",
];

/// Seed categories, in display order.
pub const DEFAULT_CATEGORIES: [&str; 7] = [
    "Produce", "Dry", "Dairy", "Meat", "Prepared", "Bread", "Non-Food",
];
