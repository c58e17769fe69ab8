//! Static menu table.

use serde::Serialize;
use utoipa::ToSchema;

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct CatalogItem {
    pub id: String,
    pub category: String,
    pub name: String,
    pub description: String,
    /// Whole naira, no minor units.
    pub unit_price: i64,
    pub image: Option<String>,
}

impl CatalogItem {
    pub fn new(
        id: impl Into<String>,
        category: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        unit_price: i64,
    ) -> Self {
        Self {
            id: id.into(),
            category: category.into(),
            name: name.into(),
            description: description.into(),
            unit_price,
            image: None,
        }
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }
}

/// Read-only menu, built once at startup and shared through application state.
#[derive(Debug, Clone)]
pub struct Catalog {
    items: Vec<CatalogItem>,
}

impl Catalog {
    pub fn new(items: Vec<CatalogItem>) -> Self {
        Self { items }
    }

    /// The café's current product range.
    pub fn bubulizer() -> Self {
        Self::new(vec![
            CatalogItem::new(
                "alcoholic-bitters",
                "Herbal Tea",
                "BUBULIZER Alcoholic Bitters",
                "Herbal alcoholic bitters (200ml). 18+ Drink responsibly.",
                1200,
            )
            .with_image("static/BUBULIZER_Alcoholic Bitters.jpeg"),
            CatalogItem::new(
                "bridelia-tea",
                "Herbal Tea",
                "BUBULIZER Bridelia Tea",
                "Bridelia tea – detox & immune support (50g).",
                1500,
            )
            .with_image("static/BUBULIZER_Bridelia tea.jpeg"),
            CatalogItem::new(
                "small-leaf-tea",
                "Herbal Tea",
                "BUBULIZER Small Leaf Tea",
                "Small leaf (stone breaker) tea – kidney wellness (50g).",
                1500,
            )
            .with_image("static/BUBULIZER_Small leaf.jpeg"),
            CatalogItem::new(
                "banga-soup-spice",
                "Spices",
                "BUBULIZER Banga Soup Spice",
                "Nutmeg, guinea plum, scent leaves, liquorice mix – perfect for Banga soup.",
                1000,
            )
            .with_image("static/BUBULIZER_Banga spice.jpeg"),
            CatalogItem::new(
                "pepper-soup-spice",
                "Spices",
                "BUBULIZER Pepper Soup Spice",
                "Calabash nutmeg, Aidan fruit, spice tree – for chicken, fish, beef.",
                1000,
            )
            .with_image("static/BUBULIZER_Pepper soup spice.jpeg"),
        ])
    }

    /// Looks up an item by id.
    ///
    /// Fails with [`AppError::UnknownItem`] rather than falling back to a default.
    pub fn get(&self, item_id: &str) -> AppResult<&CatalogItem> {
        self.items
            .iter()
            .find(|item| item.id == item_id)
            .ok_or_else(|| AppError::UnknownItem(item_id.to_string()))
    }

    pub fn items(&self) -> &[CatalogItem] {
        &self.items
    }

    pub fn in_category<'a>(&'a self, category: &'a str) -> impl Iterator<Item = &'a CatalogItem> {
        self.items.iter().filter(move |item| item.category == category)
    }

    /// Distinct categories, sorted.
    pub fn categories(&self) -> Vec<&str> {
        let mut categories: Vec<&str> = self.items.iter().map(|i| i.category.as_str()).collect();
        categories.sort_unstable();
        categories.dedup();
        categories
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_finds_known_item() {
        let catalog = Catalog::bubulizer();
        let item = catalog.get("bridelia-tea").unwrap();
        assert_eq!(item.unit_price, 1500);
        assert_eq!(item.category, "Herbal Tea");
    }

    #[test]
    fn lookup_rejects_unknown_item() {
        let catalog = Catalog::bubulizer();
        let err = catalog.get("espresso").unwrap_err();
        assert!(matches!(err, AppError::UnknownItem(id) if id == "espresso"));
    }

    #[test]
    fn categories_are_sorted_and_distinct() {
        let catalog = Catalog::bubulizer();
        assert_eq!(catalog.categories(), vec!["Herbal Tea", "Spices"]);
        assert_eq!(catalog.in_category("Spices").count(), 2);
    }
}
