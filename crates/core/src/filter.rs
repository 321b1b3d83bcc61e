//! Filter criteria and the catalog predicate they define.
//!
//! Every field is independently optional. An empty string or `None` means the
//! field places no constraint; the effective predicate is the AND of every
//! field that is set.

use serde::{Deserialize, Serialize};

use crate::types::Product;

/// User-selected constraints narrowing the catalog view.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterCriteria {
    /// Case-insensitive substring of title or description.
    pub search_query: String,
    /// Inclusive lower price bound.
    pub min_price: Option<f64>,
    /// Inclusive upper price bound. A bound of zero places no constraint.
    pub max_price: Option<f64>,
    /// Exact category name.
    pub category: String,
    /// Case-insensitive substring of title, description or category.
    pub keyword: String,
}

impl FilterCriteria {
    /// Whether no field constrains the catalog.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.search_query.is_empty()
            && self.min_price.is_none()
            && self.max_price.is_none()
            && self.category.is_empty()
            && self.keyword.is_empty()
    }

    /// Whether `product` satisfies every set field.
    ///
    /// Predicates run in a fixed order: search text, lower bound, upper bound,
    /// category, keyword.
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        self.matches_search(product)
            && self.matches_min_price(product)
            && self.matches_max_price(product)
            && self.matches_category(product)
            && self.matches_keyword(product)
    }

    /// The products satisfying every set field, in their original order.
    #[must_use]
    pub fn apply<'a>(&self, products: &'a [Product]) -> Vec<&'a Product> {
        products.iter().filter(|p| self.matches(p)).collect()
    }

    fn matches_search(&self, product: &Product) -> bool {
        if self.search_query.is_empty() {
            return true;
        }
        let needle = self.search_query.to_lowercase();
        contains_folded(&product.title, &needle) || contains_folded(&product.description, &needle)
    }

    fn matches_min_price(&self, product: &Product) -> bool {
        self.min_price.is_none_or(|min| product.price >= min)
    }

    fn matches_max_price(&self, product: &Product) -> bool {
        match self.max_price {
            Some(max) if max > 0.0 => product.price <= max,
            _ => true,
        }
    }

    fn matches_category(&self, product: &Product) -> bool {
        self.category.is_empty() || product.category == self.category
    }

    fn matches_keyword(&self, product: &Product) -> bool {
        if self.keyword.is_empty() {
            return true;
        }
        let needle = self.keyword.to_lowercase();
        contains_folded(&product.title, &needle)
            || contains_folded(&product.description, &needle)
            || contains_folded(&product.category, &needle)
    }
}

/// `haystack` contains the already-lowercased `needle`, ignoring case.
fn contains_folded(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::product::fixtures::product;

    fn with_description(mut product: Product, description: &str) -> Product {
        product.description = description.to_string();
        product
    }

    fn titles(products: &[&Product]) -> Vec<String> {
        products.iter().map(|p| p.title.clone()).collect()
    }

    #[test]
    fn test_empty_criteria_matches_everything() {
        let products = vec![
            product(1, "Desk", 120.0, "furniture"),
            product(2, "Lamp", 30.0, "home-decoration"),
        ];
        let criteria = FilterCriteria::default();

        assert!(criteria.is_empty());
        assert_eq!(criteria.apply(&products).len(), 2);
    }

    #[test]
    fn test_search_matches_title_or_description() {
        let products = vec![
            with_description(product(1, "Smartphone X", 699.0, "smartphones"), "latest phone"),
            product(2, "Desk", 120.0, "furniture"),
        ];
        let criteria = FilterCriteria {
            search_query: "phone".to_string(),
            ..FilterCriteria::default()
        };

        assert_eq!(titles(&criteria.apply(&products)), vec!["Smartphone X"]);
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let products = vec![with_description(
            product(1, "Lamp", 30.0, "home-decoration"),
            "A warm LED light",
        )];
        let criteria = FilterCriteria {
            search_query: "led".to_string(),
            ..FilterCriteria::default()
        };

        assert_eq!(criteria.apply(&products).len(), 1);
    }

    #[test]
    fn test_search_ignores_category() {
        let products = vec![product(1, "Lamp", 30.0, "lighting")];
        let criteria = FilterCriteria {
            search_query: "lighting".to_string(),
            ..FilterCriteria::default()
        };

        assert!(criteria.apply(&products).is_empty());
    }

    #[test]
    fn test_price_bounds_are_inclusive() {
        let products = vec![
            product(1, "Cheap", 10.0, "misc"),
            product(2, "Edge Low", 50.0, "misc"),
            product(3, "Middle", 75.0, "misc"),
            product(4, "Edge High", 100.0, "misc"),
            product(5, "Pricey", 150.0, "misc"),
        ];
        let criteria = FilterCriteria {
            min_price: Some(50.0),
            max_price: Some(100.0),
            ..FilterCriteria::default()
        };

        assert_eq!(
            titles(&criteria.apply(&products)),
            vec!["Edge Low", "Middle", "Edge High"]
        );
    }

    #[test]
    fn test_max_below_min_yields_nothing() {
        let products = vec![product(1, "Middle", 75.0, "misc")];
        let criteria = FilterCriteria {
            min_price: Some(100.0),
            max_price: Some(50.0),
            ..FilterCriteria::default()
        };

        assert!(criteria.apply(&products).is_empty());
    }

    #[test]
    fn test_zero_max_price_is_no_constraint() {
        let products = vec![product(1, "Pricey", 150.0, "misc")];
        let criteria = FilterCriteria {
            min_price: Some(0.0),
            max_price: Some(0.0),
            ..FilterCriteria::default()
        };

        assert_eq!(criteria.apply(&products).len(), 1);
    }

    #[test]
    fn test_category_is_exact_match() {
        let products = vec![
            product(1, "Shirt", 20.0, "mens-shirts"),
            product(2, "Blouse", 25.0, "womens-shirts"),
        ];
        let criteria = FilterCriteria {
            category: "shirts".to_string(),
            ..FilterCriteria::default()
        };
        assert!(criteria.apply(&products).is_empty());

        let criteria = FilterCriteria {
            category: "mens-shirts".to_string(),
            ..FilterCriteria::default()
        };
        assert_eq!(titles(&criteria.apply(&products)), vec!["Shirt"]);
    }

    #[test]
    fn test_keyword_matches_category_too() {
        let products = vec![
            product(1, "Galaxy S10", 699.0, "smartphones"),
            product(2, "Desk", 120.0, "furniture"),
        ];
        let criteria = FilterCriteria {
            keyword: "Smartphone".to_string(),
            ..FilterCriteria::default()
        };

        assert_eq!(titles(&criteria.apply(&products)), vec!["Galaxy S10"]);
    }

    #[test]
    fn test_all_fields_combine_with_and() {
        let products = vec![
            with_description(product(1, "Apple Watch", 299.0, "mens-watches"), "smart watch"),
            with_description(product(2, "Rolex", 9_000.0, "mens-watches"), "luxury watch"),
            with_description(product(3, "Apple Pie", 5.0, "groceries"), "dessert"),
        ];
        let criteria = FilterCriteria {
            search_query: "apple".to_string(),
            min_price: Some(100.0),
            max_price: Some(1_000.0),
            category: "mens-watches".to_string(),
            keyword: "watch".to_string(),
        };

        assert_eq!(titles(&criteria.apply(&products)), vec!["Apple Watch"]);
    }

    #[test]
    fn test_result_is_independent_of_list_order() {
        let mut products = vec![
            product(1, "Alpha Phone", 10.0, "smartphones"),
            product(2, "Beta Desk", 20.0, "furniture"),
            product(3, "Gamma Phone", 30.0, "smartphones"),
            product(4, "Delta Phone", 400.0, "smartphones"),
        ];
        let criteria = FilterCriteria {
            search_query: "phone".to_string(),
            max_price: Some(100.0),
            ..FilterCriteria::default()
        };

        let mut forward: Vec<u32> = criteria
            .apply(&products)
            .iter()
            .map(|p| p.id.as_u32())
            .collect();
        products.reverse();
        let mut backward: Vec<u32> = criteria
            .apply(&products)
            .iter()
            .map(|p| p.id.as_u32())
            .collect();

        forward.sort_unstable();
        backward.sort_unstable();
        assert_eq!(forward, vec![1, 3]);
        assert_eq!(forward, backward);
    }
}
