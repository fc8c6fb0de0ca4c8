//! Keyword rules that bucket a transaction description into a [`Category`].
//!
//! Rules are evaluated top to bottom and the first match wins, so more
//! specific buckets sit above generic ones. A description no rule claims
//! falls through to [`Category::Other`].

use crate::schema::Category;

#[derive(Debug, Clone, Copy)]
pub struct CategoryRule {
    pub category: Category,
    pub keywords: &'static [&'static str],
}

impl CategoryRule {
    /// `description_lower` must already be lowercased.
    pub fn matches(&self, description_lower: &str) -> bool {
        self.keywords.iter().any(|k| description_lower.contains(k))
    }
}

pub const CATEGORY_RULES: &[CategoryRule] = &[
    CategoryRule {
        category: Category::Salary,
        keywords: &["salary", "income", "payment received"],
    },
    CategoryRule {
        category: Category::Rent,
        keywords: &["rent", "housing", "apartment"],
    },
    CategoryRule {
        category: Category::Groceries,
        keywords: &["grocery", "groceries", "dmart", "big bazaar", "supermarket"],
    },
    CategoryRule {
        category: Category::Food,
        keywords: &[
            "restaurant",
            "food",
            "zomato",
            "swiggy",
            "cafe",
            "starbucks",
            "coffee",
        ],
    },
    CategoryRule {
        category: Category::Transport,
        keywords: &["uber", "ola", "petrol", "fuel", "transport", "metro", "bus"],
    },
    CategoryRule {
        category: Category::Utilities,
        keywords: &["electric", "utility", "water", "gas", "bill"],
    },
    CategoryRule {
        category: Category::Entertainment,
        keywords: &["netflix", "movie", "entertainment", "spotify", "amazon prime"],
    },
    CategoryRule {
        category: Category::Healthcare,
        keywords: &["hospital", "pharmacy", "medical", "health", "doctor"],
    },
];

/// Returns the rule that claims `description`, if any.
pub fn matching_rule(description: &str) -> Option<&'static CategoryRule> {
    let lower = description.to_lowercase();
    CATEGORY_RULES.iter().find(|rule| rule.matches(&lower))
}

pub fn categorize(description: &str) -> Category {
    matching_rule(description)
        .map(|rule| rule.category)
        .unwrap_or(Category::Other)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule_for(category: Category) -> &'static CategoryRule {
        CATEGORY_RULES
            .iter()
            .find(|r| r.category == category)
            .unwrap()
    }

    #[test]
    fn test_every_rule_claims_its_own_keywords() {
        for rule in CATEGORY_RULES {
            for keyword in rule.keywords {
                assert!(rule.matches(keyword), "{} should match {}", rule.category, keyword);
            }
        }
    }

    #[test]
    fn test_rule_order_is_the_documented_priority() {
        let order: Vec<Category> = CATEGORY_RULES.iter().map(|r| r.category).collect();
        assert_eq!(
            order,
            vec![
                Category::Salary,
                Category::Rent,
                Category::Groceries,
                Category::Food,
                Category::Transport,
                Category::Utilities,
                Category::Entertainment,
                Category::Healthcare,
            ]
        );
    }

    #[test]
    fn test_first_matching_rule_wins() {
        // "Salary" outranks "Transport" even though "bus" also appears
        assert_eq!(categorize("Salary credit - bus company"), Category::Salary);
        // "Rent" outranks "Utilities" for "rent and water bill"
        assert_eq!(categorize("Rent and water bill"), Category::Rent);
        // Groceries sit above Food: "supermarket food court"
        assert_eq!(categorize("Supermarket food court"), Category::Groceries);
    }

    #[test]
    fn test_individual_rules() {
        assert!(rule_for(Category::Food).matches("zomato order"));
        assert!(rule_for(Category::Transport).matches("uber rides"));
        assert!(rule_for(Category::Utilities).matches("electricity bill"));
        assert!(rule_for(Category::Entertainment).matches("netflix subscription"));
        assert!(rule_for(Category::Healthcare).matches("pharmacy"));
        assert!(!rule_for(Category::Healthcare).matches("petrol"));
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(categorize("ZOMATO ORDER"), Category::Food);
        assert_eq!(categorize("Big Bazaar"), Category::Groceries);
        assert_eq!(categorize("Amazon Prime Video"), Category::Entertainment);
    }

    #[test]
    fn test_unmatched_falls_back_to_other() {
        assert_eq!(categorize("ATM withdrawal"), Category::Other);
        assert_eq!(categorize(""), Category::Other);
        assert!(matching_rule("Unknown").is_none());
    }
}
