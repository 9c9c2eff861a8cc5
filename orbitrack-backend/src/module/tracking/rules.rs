///! Ordered first-match rule tables
///!
///! Categories, countries and agencies are all assigned by walking a static
///! table top to bottom and taking the outcome of the first rule with any
///! matching pattern. Keyword matching is case-insensitive substring search.
use super::category::Category;
use super::types::CatalogId;

/// What a rule is evaluated against
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subject {
    name: String,
    catalog_id: CatalogId,
    category: Option<Category>,
}

impl Subject {
    pub fn new(name: &str, catalog_id: CatalogId) -> Self {
        Self {
            name: name.to_lowercase(),
            catalog_id,
            category: None,
        }
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    pub fn contains(&self, keyword: &str) -> bool {
        self.name.contains(keyword)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pattern {
    CatalogId(CatalogId),
    /// Lowercase substring of the name
    Keyword(&'static str),
    /// Every keyword must be present
    AllOf(&'static [&'static str]),
    InCategory(Category),
}

impl Pattern {
    pub fn matches(&self, subject: &Subject) -> bool {
        match self {
            Pattern::CatalogId(id) => subject.catalog_id == *id,
            Pattern::Keyword(keyword) => subject.contains(keyword),
            Pattern::AllOf(keywords) => keywords.iter().all(|k| subject.contains(k)),
            Pattern::InCategory(category) => subject.category == Some(*category),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Rule<T: 'static> {
    pub outcome: T,
    pub patterns: &'static [Pattern],
}

impl<T> Rule<T> {
    pub fn matches(&self, subject: &Subject) -> bool {
        self.patterns.iter().any(|pattern| pattern.matches(subject))
    }
}

pub fn first_match<T: Copy>(rules: &[Rule<T>], subject: &Subject) -> Option<T> {
    rules
        .iter()
        .find(|rule| rule.matches(subject))
        .map(|rule| rule.outcome)
}
