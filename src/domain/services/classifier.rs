use crate::domain::ports::CategoryClassifier;
use serde::{Deserialize, Serialize};

/// A category and the substrings (case-insensitive) that select it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifierRule {
    pub category: String,
    pub patterns: Vec<String>,
}

impl ClassifierRule {
    pub fn new(category: &str, patterns: &[&str]) -> Self {
        Self {
            category: category.to_string(),
            patterns: patterns.iter().map(|p| p.to_lowercase()).collect(),
        }
    }

    fn matches(&self, lowered: &str) -> bool {
        self.patterns
            .iter()
            .any(|pattern| lowered.contains(&pattern.to_lowercase()))
    }
}

/// Ordered substring rules; earlier rules win.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RuleClassifier {
    rules: Vec<ClassifierRule>,
}

impl RuleClassifier {
    pub fn new(rules: Vec<ClassifierRule>) -> Self {
        Self { rules }
    }

    /// Organizer domains, in the priority the roster templates expect.
    pub fn domains() -> Self {
        Self::new(vec![
            ClassifierRule::new("design", &["design"]),
            ClassifierRule::new("tech", &["tech"]),
            ClassifierRule::new("spons", &["sponsorship", "spons"]),
            ClassifierRule::new("pr", &["media", "pr", "public relations"]),
            ClassifierRule::new("em", &["event", "em"]),
            ClassifierRule::new("doc", &["doc"]),
            ClassifierRule::new("vigyaan", &["vigyaan"]),
        ])
    }

    /// Merchandise designs offered on the order form.
    pub fn designs() -> Self {
        Self::new(vec![
            ClassifierRule::new("Technocracy", &["technocracy"]),
            ClassifierRule::new("Dharma", &["dharma"]),
            ClassifierRule::new("Abyss", &["abyss", "conquering"]),
        ])
    }

    pub fn rules(&self) -> &[ClassifierRule] {
        &self.rules
    }
}

impl CategoryClassifier for RuleClassifier {
    fn categories(&self) -> Vec<&str> {
        self.rules.iter().map(|rule| rule.category.as_str()).collect()
    }

    fn classify(&self, text: &str) -> Option<&str> {
        let lowered = text.to_lowercase();
        self.rules
            .iter()
            .find(|rule| rule.matches(&lowered))
            .map(|rule| rule.category.as_str())
    }

    fn classify_all(&self, text: &str) -> Vec<&str> {
        let lowered = text.to_lowercase();
        self.rules
            .iter()
            .filter(|rule| rule.matches(&lowered))
            .map(|rule| rule.category.as_str())
            .collect()
    }
}

/// TRUE/FALSE flag per category, with only the classified one set.
pub fn category_flags<C: CategoryClassifier + ?Sized>(classifier: &C, text: &str) -> Vec<&'static str> {
    let selected = classifier.classify(text);
    classifier
        .categories()
        .into_iter()
        .map(|category| if Some(category) == selected { "TRUE" } else { "FALSE" })
        .collect()
}
