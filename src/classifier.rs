use crate::results::PullRequest;
use crate::taxonomy::{ScanOrder, Taxonomy};

/// Outcome of classifying a single pull request.
///
/// Indices refer to declaration positions in the taxonomy the classifier was
/// built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Classification {
    Category { category: usize },
    Subcategory { category: usize, subcategory: usize },
    Unclassified,
}

/// Keyword classifier over a taxonomy.
///
/// Matching is plain substring containment on the lowercased
/// `title + " " + body` text. Categories are scanned in the configured
/// [`ScanOrder`] and the first keyword found decides the outcome.
#[derive(Debug, Clone)]
pub struct Classifier<'a> {
    taxonomy: &'a Taxonomy,
    order: ScanOrder,
    category_order: Vec<usize>,
    subcategory_order: Vec<Vec<usize>>,
}

impl<'a> Classifier<'a> {
    /// Create a classifier scanning in the taxonomy's default order
    pub fn new(taxonomy: &'a Taxonomy) -> Self {
        Self::with_order(taxonomy, taxonomy.default_scan_order())
    }

    /// Create a classifier with an explicit scan order.
    ///
    /// Keywords are compared case-insensitively and blank keywords never
    /// match, so a taxonomy that skipped [`Taxonomy::validated`] still
    /// classifies the same way.
    pub fn with_order(taxonomy: &'a Taxonomy, order: ScanOrder) -> Self {
        let (category_order, subcategory_order) = match taxonomy {
            Taxonomy::Flat { categories } => {
                let names: Vec<&str> = categories.iter().map(|c| c.name.as_str()).collect();
                (scan_indices(&names, order), Vec::new())
            }
            Taxonomy::Tiered { categories } => {
                let names: Vec<&str> = categories.iter().map(|c| c.name.as_str()).collect();
                let subs = categories
                    .iter()
                    .map(|c| {
                        let sub_names: Vec<&str> =
                            c.subcategories.iter().map(|s| s.name.as_str()).collect();
                        scan_indices(&sub_names, order)
                    })
                    .collect();
                (scan_indices(&names, order), subs)
            }
        };

        Self {
            taxonomy,
            order,
            category_order,
            subcategory_order,
        }
    }

    pub fn taxonomy(&self) -> &'a Taxonomy {
        self.taxonomy
    }

    pub fn order(&self) -> ScanOrder {
        self.order
    }

    /// Classify a title and optional body
    pub fn classify(&self, title: &str, body: Option<&str>) -> Classification {
        let text = combined_text(title, body);

        match self.taxonomy {
            Taxonomy::Flat { categories } => {
                for &ci in &self.category_order {
                    let category = &categories[ci];
                    if let Some(keyword) = first_match(&text, &category.keywords) {
                        ::log::trace!("Matched '{}' -> {}", keyword, category.name);
                        return Classification::Category { category: ci };
                    }
                }
            }
            Taxonomy::Tiered { categories } => {
                for &ci in &self.category_order {
                    let category = &categories[ci];
                    for &si in &self.subcategory_order[ci] {
                        let sub = &category.subcategories[si];
                        if let Some(keyword) = first_match(&text, &sub.keywords) {
                            ::log::trace!(
                                "Matched '{}' -> {} / {}",
                                keyword,
                                category.name,
                                sub.name
                            );
                            return Classification::Subcategory {
                                category: ci,
                                subcategory: si,
                            };
                        }
                    }
                }
            }
        }

        Classification::Unclassified
    }

    /// Classify a pull request by its title and body
    pub fn classify_pr(&self, pr: &PullRequest) -> Classification {
        self.classify(&pr.title, pr.body.as_deref())
    }

    /// Category and sub-category names for a classification
    pub fn names(&self, classification: Classification) -> Option<(&'a str, Option<&'a str>)> {
        match (self.taxonomy, classification) {
            (Taxonomy::Flat { categories }, Classification::Category { category }) => categories
                .get(category)
                .map(|c| (c.name.as_str(), None)),
            (
                Taxonomy::Tiered { categories },
                Classification::Subcategory {
                    category,
                    subcategory,
                },
            ) => categories.get(category).and_then(|c| {
                c.subcategories
                    .get(subcategory)
                    .map(|s| (c.name.as_str(), Some(s.name.as_str())))
            }),
            _ => None,
        }
    }
}

/// Classify with the taxonomy's default scan order and return the names
pub fn categorize<'a>(
    title: &str,
    body: Option<&str>,
    taxonomy: &'a Taxonomy,
) -> Option<(&'a str, Option<&'a str>)> {
    let classifier = Classifier::new(taxonomy);
    let classification = classifier.classify(title, body);
    classifier.names(classification)
}

/// The lowercased text keywords are matched against
pub fn combined_text(title: &str, body: Option<&str>) -> String {
    format!("{} {}", title, body.unwrap_or("")).to_lowercase()
}

fn first_match<'k>(text: &str, keywords: &'k [String]) -> Option<&'k str> {
    keywords
        .iter()
        .map(String::as_str)
        .filter(|kw| !kw.trim().is_empty())
        .find(|kw| {
            if kw.chars().any(char::is_uppercase) {
                text.contains(kw.to_lowercase().as_str())
            } else {
                text.contains(kw)
            }
        })
}

fn scan_indices(names: &[&str], order: ScanOrder) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..names.len()).collect();
    if order == ScanOrder::Lexicographic {
        indices.sort_by(|&a, &b| names[a].cmp(names[b]));
    }
    indices
}
