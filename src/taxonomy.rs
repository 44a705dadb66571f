use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

/// A category matched directly by its keywords
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlatCategory {
    pub name: String,
    pub keywords: Vec<String>,
}

/// A sub-category inside a tiered category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subcategory {
    pub name: String,
    pub keywords: Vec<String>,
}

/// A category broken down into sub-categories
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TieredCategory {
    pub name: String,
    pub subcategories: Vec<Subcategory>,
}

/// Category to keyword mapping, either flat or two levels deep.
///
/// Categories are kept as lists so declaration order survives a round trip
/// through JSON; the report is always rendered in that order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Taxonomy {
    Flat { categories: Vec<FlatCategory> },
    Tiered { categories: Vec<TieredCategory> },
}

/// Order in which categories (and sub-categories) are scanned for a match.
///
/// The first matching keyword wins, so this order is the tie-break when
/// keywords of several categories occur in the same text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanOrder {
    /// Declaration order
    Declared,
    /// Sorted by name, at both levels
    Lexicographic,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TaxonomyError {
    #[error("taxonomy has no categories")]
    Empty,

    #[error("duplicate category: {0}")]
    DuplicateCategory(String),

    #[error("duplicate sub-category '{subcategory}' in category '{category}'")]
    DuplicateSubcategory {
        category: String,
        subcategory: String,
    },

    #[error("category '{0}' has no sub-categories")]
    NoSubcategories(String),

    #[error("'{0}' has an empty keyword list")]
    NoKeywords(String),

    #[error("'{0}' has a blank keyword")]
    BlankKeyword(String),
}

impl Taxonomy {
    /// Scan order that matches the reports produced so far for this shape
    pub fn default_scan_order(&self) -> ScanOrder {
        match self {
            Taxonomy::Flat { .. } => ScanOrder::Declared,
            Taxonomy::Tiered { .. } => ScanOrder::Lexicographic,
        }
    }

    /// Category names in declaration order
    pub fn category_names(&self) -> Vec<&str> {
        match self {
            Taxonomy::Flat { categories } => categories.iter().map(|c| c.name.as_str()).collect(),
            Taxonomy::Tiered { categories } => {
                categories.iter().map(|c| c.name.as_str()).collect()
            }
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Taxonomy::Flat { categories } => categories.len(),
            Taxonomy::Tiered { categories } => categories.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Check the invariants and lowercase every keyword.
    ///
    /// Category names must be unique, sub-category names unique within their
    /// category, and every keyword list non-empty.
    pub fn validated(mut self) -> Result<Self, TaxonomyError> {
        if self.is_empty() {
            return Err(TaxonomyError::Empty);
        }

        let mut seen = HashSet::new();
        match &mut self {
            Taxonomy::Flat { categories } => {
                for category in categories.iter_mut() {
                    if !seen.insert(category.name.clone()) {
                        return Err(TaxonomyError::DuplicateCategory(category.name.clone()));
                    }
                    normalize_keywords(&category.name, &mut category.keywords)?;
                }
            }
            Taxonomy::Tiered { categories } => {
                for category in categories.iter_mut() {
                    if !seen.insert(category.name.clone()) {
                        return Err(TaxonomyError::DuplicateCategory(category.name.clone()));
                    }
                    if category.subcategories.is_empty() {
                        return Err(TaxonomyError::NoSubcategories(category.name.clone()));
                    }

                    let mut seen_sub = HashSet::new();
                    for sub in category.subcategories.iter_mut() {
                        if !seen_sub.insert(sub.name.clone()) {
                            return Err(TaxonomyError::DuplicateSubcategory {
                                category: category.name.clone(),
                                subcategory: sub.name.clone(),
                            });
                        }
                        let owner = format!("{}/{}", category.name, sub.name);
                        normalize_keywords(&owner, &mut sub.keywords)?;
                    }
                }
            }
        }

        Ok(self)
    }

    /// The single-level taxonomy used for Intel-labelled Paddle pull requests
    pub fn default_flat() -> Self {
        Taxonomy::Flat {
            categories: vec![
                flat("Operator Optimization", vec!["op", "operator", "speed", "performance", "fuse"]),
                flat("Quantization", vec!["int8", "quant", "ptq", "qat"]),
                flat("BF16/Low Precision", vec!["bf16", "bfloat16", "low precision"]),
                flat("CI/Infrastructure", vec!["ci", "continuous integration", "docker", "workflow"]),
                flat("Documentation", vec!["docs", "readme", "doc"]),
                flat("Bugfix", vec!["fix", "bug", "issue", "segfault"]),
                flat("API/Interface", vec!["api", "interface"]),
                flat("Refactor", vec!["refactor"]),
                flat("Tests", vec!["test", "unit test", "ut"]),
                flat("Build", vec!["build", "cmake", "compile"]),
            ],
        }
    }

    /// The two-level taxonomy, each category split into exclusive sub-categories
    pub fn default_tiered() -> Self {
        Taxonomy::Tiered {
            categories: vec![
                tiered(
                    "Operator Optimization",
                    vec![
                        ("Fusion", vec!["fuse"]),
                        ("Speed/Performance", vec!["speed", "performance"]),
                        ("Operator", vec!["op", "operator"]),
                    ],
                ),
                tiered(
                    "Quantization",
                    vec![
                        ("PTQ", vec!["ptq"]),
                        ("QAT", vec!["qat"]),
                        ("General Quant", vec!["int8", "quant"]),
                    ],
                ),
                tiered(
                    "BF16/Low Precision",
                    vec![
                        ("BF16", vec!["bf16", "bfloat16"]),
                        ("Low Precision General", vec!["low precision"]),
                    ],
                ),
                tiered(
                    "CI/Infrastructure",
                    vec![
                        ("CI", vec!["ci", "continuous integration"]),
                        ("Docker", vec!["docker"]),
                        ("Workflow", vec!["workflow"]),
                    ],
                ),
                tiered(
                    "Documentation",
                    vec![("Docs", vec!["docs", "doc"]), ("README", vec!["readme"])],
                ),
                tiered(
                    "Bugfix",
                    vec![
                        ("Bug", vec!["bug"]),
                        ("Fix", vec!["fix"]),
                        ("Issue", vec!["issue"]),
                        ("Segfault", vec!["segfault"]),
                    ],
                ),
                tiered(
                    "API/Interface",
                    vec![("API", vec!["api"]), ("Interface", vec!["interface"])],
                ),
                tiered("Refactor", vec![("Refactor", vec!["refactor"])]),
                tiered("Tests", vec![("Test Types", vec!["test", "unit test", "ut"])]),
                tiered("Build", vec![("Build/Compile", vec!["build", "cmake", "compile"])]),
            ],
        }
    }
}

impl Default for Taxonomy {
    fn default() -> Self {
        Self::default_flat()
    }
}

fn to_strings(values: Vec<&str>) -> Vec<String> {
    values.into_iter().map(str::to_string).collect()
}

fn flat(name: &str, keywords: Vec<&str>) -> FlatCategory {
    FlatCategory {
        name: name.to_string(),
        keywords: to_strings(keywords),
    }
}

fn tiered(name: &str, subcategories: Vec<(&str, Vec<&str>)>) -> TieredCategory {
    TieredCategory {
        name: name.to_string(),
        subcategories: subcategories
            .into_iter()
            .map(|(sub, keywords)| Subcategory {
                name: sub.to_string(),
                keywords: to_strings(keywords),
            })
            .collect(),
    }
}

fn normalize_keywords(owner: &str, keywords: &mut [String]) -> Result<(), TaxonomyError> {
    if keywords.is_empty() {
        return Err(TaxonomyError::NoKeywords(owner.to_string()));
    }
    for keyword in keywords.iter_mut() {
        // A blank keyword would match every item
        if keyword.trim().is_empty() {
            return Err(TaxonomyError::BlankKeyword(owner.to_string()));
        }
        *keyword = keyword.to_lowercase();
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_taxonomies_are_valid() {
        assert!(Taxonomy::default_flat().validated().is_ok());
        assert!(Taxonomy::default_tiered().validated().is_ok());
    }

    #[test]
    fn test_default_scan_orders() {
        assert_eq!(
            Taxonomy::default_flat().default_scan_order(),
            ScanOrder::Declared
        );
        assert_eq!(
            Taxonomy::default_tiered().default_scan_order(),
            ScanOrder::Lexicographic
        );
    }

    #[test]
    fn test_duplicate_category_rejected() {
        let taxonomy = Taxonomy::Flat {
            categories: vec![
                FlatCategory {
                    name: "Docs".to_string(),
                    keywords: vec!["doc".to_string()],
                },
                FlatCategory {
                    name: "Docs".to_string(),
                    keywords: vec!["readme".to_string()],
                },
            ],
        };
        assert_eq!(
            taxonomy.validated(),
            Err(TaxonomyError::DuplicateCategory("Docs".to_string()))
        );
    }

    #[test]
    fn test_duplicate_subcategory_rejected() {
        let taxonomy = Taxonomy::Tiered {
            categories: vec![TieredCategory {
                name: "Bugfix".to_string(),
                subcategories: vec![
                    Subcategory {
                        name: "Fix".to_string(),
                        keywords: vec!["fix".to_string()],
                    },
                    Subcategory {
                        name: "Fix".to_string(),
                        keywords: vec!["bug".to_string()],
                    },
                ],
            }],
        };
        assert!(matches!(
            taxonomy.validated(),
            Err(TaxonomyError::DuplicateSubcategory { .. })
        ));
    }

    #[test]
    fn test_empty_keywords_rejected() {
        let taxonomy = Taxonomy::Flat {
            categories: vec![FlatCategory {
                name: "Refactor".to_string(),
                keywords: vec![],
            }],
        };
        assert_eq!(
            taxonomy.validated(),
            Err(TaxonomyError::NoKeywords("Refactor".to_string()))
        );

        let blank = Taxonomy::Flat {
            categories: vec![FlatCategory {
                name: "Refactor".to_string(),
                keywords: vec!["  ".to_string()],
            }],
        };
        assert_eq!(
            blank.validated(),
            Err(TaxonomyError::BlankKeyword("Refactor".to_string()))
        );
    }

    #[test]
    fn test_empty_taxonomy_rejected() {
        let taxonomy = Taxonomy::Tiered { categories: vec![] };
        assert_eq!(taxonomy.validated(), Err(TaxonomyError::Empty));
    }

    #[test]
    fn test_keywords_lowercased() {
        let taxonomy = Taxonomy::Flat {
            categories: vec![FlatCategory {
                name: "BF16".to_string(),
                keywords: vec!["BFloat16".to_string()],
            }],
        }
        .validated()
        .unwrap();

        match taxonomy {
            Taxonomy::Flat { categories } => assert_eq!(categories[0].keywords, ["bfloat16"]),
            Taxonomy::Tiered { .. } => panic!("expected flat taxonomy"),
        }
    }

    #[test]
    fn test_taxonomy_from_json_keeps_declaration_order() {
        let json = r#"{
            "type": "tiered",
            "categories": [
                {"name": "Zeta", "subcategories": [{"name": "Z", "keywords": ["z"]}]},
                {"name": "Alpha", "subcategories": [{"name": "A", "keywords": ["a"]}]}
            ]
        }"#;
        let taxonomy: Taxonomy = serde_json::from_str(json).unwrap();
        assert_eq!(taxonomy.category_names(), ["Zeta", "Alpha"]);
    }
}
