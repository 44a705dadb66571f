use crate::classifier::{Classification, Classifier};
use crate::collectors::CollectionStatus;
use crate::results::PullRequest;
use crate::taxonomy::Taxonomy;
use serde::ser::{Serialize, SerializeStruct, Serializer};
use std::fmt::Write;

/// Output format of a rendered report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    /// `Name (count)` headers and `#id (url): title` lines
    #[default]
    Plain,
    /// `### Name (count)` headers and `- [#id](url): title` bullets
    Markdown,
    /// Pretty-printed JSON
    Json,
}

/// Pull requests of one sub-category
#[derive(Debug, Clone)]
pub struct Subgroup<'a> {
    pub name: &'a str,
    pub items: Vec<&'a PullRequest>,
}

/// Contents of one category
#[derive(Debug, Clone)]
pub enum Bucket<'a> {
    Items(Vec<&'a PullRequest>),
    Subcategories(Vec<Subgroup<'a>>),
}

/// Pull requests of one category
#[derive(Debug, Clone)]
pub struct Group<'a> {
    pub name: &'a str,
    pub bucket: Bucket<'a>,
}

impl Group<'_> {
    /// Matches in this category, summed over sub-categories
    pub fn count(&self) -> usize {
        match &self.bucket {
            Bucket::Items(items) => items.len(),
            Bucket::Subcategories(subs) => subs.iter().map(|s| s.items.len()).sum(),
        }
    }
}

/// Pull requests partitioned by category.
///
/// Every input item lands in exactly one list: a category, a sub-category,
/// or the uncategorized list. Lists keep the input order.
#[derive(Debug, Clone)]
pub struct Report<'a> {
    groups: Vec<Group<'a>>,
    uncategorized: Vec<&'a PullRequest>,
    status: CollectionStatus,
}

impl<'a> Report<'a> {
    /// Classify `items` and group them
    pub fn build(items: &'a [PullRequest], classifier: &Classifier<'a>) -> Self {
        let report = Self::from_outcomes(
            classifier.taxonomy(),
            items.iter().map(|pr| (pr, classifier.classify_pr(pr))),
        );
        debug_assert_eq!(report.total(), items.len());
        report
    }

    /// Group already classified items.
    ///
    /// Every category of the taxonomy gets a list, even when nothing matches
    /// it. An outcome that does not fit the taxonomy is treated as
    /// unclassified.
    pub fn from_outcomes<I>(taxonomy: &'a Taxonomy, classified: I) -> Self
    where
        I: IntoIterator<Item = (&'a PullRequest, Classification)>,
    {
        let groups = match taxonomy {
            Taxonomy::Flat { categories } => categories
                .iter()
                .map(|c| Group {
                    name: &c.name,
                    bucket: Bucket::Items(Vec::new()),
                })
                .collect(),
            Taxonomy::Tiered { categories } => categories
                .iter()
                .map(|c| Group {
                    name: &c.name,
                    bucket: Bucket::Subcategories(
                        c.subcategories
                            .iter()
                            .map(|s| Subgroup {
                                name: &s.name,
                                items: Vec::new(),
                            })
                            .collect(),
                    ),
                })
                .collect(),
        };

        let mut report = Self {
            groups,
            uncategorized: Vec::new(),
            status: CollectionStatus::Complete,
        };

        for (pr, classification) in classified {
            match report.slot(classification) {
                Some(list) => list.push(pr),
                None => report.uncategorized.push(pr),
            }
        }

        report
    }

    /// Record how the collection feeding this report ended
    pub fn with_status(mut self, status: CollectionStatus) -> Self {
        self.status = status;
        self
    }

    fn slot(&mut self, classification: Classification) -> Option<&mut Vec<&'a PullRequest>> {
        match classification {
            Classification::Category { category } => match &mut self.groups.get_mut(category)?.bucket {
                Bucket::Items(items) => Some(items),
                Bucket::Subcategories(_) => None,
            },
            Classification::Subcategory {
                category,
                subcategory,
            } => match &mut self.groups.get_mut(category)?.bucket {
                Bucket::Subcategories(subs) => subs.get_mut(subcategory).map(|s| &mut s.items),
                Bucket::Items(_) => None,
            },
            Classification::Unclassified => None,
        }
    }

    /// Categories in declaration order
    pub fn groups(&self) -> &[Group<'a>] {
        &self.groups
    }

    pub fn uncategorized(&self) -> &[&'a PullRequest] {
        &self.uncategorized
    }

    pub fn status(&self) -> &CollectionStatus {
        &self.status
    }

    /// Matched plus unmatched items; equals the number of input items
    pub fn total(&self) -> usize {
        self.groups.iter().map(Group::count).sum::<usize>() + self.uncategorized.len()
    }

    /// Render the report in the given format
    pub fn render(&self, format: ReportFormat) -> Result<String, serde_json::Error> {
        match format {
            ReportFormat::Plain => Ok(self.render_plain()),
            ReportFormat::Markdown => Ok(self.render_markdown()),
            ReportFormat::Json => serde_json::to_string_pretty(self),
        }
    }

    fn render_plain(&self) -> String {
        let mut out = String::new();

        for group in &self.groups {
            let _ = writeln!(out, "{} ({})", group.name, group.count());
            match &group.bucket {
                Bucket::Items(items) => {
                    for pr in items {
                        let _ = writeln!(out, "  {}", plain_line(pr));
                    }
                }
                Bucket::Subcategories(subs) => {
                    for sub in subs.iter().filter(|s| !s.items.is_empty()) {
                        let _ = writeln!(out, "  {} ({})", sub.name, sub.items.len());
                        for pr in &sub.items {
                            let _ = writeln!(out, "    {}", plain_line(pr));
                        }
                    }
                }
            }
            out.push('\n');
        }

        let _ = writeln!(out, "Uncategorized ({})", self.uncategorized.len());
        for pr in &self.uncategorized {
            let _ = writeln!(out, "  {}", plain_line(pr));
        }

        out.push('\n');
        let _ = writeln!(out, "Total: {}", self.total());
        if let Some(note) = self.incomplete_note() {
            let _ = writeln!(out, "{}", note);
        }
        out
    }

    fn render_markdown(&self) -> String {
        let mut out = String::new();

        for group in &self.groups {
            let _ = writeln!(out, "\n### {} ({})", group.name, group.count());
            match &group.bucket {
                Bucket::Items(items) => {
                    for pr in items {
                        let _ = writeln!(out, "{}", markdown_line(pr));
                    }
                }
                Bucket::Subcategories(subs) => {
                    for sub in subs.iter().filter(|s| !s.items.is_empty()) {
                        let _ = writeln!(out, "#### {} ({})", sub.name, sub.items.len());
                        for pr in &sub.items {
                            let _ = writeln!(out, "{}", markdown_line(pr));
                        }
                    }
                }
            }
        }

        let _ = writeln!(out, "\n### Uncategorized PRs ({})", self.uncategorized.len());
        for pr in &self.uncategorized {
            let _ = writeln!(out, "{}", markdown_line(pr));
        }

        let _ = writeln!(out, "\nTotal: {}", self.total());
        if let Some(note) = self.incomplete_note() {
            let _ = writeln!(out, "\n> {}", note);
        }
        out
    }

    fn incomplete_note(&self) -> Option<String> {
        match &self.status {
            CollectionStatus::Complete => None,
            CollectionStatus::EndedEarly { page, reason } => Some(format!(
                "Warning: collection ended early at page {} ({}); counts are partial.",
                page, reason
            )),
        }
    }
}

fn plain_line(pr: &PullRequest) -> String {
    format!("#{} ({}): {}", pr.id, pr.url, pr.title)
}

fn markdown_line(pr: &PullRequest) -> String {
    format!("- [#{}]({}): {}", pr.id, pr.url, pr.title)
}

impl Serialize for Subgroup<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Subgroup", 3)?;
        state.serialize_field("name", self.name)?;
        state.serialize_field("count", &self.items.len())?;
        state.serialize_field("items", &self.items)?;
        state.end()
    }
}

impl Serialize for Group<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Group", 3)?;
        state.serialize_field("name", self.name)?;
        state.serialize_field("count", &self.count())?;
        match &self.bucket {
            Bucket::Items(items) => state.serialize_field("items", items)?,
            Bucket::Subcategories(subs) => state.serialize_field("subcategories", subs)?,
        }
        state.end()
    }
}

impl Serialize for Report<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Report", 4)?;
        state.serialize_field("total", &self.total())?;
        state.serialize_field("complete", &(self.status == CollectionStatus::Complete))?;
        state.serialize_field("categories", &self.groups)?;
        state.serialize_field("uncategorized", &self.uncategorized)?;
        state.end()
    }
}
