//! Tag-based publishing eligibility

use std::collections::BTreeSet;
use std::fmt;

/// Why a note is or is not publishable
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Eligibility {
    Eligible,
    MissingRequired { required: Vec<String> },
    Excluded { found: Vec<String> },
}

impl Eligibility {
    pub fn is_eligible(&self) -> bool {
        matches!(self, Eligibility::Eligible)
    }
}

impl fmt::Display for Eligibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Eligibility::Eligible => write!(f, "OK"),
            Eligibility::MissingRequired { required } => {
                write!(f, "Missing required tags: {}", required.join(", "))
            }
            Eligibility::Excluded { found } => {
                write!(f, "Contains excluded tags: {}", found.join(", "))
            }
        }
    }
}

/// Required/excluded tag sets applied during discovery
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagFilter {
    required: BTreeSet<String>,
    excluded: BTreeSet<String>,
}

impl TagFilter {
    pub fn new<I, J>(required: I, excluded: J) -> Self
    where
        I: IntoIterator<Item = String>,
        J: IntoIterator<Item = String>,
    {
        TagFilter {
            required: required.into_iter().collect(),
            excluded: excluded.into_iter().collect(),
        }
    }

    /// A note is eligible iff it carries at least one required tag and no
    /// excluded tag. Exclusion wins over inclusion.
    ///
    /// # Examples
    ///
    /// ```
    /// use notepress::domain::TagFilter;
    /// use std::collections::BTreeSet;
    ///
    /// let filter = TagFilter::new(
    ///     vec!["status/evergreen".to_string()],
    ///     vec!["private".to_string()],
    /// );
    /// let tags: BTreeSet<String> = ["status/evergreen".to_string(), "private".to_string()].into();
    /// assert!(!filter.evaluate(&tags).is_eligible());
    /// ```
    pub fn evaluate(&self, tags: &BTreeSet<String>) -> Eligibility {
        if self.required.is_disjoint(tags) {
            return Eligibility::MissingRequired {
                required: self.required.iter().cloned().collect(),
            };
        }

        let found: Vec<String> = self.excluded.intersection(tags).cloned().collect();
        if !found.is_empty() {
            return Eligibility::Excluded { found };
        }

        Eligibility::Eligible
    }
}
