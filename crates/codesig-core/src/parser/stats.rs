//! Counters collected while parsing.

use serde::{Deserialize, Serialize};

/// Work done by one or more file parses.
///
/// Returned by value from each parse and merged by the caller; nothing is
/// counted in shared state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseMetrics {
    /// Files parsed successfully.
    pub files: usize,
    /// Tokens in all token trees, the document roots excluded.
    pub tokens: usize,
    /// Declaration blocks discovered.
    pub blocks: usize,
    pub fields: usize,
    pub methods: usize,
    pub enum_members: usize,
    /// Tokens offered to member extractors.
    pub extractor_offers: usize,
    /// Partial member matches that were abandoned.
    pub failed_extractions: usize,
}

impl ParseMetrics {
    pub fn merge(&mut self, other: &ParseMetrics) {
        self.files += other.files;
        self.tokens += other.tokens;
        self.blocks += other.blocks;
        self.fields += other.fields;
        self.methods += other.methods;
        self.enum_members += other.enum_members;
        self.extractor_offers += other.extractor_offers;
        self.failed_extractions += other.failed_extractions;
    }
}

impl std::iter::Sum for ParseMetrics {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), |mut total, m| {
            total.merge(&m);
            total
        })
    }
}

impl std::fmt::Display for ParseMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Files:        {}", self.files)?;
        writeln!(f, "Tokens:       {}", self.tokens)?;
        writeln!(f, "Blocks:       {}", self.blocks)?;
        writeln!(f, "Members:")?;
        writeln!(f, "  Fields:     {}", self.fields)?;
        writeln!(f, "  Methods:    {}", self.methods)?;
        writeln!(f, "  Enum items: {}", self.enum_members)?;
        writeln!(f, "Extraction:")?;
        writeln!(f, "  Offers:     {}", self.extractor_offers)?;
        if self.failed_extractions > 0 {
            writeln!(f, "  Abandoned:  {}", self.failed_extractions)?;
        }
        Ok(())
    }
}
