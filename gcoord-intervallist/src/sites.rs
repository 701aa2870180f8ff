use std::sync::Arc;

use gcoord_core::models::{NamedInterval, SequenceDictionary};

use crate::errors::IntervalListResult;
use crate::list::NamedIntervalList;

/// The part of a variant call needed to place it on the genome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantSite {
    pub chrom: String,
    /// 1-based position of the first reference base.
    pub pos: u32,
    /// Number of reference bases; 0 is treated as 1.
    pub ref_length: u32,
    pub id: Option<String>,
    /// The call failed one of its filters.
    pub filtered: bool,
}

impl VariantSite {
    pub fn new(chrom: impl Into<String>, pos: u32, ref_length: u32) -> Self {
        VariantSite {
            chrom: chrom.into(),
            pos,
            ref_length,
            id: None,
            filtered: false,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_filtered(mut self, filtered: bool) -> Self {
        self.filtered = filtered;
        self
    }

    /// The reference bases of the site, named by its id.
    pub fn to_interval(&self) -> NamedInterval {
        let end = self.pos.saturating_add(self.ref_length.max(1) - 1);
        NamedInterval::with_meta(self.chrom.as_str(), self.pos, end, false, self.id.clone())
    }
}

impl NamedIntervalList {
    ///
    /// One interval per site, sorted. Filtered sites are skipped unless `include_filtered`
    /// is set. Sites on sequences missing from `dictionary` are rejected.
    ///
    pub fn from_variant_sites<I>(
        dictionary: Arc<SequenceDictionary>,
        sites: I,
        include_filtered: bool,
    ) -> IntervalListResult<Self>
    where
        I: IntoIterator<Item = VariantSite>,
    {
        let mut list = NamedIntervalList::new(dictionary);
        list.add_all(
            sites
                .into_iter()
                .filter(|site| include_filtered || !site.filtered)
                .map(|site| site.to_interval()),
        )?;
        Ok(list.sorted())
    }
}
