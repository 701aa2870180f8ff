//! Interval liftover through a set of indexed chains.
//!
//! A query is cut along every chain overlapping it. With the default `min_match` of 1.0
//! a chain maps the query only when the whole query sits inside one of its blocks; lower
//! thresholds accept chains that map at least that fraction of the query, and the result
//! then spans from the first to the last mapped base.
use std::cmp::Ordering;
use std::path::Path;

use log::{debug, info};

use gcoord_core::models::{Interval, Locatable, NamedInterval, SequenceDictionary};
use gcoord_overlaprs::OverlapDetector;

use crate::chain::{Chain, ChainSegment};
use crate::config::{LiftOverConfig, validate_min_match};
use crate::errors::{LiftOverError, LiftOverResult};

/// A successful mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Liftover {
    /// Forward-strand, 1-based closed target interval.
    pub interval: Interval,
    /// True when the chain maps onto the reverse strand of the target.
    pub strand_flipped: bool,
    pub chain_id: u64,
}

/// How one block or gap of one chain covers part of a query.
#[derive(Debug, Clone, PartialEq)]
pub struct PartialLiftover {
    pub chain_id: u64,
    pub block_index: usize,
    pub ref_interval: Interval,
    /// `None` for gaps.
    pub alt_interval: Option<Interval>,
    pub is_gap: bool,
    /// Share of the query length covered by this piece.
    pub fraction: f64,
}

/// A chain that maps enough of the query to be a candidate answer.
struct Candidate<'a> {
    chain: &'a Chain,
    mapped: u32,
    interval: Interval,
}

pub struct LiftOver {
    chains: OverlapDetector<Chain>,
    config: LiftOverConfig,
}

impl LiftOver {
    pub fn new(chains: Vec<Chain>) -> Self {
        Self::build(chains, LiftOverConfig::default())
    }

    pub fn with_config(chains: Vec<Chain>, config: LiftOverConfig) -> LiftOverResult<Self> {
        config.validate()?;
        Ok(Self::build(chains, config))
    }

    fn build(chains: Vec<Chain>, config: LiftOverConfig) -> Self {
        let chains = Chain::index_with(chains, config.overlapper_type);
        info!("Indexed {} chains", chains.len());
        LiftOver { chains, config }
    }

    /// Load chains from a chain file with default settings.
    pub fn from_file<P: AsRef<Path>>(path: P) -> LiftOverResult<Self> {
        let chains = Chain::load_chains(path.as_ref())?;
        info!(
            "Loaded {} chains from {}",
            chains.len(),
            path.as_ref().display()
        );
        Ok(Self::new(chains))
    }

    ///
    /// Create a liftover from a TOML config file. The `chain_file` it names is
    /// resolved relative to the config file.
    ///
    pub fn from_config<P: AsRef<Path>>(cfg_path: P) -> LiftOverResult<Self> {
        let config = LiftOverConfig::try_from(cfg_path.as_ref())?;
        let chain_file = config.chain_file.as_deref().ok_or_else(|| {
            LiftOverError::Config("config does not name a chain_file".to_string())
        })?;

        let chain_path = match cfg_path.as_ref().parent() {
            Some(dir) => dir.join(chain_file),
            None => Path::new(chain_file).to_path_buf(),
        };
        let chains = Chain::load_chains(&chain_path)?;
        info!(
            "Loaded {} chains from {}",
            chains.len(),
            chain_path.display()
        );
        Self::with_config(chains, config)
    }

    pub fn config(&self) -> &LiftOverConfig {
        &self.config
    }

    pub fn min_match(&self) -> f64 {
        self.config.min_match
    }

    pub fn set_min_match(&mut self, min_match: f64) -> LiftOverResult<()> {
        validate_min_match(min_match)?;
        self.config.min_match = min_match;
        Ok(())
    }

    /// Every indexed chain, in load order.
    pub fn chains(&self) -> Vec<&Chain> {
        self.chains.get_all()
    }

    ///
    /// Check every chain against the dictionary of the target assembly: each alternate
    /// sequence must be present with the length the chain declares.
    ///
    pub fn validate_to_sequences(&self, target: &SequenceDictionary) -> LiftOverResult<()> {
        for chain in self.chains.get_all() {
            let h = chain.header();
            match target.sequence_length(&h.alt_sequence) {
                None => {
                    return Err(LiftOverError::DictionaryMismatch(format!(
                        "chain {} maps onto {}, which is not in the target dictionary",
                        h.id, h.alt_sequence
                    )));
                }
                Some(len) if len != h.alt_total_length => {
                    return Err(LiftOverError::DictionaryMismatch(format!(
                        "chain {} declares {} with length {}, target dictionary has {}",
                        h.id, h.alt_sequence, h.alt_total_length, len
                    )));
                }
                Some(_) => {}
            }
        }
        Ok(())
    }

    /// Map `query` onto the target assembly, or `None` when no chain maps enough of it.
    pub fn lift_over(&self, query: &Interval) -> Option<Liftover> {
        let query_len = query.length();
        if query_len == 0 {
            return None;
        }

        let mut candidates: Vec<Candidate> = self
            .chains
            .query_overlaps(query)
            .into_iter()
            .filter_map(|chain| self.candidate(chain, query, query_len))
            .collect();

        if candidates.len() > 1 {
            debug!(
                "{} chains map {}, keeping the best",
                candidates.len(),
                query
            );
        }

        candidates.sort_by(|a, b| {
            b.mapped
                .cmp(&a.mapped)
                .then_with(|| {
                    b.chain
                        .score()
                        .partial_cmp(&a.chain.score())
                        .unwrap_or(Ordering::Equal)
                })
                .then_with(|| a.chain.id().cmp(&b.chain.id()))
        });

        candidates.into_iter().next().map(|c| Liftover {
            interval: c.interval,
            strand_flipped: c.chain.is_alt_reverse(),
            chain_id: c.chain.id(),
        })
    }

    fn candidate<'a>(&self, chain: &'a Chain, query: &Interval, query_len: u32) -> Option<Candidate<'a>> {
        let blocks: Vec<ChainSegment> = chain
            .segments(query.start(), query.end())
            .into_iter()
            .filter(|s| !s.is_gap)
            .collect();

        let mapped: u32 = blocks.iter().map(|s| s.ref_interval.length()).sum();
        if self.config.min_match >= 1.0 {
            // whole query inside a single block
            if blocks.len() != 1 || mapped != query_len {
                return None;
            }
        } else if (mapped as f64) < self.config.min_match * query_len as f64 {
            return None;
        }

        let alts: Vec<&Interval> = blocks.iter().filter_map(|s| s.alt_interval.as_ref()).collect();
        let first = alts.first()?;
        let start = alts.iter().map(|iv| iv.start()).min()?;
        let end = alts.iter().map(|iv| iv.end()).max()?;

        Some(Candidate {
            chain,
            mapped,
            interval: Interval::new(first.sequence(), start, end),
        })
    }

    /// Like [`lift_over`](Self::lift_over), keeping the name. The strand flips when the
    /// chain maps onto the reverse strand.
    pub fn lift_over_named(&self, query: &NamedInterval) -> Option<NamedInterval> {
        let lifted = self.lift_over(query.interval())?;
        let negative = query.is_negative_strand() != lifted.strand_flipped;

        let mut out = NamedInterval::from(lifted.interval).with_strand(negative);
        if let Some(name) = query.name() {
            out = out.with_name(name);
        }
        Some(out)
    }

    ///
    /// Explain how every overlapping chain covers `query`: one record per block or gap
    /// piece, chains ordered by id, pieces in reference order. Empty when nothing overlaps.
    ///
    pub fn diagnostic_liftover(&self, query: &Interval) -> Vec<PartialLiftover> {
        let query_len = query.length();
        if query_len == 0 {
            return Vec::new();
        }

        let mut chains = self.chains.query_overlaps(query);
        chains.sort_by_key(|c| c.id());

        chains
            .into_iter()
            .flat_map(|chain| {
                chain
                    .segments(query.start(), query.end())
                    .into_iter()
                    .map(move |s| PartialLiftover {
                        chain_id: chain.id(),
                        block_index: s.block_index,
                        fraction: s.ref_interval.length() as f64 / query_len as f64,
                        ref_interval: s.ref_interval,
                        alt_interval: s.alt_interval,
                        is_gap: s.is_gap,
                    })
            })
            .collect()
    }
}
