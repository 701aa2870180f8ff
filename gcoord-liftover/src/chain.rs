//! Alignment chains and the UCSC chain text format.
//!
//! A chain maps a range of a reference sequence onto a range of an alternate sequence
//! through ungapped blocks separated by gaps on either side. Header coordinates are kept
//! exactly as written in the file (0-based, half-open); everything handed out by
//! [`Chain::ref_interval`] and [`Chain::segments`] is 1-based and closed.
//!
//! ```text
//! chain 4900 chr1 247249719 + 16770000 16780000 chr1 249250621 + 16897313 16907413 1
//! 5000	100	200
//! 4900
//!
//! ```
use std::collections::{HashMap, HashSet};
use std::fmt::{self, Display};
use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;
use std::str::FromStr;

use gcoord_core::models::Interval;
use gcoord_overlaprs::{OverlapDetector, OverlapperType};

use crate::errors::{ChainError, ChainResult};

/// Header keyword plus 12 fields.
const HEADER_FIELDS: usize = 13;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strand {
    Forward,
    Reverse,
}

impl FromStr for Strand {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "+" => Ok(Strand::Forward),
            "-" => Ok(Strand::Reverse),
            other => Err(format!("strand must be + or -, got `{other}`")),
        }
    }
}

impl Display for Strand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strand::Forward => write!(f, "+"),
            Strand::Reverse => write!(f, "-"),
        }
    }
}

/// The header line of a chain. Starts and ends are 0-based, half-open.
#[derive(Debug, Clone, PartialEq)]
pub struct ChainHeader {
    pub id: u64,
    pub score: f64,
    pub ref_sequence: String,
    pub ref_total_length: u32,
    pub ref_strand: Strand,
    pub ref_start: u32,
    pub ref_end: u32,
    pub alt_sequence: String,
    pub alt_total_length: u32,
    pub alt_strand: Strand,
    pub alt_start: u32,
    pub alt_end: u32,
}

/// An ungapped alignment block and the gaps that precede it.
/// The first block of a chain has no gaps before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block {
    pub size: u32,
    pub ref_gap_before: u32,
    pub alt_gap_before: u32,
}

impl Block {
    pub fn new(size: u32, ref_gap_before: u32, alt_gap_before: u32) -> Self {
        Block {
            size,
            ref_gap_before,
            alt_gap_before,
        }
    }
}

/// One piece of a reference range cut along a chain's blocks and gaps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainSegment {
    /// Index of the block, or of the block that follows the gap.
    pub block_index: usize,
    /// 1-based closed reference sub-range.
    pub ref_interval: Interval,
    /// Forward-strand, 1-based closed alternate sub-range. `None` for gaps.
    pub alt_interval: Option<Interval>,
    pub is_gap: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Chain {
    header: ChainHeader,
    blocks: Vec<Block>,
    /// 0-based reference start of every block
    ref_block_starts: Vec<u32>,
    /// 0-based alternate-strand start of every block
    alt_block_starts: Vec<u32>,
}

impl Chain {
    /// Build a chain, checking that the blocks and gaps add up to the header ranges.
    pub fn new(header: ChainHeader, blocks: Vec<Block>) -> ChainResult<Self> {
        let invalid = |message: String| ChainError::Invalid {
            id: header.id,
            message,
        };

        if header.ref_strand != Strand::Forward {
            return Err(invalid("reference strand must be +".to_string()));
        }
        if header.ref_start > header.ref_end {
            return Err(invalid(format!(
                "reference start {} is after end {}",
                header.ref_start, header.ref_end
            )));
        }
        if header.alt_start > header.alt_end {
            return Err(invalid(format!(
                "alternate start {} is after end {}",
                header.alt_start, header.alt_end
            )));
        }
        if header.ref_end > header.ref_total_length || header.alt_end > header.alt_total_length {
            return Err(invalid("chain extends past the end of its sequence".to_string()));
        }

        let Some(first) = blocks.first() else {
            return Err(invalid("chain has no blocks".to_string()));
        };
        if first.ref_gap_before != 0 || first.alt_gap_before != 0 {
            return Err(invalid("first block cannot be preceded by a gap".to_string()));
        }

        let ref_span: u64 = blocks
            .iter()
            .map(|b| b.size as u64 + b.ref_gap_before as u64)
            .sum();
        let alt_span: u64 = blocks
            .iter()
            .map(|b| b.size as u64 + b.alt_gap_before as u64)
            .sum();
        if ref_span != (header.ref_end - header.ref_start) as u64 {
            return Err(invalid(format!(
                "blocks and gaps cover {ref_span} reference bases, header declares {}",
                header.ref_end - header.ref_start
            )));
        }
        if alt_span != (header.alt_end - header.alt_start) as u64 {
            return Err(invalid(format!(
                "blocks and gaps cover {alt_span} alternate bases, header declares {}",
                header.alt_end - header.alt_start
            )));
        }

        // cannot overflow once the totals reconcile with the header
        let mut ref_block_starts = Vec::with_capacity(blocks.len());
        let mut alt_block_starts = Vec::with_capacity(blocks.len());
        let (mut ref_pos, mut alt_pos) = (header.ref_start, header.alt_start);
        for block in &blocks {
            ref_pos += block.ref_gap_before;
            alt_pos += block.alt_gap_before;
            ref_block_starts.push(ref_pos);
            alt_block_starts.push(alt_pos);
            ref_pos += block.size;
            alt_pos += block.size;
        }

        Ok(Chain {
            header,
            blocks,
            ref_block_starts,
            alt_block_starts,
        })
    }

    pub fn id(&self) -> u64 {
        self.header.id
    }

    pub fn score(&self) -> f64 {
        self.header.score
    }

    pub fn header(&self) -> &ChainHeader {
        &self.header
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn is_alt_reverse(&self) -> bool {
        self.header.alt_strand == Strand::Reverse
    }

    /// The reference span as a 1-based closed interval.
    pub fn ref_interval(&self) -> Interval {
        Interval::new(
            self.header.ref_sequence.as_str(),
            self.header.ref_start + 1,
            self.header.ref_end,
        )
    }

    /// The alternate span as a forward-strand, 1-based closed interval.
    pub fn alt_interval(&self) -> Interval {
        self.alt_forward(self.header.alt_start, self.header.alt_end)
    }

    /// Convert a 0-based half-open range on the alternate strand to forward 1-based closed.
    fn alt_forward(&self, start: u32, end: u32) -> Interval {
        let seq = self.header.alt_sequence.as_str();
        match self.header.alt_strand {
            Strand::Forward => Interval::new(seq, start + 1, end),
            Strand::Reverse => {
                let size = self.header.alt_total_length;
                Interval::new(seq, size - end + 1, size - start)
            }
        }
    }

    ///
    /// Cut the 1-based closed reference range `[start, end]` into the block and gap pieces
    /// of this chain, in reference order. Parts of the range outside the chain are dropped.
    ///
    /// Gaps that exist only on the alternate side occupy no reference bases, so they
    /// produce no segment; the blocks on either side still come out as separate pieces.
    ///
    pub fn segments(&self, start: u32, end: u32) -> Vec<ChainSegment> {
        let mut out = Vec::new();
        if start == 0 || end < start {
            return out;
        }

        let lo = (start - 1).max(self.header.ref_start);
        let hi = end.min(self.header.ref_end);
        if lo >= hi {
            return out;
        }

        let seq = self.header.ref_sequence.as_str();
        let first = self
            .ref_block_starts
            .partition_point(|&s| s <= lo)
            .saturating_sub(1);

        for (i, block) in self.blocks.iter().enumerate().skip(first) {
            let block_start = self.ref_block_starts[i];
            let gap_start = block_start - block.ref_gap_before;
            if gap_start >= hi {
                break;
            }

            let (s, e) = (gap_start.max(lo), block_start.min(hi));
            if s < e {
                out.push(ChainSegment {
                    block_index: i,
                    ref_interval: Interval::new(seq, s + 1, e),
                    alt_interval: None,
                    is_gap: true,
                });
            }

            let (s, e) = (block_start.max(lo), (block_start + block.size).min(hi));
            if s < e {
                let alt_start = self.alt_block_starts[i] + (s - block_start);
                out.push(ChainSegment {
                    block_index: i,
                    ref_interval: Interval::new(seq, s + 1, e),
                    alt_interval: Some(self.alt_forward(alt_start, alt_start + (e - s))),
                    is_gap: false,
                });
            }
        }
        out
    }

    /// Write the chain in the text format, followed by a blank line.
    pub fn write<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        let h = &self.header;
        writeln!(
            out,
            "chain\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
            h.score,
            h.ref_sequence,
            h.ref_total_length,
            h.ref_strand,
            h.ref_start,
            h.ref_end,
            h.alt_sequence,
            h.alt_total_length,
            h.alt_strand,
            h.alt_start,
            h.alt_end,
            h.id
        )?;

        // the file stores the gaps after each block
        for pair in self.blocks.windows(2) {
            writeln!(
                out,
                "{}\t{}\t{}",
                pair[0].size, pair[1].ref_gap_before, pair[1].alt_gap_before
            )?;
        }
        if let Some(last) = self.blocks.last() {
            writeln!(out, "{}", last.size)?;
        }
        writeln!(out)
    }

    pub fn write_chains<W: Write>(chains: &[Chain], out: &mut W) -> std::io::Result<()> {
        for chain in chains {
            chain.write(out)?;
        }
        Ok(())
    }

    ///
    /// Read every chain from a chain file.
    ///
    /// # Arguments
    /// - path: path to the chain file
    ///
    pub fn load_chains<P: AsRef<Path>>(path: P) -> ChainResult<Vec<Chain>> {
        let file = File::open(path.as_ref())?;
        Self::read_chains(BufReader::new(file))
    }

    /// Read every chain from text in the chain format. Chain ids must be unique.
    pub fn read_chains<R: BufRead>(reader: R) -> ChainResult<Vec<Chain>> {
        let mut chains = Vec::new();
        let mut seen = HashSet::new();
        let mut current: Option<PendingChain> = None;

        for (idx, line) in reader.lines().enumerate() {
            let line_no = idx + 1;
            let line = line?;
            let line = line.trim();

            if line.is_empty() {
                if let Some(pending) = current.take() {
                    chains.push(pending.finish(line_no, &mut seen)?);
                }
                continue;
            }
            if line.starts_with('#') {
                continue;
            }

            let fields: Vec<&str> = line.split_whitespace().collect();
            if fields[0] == "chain" {
                if let Some(pending) = current.take() {
                    chains.push(pending.finish(line_no, &mut seen)?);
                }
                current = Some(PendingChain::from_header(&fields, line_no)?);
                continue;
            }

            let Some(pending) = current.as_mut() else {
                return Err(parse_error(line_no, "expected a `chain` header line"));
            };
            pending.push_block(&fields, line_no)?;
        }

        if let Some(pending) = current.take() {
            chains.push(pending.finish(0, &mut seen)?);
        }
        Ok(chains)
    }

    /// Index chains by their reference span.
    pub fn index(chains: Vec<Chain>) -> OverlapDetector<Chain> {
        Self::index_with(chains, OverlapperType::default())
    }

    pub fn index_with(chains: Vec<Chain>, overlapper_type: OverlapperType) -> OverlapDetector<Chain> {
        OverlapDetector::with_overlapper_type(
            chains.into_iter().map(|c| (vec![c.ref_interval()], c)),
            overlapper_type,
        )
    }

    /// Key chains by id.
    pub fn by_id(chains: Vec<Chain>) -> HashMap<u64, Chain> {
        chains.into_iter().map(|c| (c.id(), c)).collect()
    }
}

/// A chain whose header has been read but whose blocks are still arriving.
struct PendingChain {
    header: ChainHeader,
    header_line: usize,
    /// `(size, ref_gap_after, alt_gap_after)` as written in the file
    raw_blocks: Vec<(u32, u32, u32)>,
    complete: bool,
}

impl PendingChain {
    fn from_header(fields: &[&str], line: usize) -> ChainResult<Self> {
        if fields.len() != HEADER_FIELDS {
            return Err(parse_error(
                line,
                format!(
                    "chain header needs {} fields, found {}",
                    HEADER_FIELDS - 1,
                    fields.len() - 1
                ),
            ));
        }

        let score = fields[1]
            .parse::<f64>()
            .map_err(|_| parse_error(line, format!("invalid score `{}`", fields[1])))?;
        let strand = |s: &str| s.parse::<Strand>().map_err(|e| parse_error(line, e));
        let id = fields[12]
            .parse::<u64>()
            .map_err(|_| parse_error(line, format!("invalid chain id `{}`", fields[12])))?;

        let header = ChainHeader {
            id,
            score,
            ref_sequence: fields[2].to_string(),
            ref_total_length: parse_u32(fields[3], "reference size", line)?,
            ref_strand: strand(fields[4])?,
            ref_start: parse_u32(fields[5], "reference start", line)?,
            ref_end: parse_u32(fields[6], "reference end", line)?,
            alt_sequence: fields[7].to_string(),
            alt_total_length: parse_u32(fields[8], "alternate size", line)?,
            alt_strand: strand(fields[9])?,
            alt_start: parse_u32(fields[10], "alternate start", line)?,
            alt_end: parse_u32(fields[11], "alternate end", line)?,
        };

        Ok(PendingChain {
            header,
            header_line: line,
            raw_blocks: Vec::new(),
            complete: false,
        })
    }

    fn push_block(&mut self, fields: &[&str], line: usize) -> ChainResult<()> {
        if self.complete {
            return Err(parse_error(line, "data after the final block of a chain"));
        }
        match fields {
            [size, ref_gap, alt_gap] => {
                self.raw_blocks.push((
                    parse_u32(size, "block size", line)?,
                    parse_u32(ref_gap, "reference gap", line)?,
                    parse_u32(alt_gap, "alternate gap", line)?,
                ));
            }
            [size] => {
                self.raw_blocks.push((parse_u32(size, "block size", line)?, 0, 0));
                self.complete = true;
            }
            _ => {
                return Err(parse_error(
                    line,
                    format!("block line needs 1 or 3 fields, found {}", fields.len()),
                ));
            }
        }
        Ok(())
    }

    /// `line` is where the chain ended; 0 means end of input.
    fn finish(self, line: usize, seen: &mut HashSet<u64>) -> ChainResult<Chain> {
        if !self.complete {
            let message = format!("chain {} has no final single-field block", self.header.id);
            return Err(parse_error(if line == 0 { self.header_line } else { line }, message));
        }

        let mut blocks = Vec::with_capacity(self.raw_blocks.len());
        let (mut ref_gap, mut alt_gap) = (0, 0);
        for (size, ref_gap_after, alt_gap_after) in self.raw_blocks {
            blocks.push(Block::new(size, ref_gap, alt_gap));
            ref_gap = ref_gap_after;
            alt_gap = alt_gap_after;
        }

        let id = self.header.id;
        let header_line = self.header_line;
        let chain = Chain::new(self.header, blocks).map_err(|e| match e {
            ChainError::Invalid { message, .. } => parse_error(header_line, message),
            other => other,
        })?;

        if !seen.insert(id) {
            return Err(ChainError::DuplicateChainId(id));
        }
        Ok(chain)
    }
}

fn parse_error(line: usize, message: impl Into<String>) -> ChainError {
    ChainError::Parse {
        line,
        message: message.into(),
    }
}

fn parse_u32(token: &str, what: &str, line: usize) -> ChainResult<u32> {
    if token.starts_with('-') {
        return Err(parse_error(line, format!("negative {what} `{token}`")));
    }
    token
        .parse::<u32>()
        .map_err(|_| parse_error(line, format!("invalid {what} `{token}`")))
}
