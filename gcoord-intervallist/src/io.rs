//! The interval-list text format.
//!
//! A SAM-style header carrying the sequence dictionary, then one tab-separated row per
//! interval:
//!
//! ```text
//! @HD	VN:1.6
//! @SQ	SN:1	LN:249250621
//! 1	100	200	+	target_1
//! 1	300	400	-	.
//! ```
//!
//! Coordinates are 1-based and closed. A name of `.` means no name.
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use std::sync::Arc;

use log::info;

use gcoord_core::models::{Locatable, NamedInterval, SequenceDictionary, SequenceRecord};

use crate::errors::{IntervalListError, IntervalListResult};
use crate::list::NamedIntervalList;

const HEADER_VERSION: &str = "1.6";
const NO_NAME: &str = ".";

fn parse_error(line: usize, message: impl Into<String>) -> IntervalListError {
    IntervalListError::Parse {
        line,
        message: message.into(),
    }
}

/// `SN:` and `LN:` of an `@SQ` line.
fn parse_sq(line: &str, line_no: usize) -> IntervalListResult<SequenceRecord> {
    let mut name = None;
    let mut length = None;
    for field in line.split('\t').skip(1) {
        if let Some(v) = field.strip_prefix("SN:") {
            name = Some(v.to_string());
        } else if let Some(v) = field.strip_prefix("LN:") {
            length = Some(
                v.parse::<u32>()
                    .map_err(|_| parse_error(line_no, format!("invalid sequence length `{v}`")))?,
            );
        }
    }

    match (name, length) {
        (Some(name), Some(length)) => Ok(SequenceRecord::new(name, length)),
        _ => Err(parse_error(line_no, "@SQ line needs SN: and LN: fields")),
    }
}

fn parse_row(line: &str, line_no: usize) -> IntervalListResult<NamedInterval> {
    let fields: Vec<&str> = line.split('\t').collect();
    let [sequence, start, end, strand, name] = fields.as_slice() else {
        return Err(parse_error(
            line_no,
            format!("expected 5 tab-separated fields, found {}", fields.len()),
        ));
    };

    let coord = |v: &str| {
        v.parse::<u32>()
            .map_err(|_| parse_error(line_no, format!("invalid coordinate `{v}`")))
    };
    let negative_strand = match *strand {
        "+" => false,
        "-" => true,
        other => return Err(parse_error(line_no, format!("invalid strand `{other}`"))),
    };
    let name = (*name != NO_NAME).then(|| name.to_string());

    Ok(NamedInterval::with_meta(
        *sequence,
        coord(*start)?,
        coord(*end)?,
        negative_strand,
        name,
    ))
}

impl NamedIntervalList {
    ///
    /// Read an interval list file.
    ///
    /// # Arguments
    /// - path: path to the interval list
    ///
    pub fn from_file<P: AsRef<Path>>(path: P) -> IntervalListResult<Self> {
        let file = File::open(path.as_ref())?;
        let list = Self::read(BufReader::new(file))?;
        info!(
            "Read {} intervals over {} sequences from {}",
            list.len(),
            list.dictionary().len(),
            path.as_ref().display()
        );
        Ok(list)
    }

    /// Read the interval-list text format. The header must come before every row.
    pub fn read<R: BufRead>(reader: R) -> IntervalListResult<Self> {
        let mut records = Vec::new();
        let mut list: Option<NamedIntervalList> = None;

        for (idx, line) in reader.lines().enumerate() {
            let line_no = idx + 1;
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }

            if line.starts_with('@') {
                if list.is_some() {
                    return Err(parse_error(line_no, "header line after the first interval"));
                }
                if line.starts_with("@SQ") {
                    records.push(parse_sq(&line, line_no)?);
                }
                continue;
            }

            // the header ends at the first row
            if list.is_none() {
                let dictionary = SequenceDictionary::new(std::mem::take(&mut records))?;
                list = Some(NamedIntervalList::new(Arc::new(dictionary)));
            }
            if let Some(list) = list.as_mut() {
                list.add(parse_row(&line, line_no)?)?;
            }
        }

        match list {
            Some(list) => Ok(list),
            None => Ok(NamedIntervalList::new(Arc::new(SequenceDictionary::new(records)?))),
        }
    }

    /// Write the header and one row per interval, in list order.
    pub fn write<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        writeln!(out, "@HD\tVN:{HEADER_VERSION}")?;
        for record in self.dictionary().iter() {
            writeln!(out, "@SQ\tSN:{}\tLN:{}", record.name, record.length)?;
        }
        for iv in self.iter() {
            writeln!(
                out,
                "{}\t{}\t{}\t{}\t{}",
                iv.sequence(),
                iv.start(),
                iv.end(),
                iv.strand_char(),
                iv.name().unwrap_or(NO_NAME)
            )?;
        }
        Ok(())
    }

    pub fn write_file<P: AsRef<Path>>(&self, path: P) -> IntervalListResult<()> {
        let mut out = BufWriter::new(File::create(path)?);
        self.write(&mut out)?;
        out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use gcoord_core::errors::DictionaryError;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use std::io::Cursor;

    const TEXT: &str = "@HD\tVN:1.6\tSO:coordinate\n\
                        @SQ\tSN:1\tLN:1000\n\
                        @SQ\tSN:2\tLN:500\n\
                        @PG\tID:test\n\
                        1\t100\t200\t+\ttarget_1\n\
                        2\t5\t9\t-\t.\n";

    #[rstest]
    fn test_read_header_and_rows() {
        let list = NamedIntervalList::read(Cursor::new(TEXT)).unwrap();
        assert_eq!(list.dictionary().len(), 2);
        assert_eq!(list.dictionary().sequence_length("2"), Some(500));
        assert_eq!(list.len(), 2);

        let first = &list.intervals()[0];
        assert_eq!(first, &NamedInterval::new("1", 100, 200));
        assert_eq!(first.name(), Some("target_1"));
        assert!(!first.is_negative_strand());

        let second = &list.intervals()[1];
        assert_eq!(second.name(), None);
        assert!(second.is_negative_strand());
    }

    #[rstest]
    fn test_write_matches_read() {
        let list = NamedIntervalList::read(Cursor::new(TEXT)).unwrap();
        let mut buf = Vec::new();
        list.write(&mut buf).unwrap();

        let text = String::from_utf8(buf).unwrap();
        assert!(text.starts_with("@HD\tVN:1.6\n@SQ\tSN:1\tLN:1000\n"));
        assert!(text.ends_with("2\t5\t9\t-\t.\n"));

        let reread = NamedIntervalList::read(Cursor::new(text)).unwrap();
        assert_eq!(reread, list);
        assert_eq!(reread.intervals()[0].name(), Some("target_1"));
    }

    #[rstest]
    fn test_header_only() {
        let list = NamedIntervalList::read(Cursor::new("@SQ\tSN:chrM\tLN:16569\n")).unwrap();
        assert!(list.is_empty());
        assert_eq!(list.dictionary().len(), 1);
    }

    #[rstest]
    #[case::few_fields("@SQ\tSN:1\tLN:10\n1\t1\t5\t+\n", 2)]
    #[case::bad_strand("@SQ\tSN:1\tLN:10\n1\t1\t5\t*\tx\n", 2)]
    #[case::bad_coordinate("@SQ\tSN:1\tLN:10\n1\tone\t5\t+\tx\n", 2)]
    #[case::bad_length("@SQ\tSN:1\tLN:ten\n", 1)]
    #[case::late_header("@SQ\tSN:1\tLN:10\n1\t1\t5\t+\tx\n@SQ\tSN:2\tLN:10\n", 3)]
    fn test_parse_errors(#[case] text: &str, #[case] expected_line: usize) {
        match NamedIntervalList::read(Cursor::new(text)) {
            Err(IntervalListError::Parse { line, .. }) => assert_eq!(line, expected_line),
            other => panic!("expected a parse error, got {other:?}"),
        }
    }

    #[rstest]
    fn test_row_on_unknown_sequence() {
        let result = NamedIntervalList::read(Cursor::new("@SQ\tSN:1\tLN:10\n2\t1\t5\t+\tx\n"));
        assert!(matches!(
            result,
            Err(IntervalListError::Dictionary(DictionaryError::UnknownSequence(_)))
        ));
    }
}
