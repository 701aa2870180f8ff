use std::collections::HashMap;

use crate::errors::DictionaryError;

///
/// One named sequence of a coordinate system.
///
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SequenceRecord {
    pub name: String,
    pub length: u32,
}

impl SequenceRecord {
    pub fn new(name: impl Into<String>, length: u32) -> Self {
        SequenceRecord {
            name: name.into(),
            length,
        }
    }
}

///
/// The ordered list of sequences (and their lengths) that defines a coordinate system.
///
#[derive(Debug, Clone, Default)]
pub struct SequenceDictionary {
    records: Vec<SequenceRecord>,
    index: HashMap<String, usize>,
}

impl SequenceDictionary {
    ///
    /// Build a dictionary, rejecting repeated sequence names.
    ///
    pub fn new(records: Vec<SequenceRecord>) -> Result<Self, DictionaryError> {
        let mut index = HashMap::with_capacity(records.len());
        for (i, record) in records.iter().enumerate() {
            if index.insert(record.name.clone(), i).is_some() {
                return Err(DictionaryError::DuplicateSequence(record.name.clone()));
            }
        }
        Ok(SequenceDictionary { records, index })
    }

    pub fn get(&self, name: &str) -> Option<&SequenceRecord> {
        self.index.get(name).map(|&i| &self.records[i])
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn sequence_length(&self, name: &str) -> Option<u32> {
        self.get(name).map(|r| r.length)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SequenceRecord> {
        self.records.iter()
    }

    pub fn records(&self) -> &[SequenceRecord] {
        &self.records
    }

    /// Total number of bases over every sequence.
    pub fn reference_length(&self) -> u64 {
        self.records.iter().map(|r| r.length as u64).sum()
    }

    ///
    /// Check that `other` describes the same coordinate system: same names, same
    /// lengths, same order.
    ///
    pub fn assert_same_dictionary(&self, other: &SequenceDictionary) -> Result<(), DictionaryError> {
        if self.records.len() != other.records.len() {
            return Err(DictionaryError::Mismatch(format!(
                "{} sequences vs {} sequences",
                self.records.len(),
                other.records.len()
            )));
        }

        for (a, b) in self.records.iter().zip(other.records.iter()) {
            if a.name != b.name {
                return Err(DictionaryError::Mismatch(format!(
                    "sequence {} vs {}",
                    a.name, b.name
                )));
            }
            if a.length != b.length {
                return Err(DictionaryError::Mismatch(format!(
                    "sequence {} has length {} vs {}",
                    a.name, a.length, b.length
                )));
            }
        }
        Ok(())
    }
}

impl PartialEq for SequenceDictionary {
    fn eq(&self, other: &Self) -> bool {
        self.records == other.records
    }
}

impl Eq for SequenceDictionary {}

impl TryFrom<Vec<(String, u32)>> for SequenceDictionary {
    type Error = DictionaryError;

    fn try_from(value: Vec<(String, u32)>) -> Result<Self, Self::Error> {
        SequenceDictionary::new(
            value
                .into_iter()
                .map(|(name, length)| SequenceRecord { name, length })
                .collect(),
        )
    }
}

impl<'a> IntoIterator for &'a SequenceDictionary {
    type Item = &'a SequenceRecord;
    type IntoIter = std::slice::Iter<'a, SequenceRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};

    #[fixture]
    fn dictionary() -> SequenceDictionary {
        SequenceDictionary::new(vec![
            SequenceRecord::new("1", 249250621),
            SequenceRecord::new("2", 243199373),
            SequenceRecord::new("3", 198022430),
        ])
        .unwrap()
    }

    #[rstest]
    fn test_lookup(dictionary: SequenceDictionary) {
        assert_eq!(dictionary.len(), 3);
        assert_eq!(dictionary.index_of("2"), Some(1));
        assert_eq!(dictionary.sequence_length("3"), Some(198022430));
        assert_eq!(dictionary.get("chr1"), None);
        assert_eq!(dictionary.reference_length(), 690472424);
        let names: Vec<&str> = dictionary.records().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["1", "2", "3"]);
    }

    #[rstest]
    fn test_duplicate_rejected() {
        let result = SequenceDictionary::new(vec![
            SequenceRecord::new("1", 10),
            SequenceRecord::new("1", 20),
        ]);
        assert_eq!(
            result.unwrap_err(),
            DictionaryError::DuplicateSequence("1".to_string())
        );
    }

    #[rstest]
    fn test_same_dictionary(dictionary: SequenceDictionary) {
        assert!(dictionary.assert_same_dictionary(&dictionary.clone()).is_ok());

        let shorter = SequenceDictionary::new(vec![
            SequenceRecord::new("1", 249250621),
            SequenceRecord::new("2", 243199373),
        ])
        .unwrap();
        assert!(dictionary.assert_same_dictionary(&shorter).is_err());

        let relength = SequenceDictionary::new(vec![
            SequenceRecord::new("1", 249250621),
            SequenceRecord::new("2", 243199373),
            SequenceRecord::new("3", 1),
        ])
        .unwrap();
        assert!(matches!(
            dictionary.assert_same_dictionary(&relength),
            Err(DictionaryError::Mismatch(_))
        ));
    }
}
