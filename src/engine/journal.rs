//! Capture journal
//!
//! Captures are appended here instead of being written into output nodes
//! directly; a production assembles its node from the entries pushed since
//! it started. Rolling back a failed attempt is a truncation to a mark.
//!
//! Entries without a field are nodes produced by references or custom
//! parsers, waiting to be claimed by an enclosing node capture.

use crate::compiler::FieldId;
use crate::output::Value;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Entry {
    pub(crate) field: Option<FieldId>,
    pub(crate) value: Value,
}

#[derive(Debug, Default)]
pub(crate) struct Journal {
    entries: Vec<Entry>,
}

impl Journal {
    pub(crate) fn mark(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn truncate(&mut self, mark: usize) {
        self.entries.truncate(mark);
    }

    pub(crate) fn push_field(&mut self, field: FieldId, value: Value) {
        self.entries.push(Entry {
            field: Some(field),
            value,
        });
    }

    pub(crate) fn push_anonymous(&mut self, value: Value) {
        self.entries.push(Entry { field: None, value });
    }

    /// Remove and return the unclaimed values pushed since `mark`, keeping
    /// field entries in place
    pub(crate) fn take_anonymous(&mut self, mark: usize) -> Vec<Value> {
        if mark >= self.entries.len() {
            return Vec::new();
        }
        let tail = self.entries.split_off(mark);
        let mut anonymous = Vec::new();
        for entry in tail {
            match entry.field {
                Some(_) => self.entries.push(entry),
                None => anonymous.push(entry.value),
            }
        }
        anonymous
    }

    /// Remove and return every entry pushed since `mark`
    pub(crate) fn drain(&mut self, mark: usize) -> Vec<Entry> {
        self.entries.split_off(mark.min(self.entries.len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_rolls_back() {
        let mut journal = Journal::default();
        journal.push_field(FieldId::new(0), Value::Int(1));
        let mark = journal.mark();
        journal.push_field(FieldId::new(0), Value::Int(2));
        journal.push_anonymous(Value::Bool(true));
        journal.truncate(mark);
        assert_eq!(journal.drain(0).len(), 1);
    }

    #[test]
    fn test_take_anonymous_keeps_field_entries() {
        let mut journal = Journal::default();
        journal.push_anonymous(Value::Int(0));
        let mark = journal.mark();
        journal.push_anonymous(Value::Int(1));
        journal.push_field(FieldId::new(2), Value::Text("x".into()));
        journal.push_anonymous(Value::Int(3));

        assert_eq!(journal.take_anonymous(mark), vec![Value::Int(1), Value::Int(3)]);
        let rest = journal.drain(0);
        assert_eq!(rest.len(), 2);
        assert_eq!(rest[0].field, None);
        assert_eq!(rest[1].field, Some(FieldId::new(2)));
        assert!(journal.take_anonymous(0).is_empty());
    }
}
