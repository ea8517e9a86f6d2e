use super::{EntryEmitter, Output};
use crate::entry::Entry;

/// Declares one dispatch-table field: `PFN_<name> <alias>;`
pub struct MemberEmitter;

impl EntryEmitter for MemberEmitter {
    fn emit(&self, entry: &Entry, output: &mut Output) {
        output.line(1, &format!("PFN_{} {};", entry.name(), entry.alias()));
    }
}
