use super::{EntryEmitter, Output, INDENT};
use crate::entry::{Entry, Item};

/// Longest field name across the whole list, guarded groups included
pub fn measure_alias_width(items: &[Item]) -> usize {
    items
        .iter()
        .filter_map(Item::entry)
        .map(|entry| entry.alias().chars().count())
        .max()
        .unwrap_or(0)
}

/// Emits `<target>-><alias> = <MACRO>(<target>, <name>);` with the `=` signs in one column.
///
/// The width has to be measured over the complete list before the first
/// line is formatted; see [`LoaderEmitter::for_items`].
pub struct LoaderEmitter<'a> {
    macro_name: &'a str,
    target: &'a str,
    width: usize,
}

impl<'a> LoaderEmitter<'a> {
    pub fn new(macro_name: &'a str, target: &'a str, width: usize) -> Self {
        Self {
            macro_name,
            target,
            width,
        }
    }

    /// Measure `items`, then build an emitter aligned for all of them
    pub fn for_items(macro_name: &'a str, target: &'a str, items: &[Item]) -> Self {
        Self::new(macro_name, target, measure_alias_width(items))
    }

    /// Byte column of the `=` on every emitted line
    pub fn assign_column(&self) -> usize {
        INDENT.len() + self.target.len() + "->".len() + self.width + " ".len()
    }
}

impl EntryEmitter for LoaderEmitter<'_> {
    fn emit(&self, entry: &Entry, output: &mut Output) {
        output.line(
            1,
            &format!(
                "{}->{:<width$} = {}({}, {});",
                self.target,
                entry.alias(),
                self.macro_name,
                self.target,
                entry.name(),
                width = self.width
            ),
        );
    }
}
