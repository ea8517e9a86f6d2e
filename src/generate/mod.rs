mod output;
mod members;
mod loaders;
mod extensions;

pub use output::{Output, INDENT};
pub use members::MemberEmitter;
pub use loaders::{measure_alias_width, LoaderEmitter};
pub use extensions::{extension_checks, extension_flag_fields, CheckOptions, Extension};

use crate::condition::ConditionTracker;
use crate::entry::{Entry, Item};

/// Formats the line(s) for a single entry
pub trait EntryEmitter {
    fn emit(&self, entry: &Entry, output: &mut Output);
}

/// Walk an entry sequence, wrapping each run of equally guarded entries in one `#if` block.
///
/// Separators become blank lines without touching the tracker, so a block
/// opened before a separator stays open across it.
pub fn emit_items(items: &[Item], emitter: &dyn EntryEmitter) -> Vec<String> {
    let mut output = Output::new();
    let mut tracker = ConditionTracker::new();

    for item in items {
        match item {
            Item::Separator => output.blank(),
            Item::Entry(entry) => {
                let condition = entry.condition();
                output.extend(tracker.process(condition.as_deref()));
                emitter.emit(entry, &mut output);
            }
        }
    }
    output.extend(tracker.finish());

    output.finish()
}
