/// Tracks the currently open `#if` so runs of equally guarded lines share one block.
///
/// Only adjacent equal conditions collapse; a condition that reappears after a
/// different one is opened again.
#[derive(Debug, Default)]
pub struct ConditionTracker {
    current: Option<String>,
}

impl ConditionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Condition of the block currently open, if any
    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// Move to `condition`, returning the directive lines needed to get there
    pub fn process(&mut self, condition: Option<&str>) -> Vec<String> {
        let mut lines = Vec::new();

        if let Some(open) = self.current.as_deref() {
            if Some(open) != condition {
                lines.push(close_directive(open));
                lines.push(String::new());
                self.current = None;
            }
        }

        if self.current.as_deref() != condition {
            if let Some(new) = condition {
                lines.push(open_directive(new));
                self.current = Some(new.to_string());
            }
        }

        lines
    }

    /// Close whatever block is still open at the end of a stream
    pub fn finish(&mut self) -> Vec<String> {
        self.process(None)
    }
}

fn open_directive(condition: &str) -> String {
    format!("#if {}", condition)
}

fn close_directive(condition: &str) -> String {
    format!("#endif  // {}", condition)
}
