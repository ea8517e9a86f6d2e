use std::path::Path;

use crate::error::GenError;

/// Marker lines around a generated region. Matched against whole lines, verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sentinels<'a> {
    pub begin: &'a str,
    pub end: &'a str,
}

/// Index of the first line at or after `from` equal to `sentinel`
pub fn find_sentinel<S: AsRef<str>>(lines: &[S], sentinel: &str, from: usize) -> Option<usize> {
    lines
        .iter()
        .enumerate()
        .skip(from)
        .find(|(_, line)| line.as_ref() == sentinel)
        .map(|(index, _)| index)
}

/// Replace the lines strictly between the sentinels with `body`.
///
/// Both sentinel lines are kept. The end sentinel is the first one after the
/// begin sentinel. `artifact` only names the document in errors.
pub fn splice<S: AsRef<str>>(
    lines: &[S],
    sentinels: Sentinels<'_>,
    body: &[String],
    artifact: &Path,
) -> Result<Vec<String>, GenError> {
    let not_found = |sentinel: &str| GenError::SentinelNotFound {
        sentinel: sentinel.to_string(),
        artifact: artifact.to_path_buf(),
    };

    let begin = find_sentinel(lines, sentinels.begin, 0).ok_or_else(|| not_found(sentinels.begin))?;
    let end = find_sentinel(lines, sentinels.end, begin + 1).ok_or_else(|| not_found(sentinels.end))?;

    let mut result = Vec::with_capacity(begin + 1 + body.len() + (lines.len() - end));
    result.extend(lines[..=begin].iter().map(|line| line.as_ref().to_string()));
    result.extend(body.iter().cloned());
    result.extend(lines[end..].iter().map(|line| line.as_ref().to_string()));
    Ok(result)
}

/// Join lines into file text ending in exactly one newline
pub fn render_document<S: AsRef<str>>(lines: &[S]) -> String {
    let joined = lines
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join("\n");
    let mut text = joined.trim_end_matches('\n').to_string();
    text.push('\n');
    text
}
