//! Filtering a sorted name list down to the positions matching a key.
//!
//! A pass is a linear scan over the names, testing every term per candidate.
//! Because the base list is sorted and positions are emitted in ascending
//! order, every result is itself alphabetical.

use crate::config::SearchConfig;
use crate::index::interrupt::SearchInterrupt;
use crate::index::query::QueryKey;
use crate::Result;

/// Ordered positions into a sorted name list whose names satisfy a key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultSet {
    positions: Vec<usize>,
}

impl ResultSet {
    /// Every position of a list of `count` names.
    pub fn all(count: usize) -> Self {
        Self {
            positions: (0..count).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn positions(&self) -> &[usize] {
        &self.positions
    }

    /// Position in the base list for a result row.
    pub fn get(&self, row: usize) -> Option<usize> {
        self.positions.get(row).copied()
    }

    /// Name shown at a result row.
    pub fn name_at<'a>(&self, row: usize, names: &'a [String]) -> Option<&'a str> {
        self.get(row)
            .and_then(|position| names.get(position))
            .map(String::as_str)
    }

    /// Result row holding exactly `name`, if any.
    pub fn row_of(&self, name: &str, names: &[String]) -> Option<usize> {
        self.positions
            .iter()
            .position(|&position| names.get(position).is_some_and(|n| n == name))
    }

    /// Names of all result rows, in order.
    pub fn names<'a>(&'a self, names: &'a [String]) -> impl Iterator<Item = &'a str> + 'a {
        self.positions
            .iter()
            .filter_map(move |&position| names.get(position).map(String::as_str))
    }
}

impl FromIterator<usize> for ResultSet {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        Self {
            positions: iter.into_iter().collect(),
        }
    }
}

/// Lazily yield the positions of names matching `key`.
pub fn matching_positions<'a>(
    names: &'a [String],
    key: &'a QueryKey,
) -> impl Iterator<Item = usize> + 'a {
    names
        .iter()
        .enumerate()
        .filter(move |(_, name)| key.matches(name))
        .map(|(position, _)| position)
}

/// Compute the positions of `names` (sorted ascending) that match `key`.
pub fn filter(names: &[String], key: &QueryKey) -> ResultSet {
    if key.is_empty() {
        return ResultSet::all(names.len());
    }
    matching_positions(names, key).collect()
}

/// Like [`filter`], checking `interrupt` between chunks of names.
///
/// Returns [`crate::SchemaError::Interrupted`] if the running pass was
/// interrupted; the partial result is discarded.
pub fn filter_interruptible(
    names: &[String],
    key: &QueryKey,
    interrupt: &SearchInterrupt,
) -> Result<ResultSet> {
    interrupt.check()?;
    if key.is_empty() {
        return Ok(ResultSet::all(names.len()));
    }

    let step = SearchConfig::INTERRUPT_CHECK_INTERVAL;
    let mut positions = Vec::new();
    for (chunk_index, chunk) in names.chunks(step).enumerate() {
        interrupt.check()?;
        let offset = chunk_index * step;
        positions.extend(
            chunk
                .iter()
                .enumerate()
                .filter(|(_, name)| key.matches(name))
                .map(|(i, _)| offset + i),
        );
    }

    Ok(ResultSet { positions })
}
