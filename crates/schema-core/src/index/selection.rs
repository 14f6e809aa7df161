//! Selection continuity across query changes.
//!
//! When a view's result set is recomputed, the previously selected row should
//! stay selected if its name still matches. Otherwise the selection stays near
//! where it was, or disappears if nothing matches any more.

use crate::index::result_set::ResultSet;
use tracing::debug;

/// Decide which row of `results` is selected after a recomputation.
///
/// * `previous_index` - selected row in the old result set, if any
/// * `previous_value` - name that was selected, `None` if nothing was
/// * `results` / `names` - the new result set and the name list it indexes
///
/// Rules, in order:
/// 1. Nothing was selected: select row 0 if there are rows.
/// 2. The previous name is still present: select its row.
/// 3. No rows: select nothing.
/// 4. Otherwise keep the previous row index, snapped to the last row.
pub fn track_selection(
    previous_index: Option<usize>,
    previous_value: Option<&str>,
    results: &ResultSet,
    names: &[String],
) -> Option<usize> {
    let Some(previous_value) = previous_value else {
        return (!results.is_empty()).then_some(0);
    };

    if let Some(row) = results.row_of(previous_value, names) {
        debug!("Selection {} kept at row {}", previous_value, row);
        return Some(row);
    }

    if results.is_empty() {
        return None;
    }

    let row = previous_index.unwrap_or(0).min(results.len() - 1);
    debug!(
        "Selection {} no longer matches, moving to row {}",
        previous_value, row
    );
    Some(row)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::query::QueryKey;
    use crate::index::result_set::filter;

    fn fruit() -> Vec<String> {
        ["APPLE", "APPLEPIE", "BANANA"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    #[test]
    fn test_nothing_selected_picks_first_row() {
        let names = fruit();
        let results = filter(&names, &QueryKey::build("A"));
        assert_eq!(track_selection(None, None, &results, &names), Some(0));
    }

    #[test]
    fn test_nothing_selected_and_no_rows() {
        let names = fruit();
        let results = filter(&names, &QueryKey::build("ZZZ"));
        assert_eq!(track_selection(None, None, &results, &names), None);
    }

    #[test]
    fn test_previous_name_still_present() {
        let names = fruit();
        let results = filter(&names, &QueryKey::build("AN"));
        assert_eq!(
            track_selection(Some(2), Some("BANANA"), &results, &names),
            Some(0)
        );

        let results = filter(&names, &QueryKey::build(""));
        assert_eq!(
            track_selection(Some(0), Some("APPLEPIE"), &results, &names),
            Some(1)
        );
    }

    #[test]
    fn test_narrowed_away_clamps_to_last_row() {
        let names = fruit();
        let results = filter(&names, &QueryKey::build("PIE"));
        assert_eq!(results.len(), 1);
        assert_eq!(
            track_selection(Some(1), Some("APPLE"), &results, &names),
            Some(0)
        );
    }

    #[test]
    fn test_narrowed_away_keeps_index_in_range() {
        let names: Vec<String> = ["AA1", "AA2", "AB1", "AB2", "AC1"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let results = filter(&names, &QueryKey::build("A"));
        assert_eq!(
            track_selection(Some(1), Some("GONE"), &results, &names),
            Some(1)
        );
        let results = filter(&names, &QueryKey::build("2"));
        assert_eq!(
            track_selection(Some(4), Some("AC1"), &results, &names),
            Some(1)
        );
    }

    #[test]
    fn test_previous_name_gone_and_no_rows() {
        let names = fruit();
        let results = filter(&names, &QueryKey::build("ZZZ"));
        assert_eq!(
            track_selection(Some(0), Some("APPLE"), &results, &names),
            None
        );
    }

    #[test]
    fn test_value_without_index_falls_back_to_first_row() {
        let names = fruit();
        let results = filter(&names, &QueryKey::build("AN"));
        assert_eq!(
            track_selection(None, Some("APPLE"), &results, &names),
            Some(0)
        );
    }
}
