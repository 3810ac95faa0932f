/// The viewer's active strand selection, kept in the role strand
use crate::config::StrandingConfig;
use crate::storage::StrandStorage;
use crate::store::StrandStore;
use crate::strand::StrandValue;

/// Active labels as last stored; empty when nothing is stored or the
/// store cannot be read.
pub fn initial_selection<S: StrandStorage>(
    store: &StrandStore<S>,
    config: &StrandingConfig,
) -> Vec<String> {
    store
        .get_strand(&config.role_strand)
        .map(|strand| strand.value.labels())
        .unwrap_or_default()
}

/// Turn `label` on or off, returning the selection in vocabulary order.
///
/// Labels outside the vocabulary that were already selected (set by another
/// script) are kept after the vocabulary labels.
pub fn toggle(selection: &[String], label: &str, checked: bool, vocabulary: &[String]) -> Vec<String> {
    let is_selected = |candidate: &str| {
        if candidate == label {
            checked
        } else {
            selection.iter().any(|s| s == candidate)
        }
    };

    let mut next: Vec<String> = vocabulary
        .iter()
        .filter(|v| is_selected(v.as_str()))
        .cloned()
        .collect();

    let toggled = label.to_string();
    for extra in selection.iter().chain(std::iter::once(&toggled)) {
        if !vocabulary.contains(extra) && is_selected(extra.as_str()) && !next.contains(extra) {
            next.push(extra.clone());
        }
    }
    next
}

/// Persist a new selection. The caller has already applied it to UI state;
/// a `false` return is not rolled back.
pub fn commit<S: StrandStorage>(
    store: &StrandStore<S>,
    config: &StrandingConfig,
    selection: &[String],
) -> bool {
    store.set_strand(&config.role_strand, StrandValue::Many(selection.to_vec()))
}
