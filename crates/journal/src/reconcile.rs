use crate::{Journal, JournalError, SelectiveSyncList};

/// Reconciles the persisted selective-sync baseline with the list supplied
/// for the current run.
///
/// When the journal has no prior persisted state this is a no-op: a first run
/// has no cached metadata to invalidate. Otherwise every folder present in
/// exactly one of the two lists (removed from exclusion, or newly excluded)
/// has its cached state invalidated, and `new_list` becomes the baseline.
///
/// # Errors
///
/// Returns [`JournalError`] when the updated document cannot be persisted.
pub fn reconcile_selective_sync(
    journal: &mut Journal,
    new_list: &SelectiveSyncList,
) -> Result<(), JournalError> {
    if !journal.exists() {
        return Ok(());
    }

    let old_baseline = journal.selective_sync_list();
    let old_set = old_baseline.as_set();
    let new_set = new_list.as_set();

    let mut changed = 0_usize;
    for folder in old_set.symmetric_difference(&new_set) {
        journal.avoid_read_on_next_sync(folder);
        changed += 1;
    }
    if changed > 0 {
        tracing::info!(changed, "selective sync list changed, cached state invalidated");
    }

    journal.set_selective_sync_list(new_list);
    journal.flush()
}

#[cfg(test)]
mod tests {
    use super::reconcile_selective_sync;
    use crate::{Journal, SelectiveSyncList};

    #[test]
    fn first_run_changes_nothing() {
        let dir = tempfile::tempdir().expect("temp dir");
        let mut journal = Journal::open(dir.path()).expect("open");

        let list = SelectiveSyncList::from_folders(["A"]);
        reconcile_selective_sync(&mut journal, &list).expect("reconcile");

        // no baseline existed, so nothing was invalidated and nothing written
        assert!(journal.untrusted_folders().is_empty());
        assert!(!dir.path().join(crate::JOURNAL_FILE_NAME).exists());
    }

    #[test]
    fn symmetric_difference_is_invalidated_and_baseline_replaced() {
        let dir = tempfile::tempdir().expect("temp dir");

        let mut journal = Journal::open(dir.path()).expect("open");
        journal.set_selective_sync_list(&SelectiveSyncList::from_folders(["A", "B"]));
        journal.flush().expect("seed baseline");

        let new_list = SelectiveSyncList::from_folders(["B", "C"]);
        reconcile_selective_sync(&mut journal, &new_list).expect("reconcile");

        let mut untrusted = journal.untrusted_folders();
        untrusted.sort();
        assert_eq!(untrusted, vec!["A/".to_owned(), "C/".to_owned()]);
        assert!(journal.is_cached_state_trusted("B/"));

        let reloaded = Journal::open(dir.path()).expect("reopen");
        assert_eq!(reloaded.selective_sync_list(), new_list);
    }

    #[test]
    fn unchanged_list_invalidates_nothing() {
        let dir = tempfile::tempdir().expect("temp dir");

        let mut journal = Journal::open(dir.path()).expect("open");
        journal.set_selective_sync_list(&SelectiveSyncList::from_folders(["A"]));
        journal.flush().expect("seed baseline");

        // the supplied list differs only in normalization, not in content
        let same = SelectiveSyncList::from_folders(["A/"]);
        reconcile_selective_sync(&mut journal, &same).expect("reconcile");

        assert!(journal.untrusted_folders().is_empty());
    }

    #[test]
    fn duplicates_collapse_before_comparison() {
        let dir = tempfile::tempdir().expect("temp dir");

        let mut journal = Journal::open(dir.path()).expect("open");
        journal.set_selective_sync_list(&SelectiveSyncList::from_folders(["A", "A"]));
        journal.flush().expect("seed baseline");

        let new_list = SelectiveSyncList::from_folders(["A"]);
        reconcile_selective_sync(&mut journal, &new_list).expect("reconcile");

        assert!(journal.untrusted_folders().is_empty());
    }
}
