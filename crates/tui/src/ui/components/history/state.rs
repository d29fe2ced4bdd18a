//! State for the history view.

use flowtty_types::Pagination;
use flowtty_types::history::{ExecutionRecord, Feedback, ReleaseInfo, ReleaseSummary};

use super::seed;

/// Rows shown per table page.
pub const PAGE_SIZE: usize = 6;

/// Focusable controls in the history view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryFocus {
    Table,
    Previous,
    Next,
}

/// Mutable state backing the history view. Seeded at construction; the only
/// fields user interaction changes are row expansion, feedback, the page
/// cursor, and the selection.
#[derive(Debug)]
pub struct HistoryViewState {
    pub records: Vec<ExecutionRecord>,
    pub releases: Vec<ReleaseSummary>,
    pub release_info: ReleaseInfo,
    pub pagination: Pagination,
    /// Selected row, relative to the current page.
    pub selected: usize,
    /// Execution id whose feedback is being edited, if any.
    pub editing_feedback: Option<String>,
    pub focus: HistoryFocus,
}

impl HistoryViewState {
    pub fn new() -> Self {
        Self {
            records: seed::execution_records(),
            releases: seed::release_summaries(),
            release_info: seed::release_info(),
            pagination: Pagination::new(PAGE_SIZE),
            selected: 0,
            editing_feedback: None,
            focus: HistoryFocus::Table,
        }
    }

    /// Records on the current page.
    pub fn visible_records(&self) -> &[ExecutionRecord] {
        let range = self.pagination.row_range(self.records.len());
        &self.records[range]
    }

    pub fn page_row_count(&self) -> usize {
        self.pagination.row_range(self.records.len()).len()
    }

    /// Absolute index of the selected row, when the page has one.
    pub fn selected_record_index(&self) -> Option<usize> {
        let range = self.pagination.row_range(self.records.len());
        let index = range.start + self.selected;
        range.contains(&index).then_some(index)
    }

    pub fn selected_record(&self) -> Option<&ExecutionRecord> {
        self.selected_record_index()
            .map(|index| &self.records[index])
    }

    pub fn select_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn select_down(&mut self) {
        let last = self.page_row_count().saturating_sub(1);
        self.selected = (self.selected + 1).min(last);
    }

    /// Selects `row` on the current page; out-of-range rows are ignored.
    pub fn select_row(&mut self, row: usize) {
        if row < self.page_row_count() {
            self.selected = row;
        }
    }

    pub fn next_page(&mut self) {
        self.pagination.next(self.records.len());
        self.after_page_change();
    }

    pub fn previous_page(&mut self) {
        self.pagination.previous();
        self.after_page_change();
    }

    fn after_page_change(&mut self) {
        let last = self.page_row_count().saturating_sub(1);
        self.selected = self.selected.min(last);
        self.editing_feedback = None;
    }

    /// Flips the detail expansion of the selected record.
    pub fn toggle_selected_expanded(&mut self) {
        if let Some(index) = self.selected_record_index() {
            let record = &mut self.records[index];
            record.expanded = !record.expanded;
        }
    }

    /// Puts the selected record's feedback cell into edit mode.
    pub fn start_feedback_edit(&mut self) {
        self.editing_feedback = self
            .selected_record()
            .map(|record| record.execution_id.clone());
    }

    pub fn cancel_feedback_edit(&mut self) {
        self.editing_feedback = None;
    }

    /// Applies `feedback` to the record being edited and leaves edit mode.
    pub fn set_feedback(&mut self, feedback: Feedback) {
        let Some(editing_id) = self.editing_feedback.take() else {
            return;
        };
        if let Some(record) = self
            .records
            .iter_mut()
            .find(|record| record.execution_id == editing_id)
        {
            record.feedback = Some(feedback);
        }
    }

    pub fn is_editing_feedback(&self, execution_id: &str) -> bool {
        self.editing_feedback.as_deref() == Some(execution_id)
    }
}

impl Default for HistoryViewState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_history_spans_two_pages() {
        let mut state = HistoryViewState::new();
        assert_eq!(state.records.len(), 8);
        assert_eq!(state.pagination.page_count(state.records.len()), 2);
        assert_eq!(state.visible_records().len(), 6);

        state.next_page();
        assert_eq!(state.visible_records().len(), 2);
        assert_eq!(
            state.visible_records()[0].execution_id.as_str(),
            "exe_942fv67d"
        );

        // Forward motion stops at the last page.
        state.next_page();
        assert_eq!(state.pagination.page, 1);
    }

    #[test]
    fn page_changes_clamp_the_selection() {
        let mut state = HistoryViewState::new();
        for _ in 0..10 {
            state.select_down();
        }
        assert_eq!(state.selected, 5);

        state.next_page();
        assert_eq!(state.selected, 1);

        state.previous_page();
        assert_eq!(state.selected, 1);
    }

    #[test]
    fn expansion_toggles_only_the_selected_record() {
        let mut state = HistoryViewState::new();
        state.select_down();
        state.toggle_selected_expanded();
        assert!(state.records[1].expanded);
        assert!(!state.records[0].expanded);

        // A second row opening and closing leaves the first row alone.
        state.select_down();
        state.toggle_selected_expanded();
        state.toggle_selected_expanded();
        assert!(state.records[1].expanded);
        assert!(!state.records[2].expanded);

        state.select_up();
        state.toggle_selected_expanded();
        assert!(!state.records[1].expanded);
    }

    #[test]
    fn feedback_edit_targets_the_record_it_started_on() {
        let mut state = HistoryViewState::new();
        state.select_down();
        state.select_down();
        state.start_feedback_edit();
        assert!(state.is_editing_feedback("exe_d873fe1e"));

        // Selection may move; the edit still lands on the original record.
        state.select_up();
        state.set_feedback(Feedback::Like);
        assert_eq!(state.records[2].feedback, Some(Feedback::Like));
        assert!(state.editing_feedback.is_none());
    }

    #[test]
    fn cancelling_a_feedback_edit_leaves_the_record_unchanged() {
        let mut state = HistoryViewState::new();
        state.start_feedback_edit();
        state.cancel_feedback_edit();
        state.set_feedback(Feedback::Dislike);
        assert_eq!(state.records[0].feedback, Some(Feedback::Like));
    }
}
