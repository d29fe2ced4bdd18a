use std::{error::Error, str::FromStr};

use serde::{Deserialize, Serialize};

pub mod flow;
pub mod history;

/// Deployment label attached to a run.
///
/// Purely descriptive: the simulated pipeline behaves identically for every
/// variant, and the chosen label is echoed back in the output envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Deployment {
    V1,
    #[default]
    V2,
    V3,
}

impl Deployment {
    /// All selectable deployments, in selector order.
    pub const ALL: [Deployment; 3] = [Deployment::V1, Deployment::V2, Deployment::V3];

    /// Label as shown in the selector and written into the envelope.
    pub fn as_str(&self) -> &'static str {
        match self {
            Deployment::V1 => "v1",
            Deployment::V2 => "v2",
            Deployment::V3 => "v3",
        }
    }
}

impl std::fmt::Display for Deployment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Deployment {
    type Err = ParseDeploymentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "v1" => Ok(Self::V1),
            "v2" => Ok(Self::V2),
            "v3" => Ok(Self::V3),
            _ => Err(ParseDeploymentError),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseDeploymentError;

impl std::fmt::Display for ParseDeploymentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("invalid deployment; expected 'v1', 'v2' or 'v3'")
    }
}

impl Error for ParseDeploymentError {}

/// Messages that can be sent to update the application state.
///
/// Key and mouse input is routed to components directly; messages carry only
/// the asynchronous events the update loop multiplexes.
#[derive(Debug, Clone)]
pub enum Msg {
    /// Periodic UI tick (throbbers, notice expiry)
    Tick,
    /// Terminal resized
    Resize(u16, u16),
    /// Event from the active run's driver, tagged with its run id
    FlowRun(u64, flow::FlowRunEvent),
}

/// Side effects that can be triggered by state changes.
///
/// This enum defines actions that should be performed as a result of state
/// changes, such as switching views or copying to the clipboard.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Change the main view
    SwitchTo(Route),
    /// Start a new simulated run, superseding any in-flight one
    StartRun(flow::FlowRunRequest),
    /// Request to copy the rendered output to the clipboard
    CopyToClipboardRequested(String),
    /// Request to save the rendered output to the export file
    SaveOutputRequested(String),
}

/// Top-level views reachable from the navigation bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Trigger,
    History,
}

/// Zero-based page cursor over a fixed-size row collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    /// Zero-based index of the current page
    pub page: usize,
    /// Rows shown per page
    pub page_size: usize,
}

impl Pagination {
    /// Cursor at the first page.
    pub fn new(page_size: usize) -> Self {
        Self { page: 0, page_size }
    }

    /// Total pages for `len` rows. Never less than 1 so an empty table still
    /// renders "Page 1 of 1".
    pub fn page_count(&self, len: usize) -> usize {
        let size = self.page_size.max(1);
        len.div_ceil(size).max(1)
    }

    pub fn can_previous(&self) -> bool {
        self.page > 0
    }

    pub fn can_next(&self, len: usize) -> bool {
        self.page + 1 < self.page_count(len)
    }

    /// Moves back one page when possible.
    pub fn previous(&mut self) {
        if self.can_previous() {
            self.page -= 1;
        }
    }

    /// Moves forward one page when possible.
    pub fn next(&mut self, len: usize) {
        if self.can_next(len) {
            self.page += 1;
        }
    }

    /// Row indices visible on the current page.
    pub fn row_range(&self, len: usize) -> std::ops::Range<usize> {
        let start = (self.page * self.page_size).min(len);
        let end = (start + self.page_size).min(len);
        start..end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deployment_labels_round_trip() {
        for deployment in Deployment::ALL {
            let parsed: Deployment = deployment.as_str().parse().expect("parse deployment label");
            assert_eq!(parsed, deployment);
        }
        assert!("v4".parse::<Deployment>().is_err());
        assert_eq!(Deployment::default(), Deployment::V2);
    }

    #[test]
    fn deployment_serializes_as_lowercase_label() {
        let json = serde_json::to_string(&Deployment::V3).expect("serialize deployment");
        assert_eq!(json, "\"v3\"");
    }

    #[test]
    fn pagination_splits_eight_rows_into_two_pages() {
        let mut pager = Pagination::new(6);
        assert_eq!(pager.page_count(8), 2);
        assert!(!pager.can_previous());
        assert!(pager.can_next(8));
        assert_eq!(pager.row_range(8), 0..6);

        pager.next(8);
        assert_eq!(pager.page, 1);
        assert!(pager.can_previous());
        assert!(!pager.can_next(8));
        assert_eq!(pager.row_range(8), 6..8);

        // Clamped at the ends.
        pager.next(8);
        assert_eq!(pager.page, 1);
        pager.previous();
        pager.previous();
        assert_eq!(pager.page, 0);
    }

    #[test]
    fn pagination_handles_empty_collection() {
        let pager = Pagination::new(6);
        assert_eq!(pager.page_count(0), 1);
        assert!(!pager.can_next(0));
        assert_eq!(pager.row_range(0), 0..0);
    }
}
