//! State of the searchable, paginated tools table.
//!
//! The table never performs I/O itself. Operations that need data hand out a request
//! ([`SearchTicket`], [`EntriesRequest`]); the caller fetches it and feeds the result back.
//! Results for requests that were superseded in the meantime are dropped.

use super::api::ClientError;
use crate::models::{Tool, VoteOutcome};
use crate::pagination::{page_count, Page};
use crate::response::EntriesBody;
use crate::search::SearchTerm;
use crate::view::EntriesView;
use std::collections::HashMap;

/// A search the table is waiting for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchTicket {
    pub seq: u64,
    pub term: SearchTerm,
}

/// A page fetch the table is waiting for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EntriesRequest {
    pub view: EntriesView,
    pub page: Page,
    /// Search generation the request was issued under.
    seq: u64,
}

#[derive(Clone, Debug, Default)]
pub struct SearchTable {
    view: EntriesView,
    page: u32,
    searching: bool,
    rows: Vec<Tool>,
    max_count: u64,
    first_pages: HashMap<EntriesView, EntriesBody>,
    seq: u64,
}

impl SearchTable {
    pub fn new() -> Self {
        SearchTable {
            page: 1,
            ..Default::default()
        }
    }

    /// Install the first page of both views and show the standard one.
    pub fn load(&mut self, standard: EntriesBody, recently_added: EntriesBody) {
        self.first_pages.insert(EntriesView::Standard, standard);
        self.first_pages.insert(EntriesView::RecentlyAdded, recently_added);
        self.view = EntriesView::Standard;
        self.show_first_page();
    }

    pub fn rows(&self) -> &[Tool] {
        &self.rows
    }

    pub fn view(&self) -> EntriesView {
        self.view
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn is_searching(&self) -> bool {
        self.searching
    }

    /// Row count the pager is sized from: total tools, or 1 while showing search results.
    pub fn max_count(&self) -> u64 {
        self.max_count
    }

    pub fn total_pages(&self) -> u32 {
        page_count(self.max_count)
    }

    fn show_first_page(&mut self) {
        let (rows, count) = self
            .first_pages
            .get(&self.view)
            .map(|b| (b.tools.clone(), b.count))
            .unwrap_or_default();
        self.rows = rows;
        self.max_count = count;
        self.page = 1;
    }

    /// React to the search input. Returns the search to run, or `None` when the input is too
    /// short, in which case search mode ends and the active view's first page is shown again.
    pub fn begin_search(&mut self, input: &str) -> Option<SearchTicket> {
        self.seq += 1;
        let term = SearchTerm::parse(input);
        if term.is_searchable() {
            return Some(SearchTicket { seq: self.seq, term });
        }
        self.searching = false;
        self.show_first_page();
        None
    }

    /// Apply search results. Returns false when the ticket was superseded.
    pub fn finish_search(&mut self, ticket: &SearchTicket, rows: Vec<Tool>) -> bool {
        if ticket.seq != self.seq {
            tracing::debug!(term = %ticket.term.as_str(), "dropping stale search results");
            return false;
        }
        self.rows = rows;
        self.page = 1;
        self.max_count = 1;
        self.searching = true;
        true
    }

    /// Switch between the standard and recently added views. Returns false if already active.
    pub fn change_view(&mut self, view: EntriesView) -> bool {
        if view == self.view {
            return false;
        }
        self.view = view;
        self.show_first_page();
        true
    }

    /// Page fetch for the pager, or `None` while searching or when `n` is the current page.
    pub fn page_request(&self, n: u32) -> Option<EntriesRequest> {
        if self.searching || n == self.page {
            return None;
        }
        Some(EntriesRequest {
            view: self.view,
            page: Page::new(n),
            seq: self.seq,
        })
    }

    /// Apply a fetched page. Failures and superseded requests leave the table unchanged.
    pub fn finish_page(&mut self, request: &EntriesRequest, result: Result<Vec<Tool>, ClientError>) -> bool {
        let rows = match result {
            Ok(rows) => rows,
            Err(e) => {
                tracing::error!(
                    view = %request.view,
                    page = request.page.number(),
                    error = %e,
                    "An error happened while trying to paginate through the results"
                );
                return false;
            }
        };
        if request.view != self.view || request.seq != self.seq || self.searching {
            tracing::debug!(view = %request.view, page = request.page.number(), "dropping stale page");
            return false;
        }
        self.rows = rows;
        self.page = request.page.number();
        true
    }

    /// Reflect a vote outcome in every copy of the tool the table holds.
    pub fn apply_vote(&mut self, outcome: &VoteOutcome) {
        let cached = self.first_pages.values_mut().flat_map(|b| b.tools.iter_mut());
        for tool in self.rows.iter_mut().chain(cached) {
            if tool.id == outcome.tool_id {
                tool.upvotes = outcome.upvotes;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn tool(id: i64, name: &str) -> Tool {
        Tool {
            id,
            name: name.to_string(),
            description: None,
            website_url: None,
            github_url: None,
            submitted_by: None,
            upvotes: 0,
            created_at: Utc::now(),
            categories: Vec::new(),
        }
    }

    fn loaded() -> SearchTable {
        let mut table = SearchTable::new();
        table.load(
            EntriesBody {
                tools: vec![tool(1, "ripgrep"), tool(2, "fd")],
                count: 42,
            },
            EntriesBody {
                tools: vec![tool(9, "zoxide")],
                count: 42,
            },
        );
        table
    }

    fn names(table: &SearchTable) -> Vec<&str> {
        table.rows().iter().map(|t| t.name.as_str()).collect()
    }

    #[test]
    fn load_shows_standard_view() {
        let table = loaded();
        assert_eq!(table.view(), EntriesView::Standard);
        assert_eq!(names(&table), ["ripgrep", "fd"]);
        assert_eq!(table.total_pages(), 5);
        assert_eq!(table.page(), 1);
    }

    #[test]
    fn short_input_clears_search() {
        let mut table = loaded();
        let ticket = table.begin_search("ripg").unwrap();
        assert!(table.finish_search(&ticket, vec![tool(1, "ripgrep")]));
        assert!(table.is_searching());
        assert_eq!(table.total_pages(), 1);

        assert!(table.begin_search("rip").is_none());
        assert!(!table.is_searching());
        assert_eq!(names(&table), ["ripgrep", "fd"]);
        assert_eq!(table.max_count(), 42);
    }

    #[test]
    fn empty_search_results_are_shown_as_empty() {
        let mut table = loaded();
        let ticket = table.begin_search("nothing like this").unwrap();
        table.finish_search(&ticket, Vec::new());
        assert!(table.rows().is_empty());
        assert!(table.is_searching());
    }

    #[test]
    fn stale_search_results_are_dropped() {
        let mut table = loaded();
        let older = table.begin_search("ripg").unwrap();
        let newer = table.begin_search("ripgrep").unwrap();
        assert!(table.finish_search(&newer, vec![tool(1, "ripgrep")]));
        assert!(!table.finish_search(&older, vec![tool(5, "ripgrep-all")]));
        assert_eq!(names(&table), ["ripgrep"]);
    }

    #[test]
    fn clearing_search_drops_in_flight_results() {
        let mut table = loaded();
        let ticket = table.begin_search("ripg").unwrap();
        table.begin_search("");
        assert!(!table.finish_search(&ticket, vec![tool(1, "ripgrep")]));
        assert!(!table.is_searching());
    }

    #[test]
    fn change_view_resets_page() {
        let mut table = loaded();
        let req = table.page_request(3).unwrap();
        table.finish_page(&req, Ok(vec![tool(30, "bat")]));
        assert_eq!(table.page(), 3);

        assert!(table.change_view(EntriesView::RecentlyAdded));
        assert_eq!(table.page(), 1);
        assert_eq!(names(&table), ["zoxide"]);
        assert!(!table.change_view(EntriesView::RecentlyAdded));
    }

    #[test]
    fn page_request_targets_active_view_and_page() {
        let mut table = loaded();
        assert_eq!(table.page_request(1), None);
        let req = table.page_request(2).unwrap();
        assert_eq!((req.view, req.page.number()), (EntriesView::Standard, 2));

        table.change_view(EntriesView::RecentlyAdded);
        let req = table.page_request(4).unwrap();
        assert_eq!((req.view, req.page.number()), (EntriesView::RecentlyAdded, 4));
    }

    #[test]
    fn no_paging_while_searching() {
        let mut table = loaded();
        let ticket = table.begin_search("ripgrep").unwrap();
        table.finish_search(&ticket, vec![tool(1, "ripgrep")]);
        assert_eq!(table.page_request(2), None);
    }

    #[test]
    fn failed_page_leaves_state() {
        let mut table = loaded();
        let req = table.page_request(2).unwrap();
        let err = ClientError::Status {
            status: reqwest::StatusCode::INTERNAL_SERVER_ERROR,
            message: "internal error".into(),
        };
        assert!(!table.finish_page(&req, Err(err)));
        assert_eq!(table.page(), 1);
        assert_eq!(names(&table), ["ripgrep", "fd"]);
    }

    #[test]
    fn page_for_previous_view_is_dropped() {
        let mut table = loaded();
        let req = table.page_request(2).unwrap();
        table.change_view(EntriesView::RecentlyAdded);
        assert!(!table.finish_page(&req, Ok(vec![tool(11, "exa")])));
        assert_eq!(names(&table), ["zoxide"]);
    }

    #[test]
    fn vote_updates_rows_and_cache() {
        let mut table = loaded();
        table.apply_vote(&VoteOutcome {
            tool_id: 2,
            upvotes: 7,
            voted: true,
            changed: true,
        });
        assert_eq!(table.rows()[1].upvotes, 7);
        table.change_view(EntriesView::RecentlyAdded);
        table.change_view(EntriesView::Standard);
        assert_eq!(table.rows()[1].upvotes, 7);
    }
}
