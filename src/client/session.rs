//! Drives a [`SearchTable`] against the API: initial load, debounced search, paging, votes.

use super::api::{ApiClient, ClientError};
use super::debounce::Debouncer;
use super::notify::{Toast, VoteAction};
use super::table::SearchTable;
use crate::pagination::Page;
use crate::view::EntriesView;
use reqwest::StatusCode;
use std::collections::HashSet;
use std::time::Duration;
use tokio::sync::Mutex;

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(250);

/// Shareable across tasks; every keystroke may call [`TableSession::type_search`] concurrently.
pub struct TableSession {
    client: ApiClient,
    table: Mutex<SearchTable>,
    voted: Mutex<HashSet<i64>>,
    debouncer: Debouncer,
    delay: Duration,
}

impl TableSession {
    /// Fetch the first page of both views and build the session around them.
    pub async fn open(client: ApiClient) -> Result<Self, ClientError> {
        let (standard, recently_added) = tokio::try_join!(
            client.entries(EntriesView::Standard, Page::FIRST),
            client.entries(EntriesView::RecentlyAdded, Page::FIRST),
        )?;
        let mut table = SearchTable::new();
        table.load(standard, recently_added);
        tracing::debug!(count = table.max_count(), "table loaded");

        Ok(TableSession {
            client,
            table: Mutex::new(table),
            voted: Mutex::new(HashSet::new()),
            debouncer: Debouncer::new(),
            delay: DEFAULT_DEBOUNCE,
        })
    }

    pub fn with_debounce(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Copy of the current table state.
    pub async fn snapshot(&self) -> SearchTable {
        self.table.lock().await.clone()
    }

    /// Handle new search input. Input superseded within the debounce delay is skipped.
    pub async fn type_search(&self, input: &str) -> Result<(), ClientError> {
        if !self.debouncer.settle(self.delay).await {
            return Ok(());
        }
        let ticket = self.table.lock().await.begin_search(input);
        let Some(ticket) = ticket else {
            return Ok(());
        };
        let rows = self
            .client
            .search(ticket.term.as_str(), Page::FIRST)
            .await
            .inspect_err(|e| tracing::warn!(term = %ticket.term.as_str(), error = %e, "search failed"))?;
        self.table.lock().await.finish_search(&ticket, rows);
        Ok(())
    }

    pub async fn switch_view(&self, view: EntriesView) -> bool {
        self.table.lock().await.change_view(view)
    }

    /// Fetch page `n` of the active view. Returns whether the table now shows it.
    pub async fn go_to_page(&self, n: u32) -> bool {
        let request = self.table.lock().await.page_request(n);
        let Some(request) = request else {
            return false;
        };
        let result = self
            .client
            .entries(request.view, request.page)
            .await
            .map(|body| body.tools);
        self.table.lock().await.finish_page(&request, result)
    }

    /// Vote for a tool, or withdraw the vote if this session already cast one.
    /// Returns the toasts to show, in order.
    pub async fn toggle_vote(&self, tool_id: i64) -> Vec<Toast> {
        if self.client.user().is_none() {
            return vec![Toast::no_login_vote()];
        }
        let action = if self.voted.lock().await.contains(&tool_id) {
            VoteAction::Remove
        } else {
            VoteAction::Add
        };

        let mut toasts = vec![action.loading()];
        let result = match action {
            VoteAction::Add => self.client.vote(tool_id).await,
            VoteAction::Remove => self.client.unvote(tool_id).await,
        };
        match result {
            Ok(outcome) => {
                {
                    let mut voted = self.voted.lock().await;
                    if outcome.voted {
                        voted.insert(tool_id);
                    } else {
                        voted.remove(&tool_id);
                    }
                }
                self.table.lock().await.apply_vote(&outcome);
                toasts.push(if outcome.changed { action.success() } else { Toast::vote_error() });
            }
            Err(e) if e.status() == Some(StatusCode::UNAUTHORIZED) => {
                toasts.push(Toast::no_login_vote());
            }
            Err(e) => {
                tracing::error!(tool_id, error = %e, "vote failed");
                toasts.push(action.failure());
            }
        }
        toasts
    }
}
