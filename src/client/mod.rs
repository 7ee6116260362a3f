//! Client side of the directory: HTTP client, table model and vote notifications.

mod api;
mod debounce;
mod notify;
mod session;
mod table;

pub use api::{ApiClient, ClientError};
pub use debounce::Debouncer;
pub use notify::{Position, Toast, ToastKind, VoteAction};
pub use session::{TableSession, DEFAULT_DEBOUNCE};
pub use table::{EntriesRequest, SearchTable, SearchTicket};
