//! Request extractors.

mod voter;
pub use voter::{LOGIN_REQUIRED, USER_ID_HEADER};
