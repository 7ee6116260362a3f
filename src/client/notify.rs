//! Toast notifications shown for vote actions.

use std::time::Duration;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToastKind {
    Loading,
    Success,
    Error,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Position {
    #[default]
    BottomCenter,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Toast {
    pub kind: ToastKind,
    pub message: &'static str,
    pub icon: Option<&'static str>,
    pub position: Position,
    pub duration: Duration,
}

const SHORT: Duration = Duration::from_secs(2);
const LONG: Duration = Duration::from_secs(3);

const FAILED: &str = "Sorry, an error happened. Please try again later.";

impl Toast {
    fn new(kind: ToastKind, message: &'static str, duration: Duration) -> Self {
        Toast {
            kind,
            message,
            icon: None,
            position: Position::BottomCenter,
            duration,
        }
    }

    /// Vote attempted without a logged-in user.
    pub fn no_login_vote() -> Self {
        Toast {
            icon: Some("🙈"),
            ..Toast::new(ToastKind::Error, crate::extractors::LOGIN_REQUIRED, LONG)
        }
    }

    /// The server did not apply the vote change.
    pub fn vote_error() -> Self {
        Toast::new(ToastKind::Error, "An error occurred while trying to vote / unvote!", LONG)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VoteAction {
    Add,
    Remove,
}

impl VoteAction {
    pub fn loading(self) -> Toast {
        match self {
            VoteAction::Add => Toast::new(ToastKind::Loading, "Adding vote...", SHORT),
            VoteAction::Remove => Toast::new(ToastKind::Loading, "Remove vote...", SHORT),
        }
    }

    pub fn success(self) -> Toast {
        match self {
            VoteAction::Add => Toast::new(ToastKind::Success, "Voted!", SHORT),
            VoteAction::Remove => Toast::new(ToastKind::Success, "Vote removed!", SHORT),
        }
    }

    pub fn failure(self) -> Toast {
        Toast::new(ToastKind::Error, FAILED, SHORT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_login_toast() {
        let t = Toast::no_login_vote();
        assert_eq!(t.kind, ToastKind::Error);
        assert_eq!(t.message, "You need to login first before voting!");
        assert_eq!(t.icon, Some("🙈"));
        assert_eq!(t.duration, Duration::from_secs(3));
        assert_eq!(t.position, Position::BottomCenter);
    }

    #[test]
    fn vote_action_messages() {
        assert_eq!(VoteAction::Add.loading().message, "Adding vote...");
        assert_eq!(VoteAction::Add.success().message, "Voted!");
        assert_eq!(VoteAction::Remove.loading().message, "Remove vote...");
        assert_eq!(VoteAction::Remove.success().message, "Vote removed!");
        assert_eq!(VoteAction::Remove.failure().kind, ToastKind::Error);
        assert_eq!(VoteAction::Add.success().duration, Duration::from_secs(2));
    }
}
