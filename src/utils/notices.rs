//! Per-user notice queue.
//!
//! Notices are pushed when something happens to a user's request (a gate
//! denial, for instance) and drained the next time the user asks for them.
//! Each queue keeps at most [`MAX_PENDING_NOTICES`]; the oldest are dropped
//! first.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use kampus_models::{Notice, NoticeLevel};
use tokio::sync::Mutex;
use uuid::Uuid;

pub const MAX_PENDING_NOTICES: usize = 50;

#[derive(Clone, Debug, Default)]
pub struct NoticeBoard {
    queues: Arc<Mutex<HashMap<Uuid, VecDeque<Notice>>>>,
}

impl NoticeBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a notice and return how many are now pending for the user.
    pub async fn push(&self, user_id: Uuid, level: NoticeLevel, message: impl Into<String>) -> usize {
        let mut queues = self.queues.lock().await;
        let queue = queues.entry(user_id).or_default();
        if queue.len() >= MAX_PENDING_NOTICES {
            queue.pop_front();
        }
        queue.push_back(Notice::new(level, message));
        queue.len()
    }

    /// Remove and return the user's notices, oldest first.
    pub async fn drain(&self, user_id: Uuid) -> Vec<Notice> {
        self.queues
            .lock()
            .await
            .remove(&user_id)
            .map(Vec::from)
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_drain_empties_queue_in_order() {
        let board = NoticeBoard::new();
        let user = Uuid::new_v4();
        assert_eq!(board.push(user, NoticeLevel::Error, "first").await, 1);
        assert_eq!(board.push(user, NoticeLevel::Info, "second").await, 2);

        let notices = board.drain(user).await;
        assert_eq!(notices.len(), 2);
        assert_eq!(notices[0].message, "first");
        assert_eq!(notices[0].level, NoticeLevel::Error);
        assert_eq!(notices[1].message, "second");

        assert!(board.drain(user).await.is_empty());
    }

    #[tokio::test]
    async fn test_queues_are_per_user() {
        let board = NoticeBoard::new();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();
        board.push(alice, NoticeLevel::Warning, "for alice").await;

        assert!(board.drain(bob).await.is_empty());
        assert_eq!(board.drain(alice).await.len(), 1);
    }

    #[tokio::test]
    async fn test_queue_keeps_newest_notices() {
        let board = NoticeBoard::new();
        let user = Uuid::new_v4();
        let total = MAX_PENDING_NOTICES * 40;

        for i in 0..total {
            let pending = board.push(user, NoticeLevel::Error, format!("denied {}", i)).await;
            assert!(pending <= MAX_PENDING_NOTICES);
        }

        let notices = board.drain(user).await;
        assert_eq!(notices.len(), MAX_PENDING_NOTICES);
        assert_eq!(notices[0].message, format!("denied {}", total - MAX_PENDING_NOTICES));
        assert_eq!(notices[MAX_PENDING_NOTICES - 1].message, format!("denied {}", total - 1));
    }
}
