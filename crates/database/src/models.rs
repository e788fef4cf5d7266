//! Database models.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Lifecycle status of a swap request.
///
/// Starts at `Pending` and moves exactly once to one of the terminal
/// states. There is no transition out of `Accepted` or `Rejected`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum SwapStatus {
    Pending,
    Accepted,
    Rejected,
}

impl SwapStatus {
    /// The status string as stored in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            SwapStatus::Pending => "pending",
            SwapStatus::Accepted => "accepted",
            SwapStatus::Rejected => "rejected",
        }
    }

    /// True once the status can no longer change.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, SwapStatus::Pending)
    }
}

impl std::fmt::Display for SwapStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Category of a notification, determining what `related_id` points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum NotificationKind {
    /// A new swap request arrived; `related_id` is the swap request id.
    SwapRequest,
    /// A swap request was answered; `related_id` is the swap request id.
    SwapResponse,
    /// A chat message arrived; `related_id` is the chat message id.
    ChatMessage,
}

/// A registered user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    /// Display name.
    pub name: String,
    /// Unique email address.
    pub email: String,
    /// Account status flag (users are never hard-deleted).
    pub status: String,
    /// Creation timestamp.
    pub created_at: String,
}

/// A user together with their offered and wanted skill sets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserWithSkills {
    #[serde(flatten)]
    pub user: User,
    pub skills_offered: Vec<String>,
    pub skills_wanted: Vec<String>,
}

/// A proposal to exchange one named skill for another.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct SwapRequest {
    pub id: i64,
    pub from_user_id: i64,
    pub to_user_id: i64,
    /// Skill the sender offers, free text (no catalog foreign key).
    pub offered_skill: String,
    /// Skill the sender wants from the recipient, free text.
    pub wanted_skill: String,
    /// Optional free-text message attached to the request.
    pub message: Option<String>,
    pub status: SwapStatus,
    pub created_at: String,
    pub updated_at: String,
}

/// Fields required to create a swap request.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewSwapRequest {
    pub from_user_id: i64,
    pub to_user_id: i64,
    pub offered_skill: String,
    pub wanted_skill: String,
    pub message: Option<String>,
}

/// A swap request joined with the counterpart user's identity.
///
/// For a received request the peer is the sender; for a sent request the
/// peer is the recipient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct SwapRequestWithPeer {
    pub id: i64,
    pub from_user_id: i64,
    pub to_user_id: i64,
    pub offered_skill: String,
    pub wanted_skill: String,
    pub message: Option<String>,
    pub status: SwapStatus,
    pub created_at: String,
    pub updated_at: String,
    pub peer_name: String,
    pub peer_email: String,
}

/// A user-facing notice written as a side effect of another operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Notification {
    pub id: i64,
    /// Target user.
    pub user_id: i64,
    pub kind: NotificationKind,
    pub title: String,
    pub body: String,
    /// Polymorphic entity reference, interpreted via `kind`.
    pub related_id: Option<i64>,
    pub is_read: bool,
    pub created_at: String,
}

/// A message in the chat attached to an accepted swap request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct ChatMessage {
    pub id: i64,
    pub swap_request_id: i64,
    pub sender_id: i64,
    pub receiver_id: i64,
    pub body: String,
    pub created_at: String,
}

/// Fields required to append a chat message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewChatMessage {
    pub swap_request_id: i64,
    pub sender_id: i64,
    pub receiver_id: i64,
    pub body: String,
}

/// A chat message joined with the sender's display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct ChatMessageWithSender {
    pub id: i64,
    pub swap_request_id: i64,
    pub sender_id: i64,
    pub receiver_id: i64,
    pub body: String,
    pub created_at: String,
    pub sender_name: String,
}

/// An accepted swap request viewed as a chat thread for one participant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct ActiveChat {
    pub swap_request_id: i64,
    pub offered_skill: String,
    pub wanted_skill: String,
    pub request_date: String,
    pub other_user_id: i64,
    pub other_user_name: String,
    /// Messages addressed to this user without a read `chat_message`
    /// notification. Derived at query time, never stored.
    pub unread_count: i64,
}
