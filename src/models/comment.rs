use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A like or dislike recorded for one user. A user appears in at most one of
/// a comment's (or reply's) like/dislike lists at any time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reaction {
    pub user_id: String,
    pub username: String,
    pub created_at: DateTime<Utc>,
}

impl Reaction {
    pub fn new(user_id: &str, username: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
            username: username.to_string(),
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    pub user_id: String,
    pub username: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub like: Vec<Reaction>,
    #[serde(default)]
    pub dislike: Vec<Reaction>,
    #[serde(default)]
    pub replies: Vec<Reply>,
}

impl Comment {
    pub fn new(user_id: &str, username: &str, text: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            username: username.to_string(),
            text: text.to_string(),
            created_at: Utc::now(),
            like: Vec::new(),
            dislike: Vec::new(),
            replies: Vec::new(),
        }
    }

    pub fn apply_reaction(&mut self, action: ReactionAction, user_id: &str, username: &str) {
        apply_reaction(&mut self.like, &mut self.dislike, action, user_id, username);
    }

    pub fn find_reply_mut(&mut self, reply_id: &str) -> Option<&mut Reply> {
        self.replies.iter_mut().find(|r| r.id == reply_id)
    }

    /// Removes the reply with the given id. Returns false when no reply
    /// matched (callers treat that as a no-op, not an error).
    pub fn remove_reply(&mut self, reply_id: &str) -> bool {
        let before = self.replies.len();
        self.replies.retain(|r| r.id != reply_id);
        self.replies.len() != before
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reply {
    pub id: String,
    pub user_id: String,
    pub username: String,
    pub reply_to_username: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub like: Vec<Reaction>,
    #[serde(default)]
    pub dislike: Vec<Reaction>,
}

impl Reply {
    pub fn new(user_id: &str, username: &str, text: &str, reply_to_username: Option<&str>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            username: username.to_string(),
            reply_to_username: reply_to_username.unwrap_or_default().to_string(),
            text: text.to_string(),
            created_at: Utc::now(),
            like: Vec::new(),
            dislike: Vec::new(),
        }
    }

    pub fn apply_reaction(&mut self, action: ReactionAction, user_id: &str, username: &str) {
        apply_reaction(&mut self.like, &mut self.dislike, action, user_id, username);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ReactionAction {
    Like,
    Dislike,
    ClearLike,
    ClearDislike,
}

impl ReactionAction {
    /// Parses the wire-level action string. Unknown actions are a validation
    /// failure at the handler boundary, not a deserialization error.
    pub fn parse(action: &str) -> Option<Self> {
        match action {
            "like" => Some(Self::Like),
            "dislike" => Some(Self::Dislike),
            "clearLike" => Some(Self::ClearLike),
            "clearDislike" => Some(Self::ClearDislike),
            _ => None,
        }
    }
}

/// Applies one reaction transition while keeping the invariant that a user is
/// in at most one of the two lists:
/// - like: drop any dislike, add a like unless already present
/// - dislike: symmetric
/// - clearLike / clearDislike: remove from that list only, no-op otherwise
pub fn apply_reaction(
    likes: &mut Vec<Reaction>,
    dislikes: &mut Vec<Reaction>,
    action: ReactionAction,
    user_id: &str,
    username: &str,
) {
    let already_liked = likes.iter().any(|r| r.user_id == user_id);
    let already_disliked = dislikes.iter().any(|r| r.user_id == user_id);

    match action {
        ReactionAction::Like => {
            if already_disliked {
                dislikes.retain(|r| r.user_id != user_id);
            }
            if !already_liked {
                likes.push(Reaction::new(user_id, username));
            }
        }
        ReactionAction::Dislike => {
            if already_liked {
                likes.retain(|r| r.user_id != user_id);
            }
            if !already_disliked {
                dislikes.push(Reaction::new(user_id, username));
            }
        }
        ReactionAction::ClearLike => {
            if already_liked {
                likes.retain(|r| r.user_id != user_id);
            }
        }
        ReactionAction::ClearDislike => {
            if already_disliked {
                dislikes.retain(|r| r.user_id != user_id);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn has_user(reactions: &[Reaction], user_id: &str) -> bool {
        reactions.iter().any(|r| r.user_id == user_id)
    }

    #[test]
    fn like_then_like_is_idempotent() {
        let mut comment = Comment::new("u2", "bob", "first!");
        comment.apply_reaction(ReactionAction::Like, "u1", "alice");
        assert_eq!(comment.like.len(), 1);

        comment.apply_reaction(ReactionAction::Like, "u1", "alice");
        assert_eq!(comment.like.len(), 1);
        assert!(comment.dislike.is_empty());
    }

    #[test]
    fn dislike_moves_user_out_of_likes() {
        let mut comment = Comment::new("u2", "bob", "first!");
        comment.apply_reaction(ReactionAction::Like, "u1", "alice");
        comment.apply_reaction(ReactionAction::Dislike, "u1", "alice");

        assert!(comment.like.is_empty());
        assert_eq!(comment.dislike.len(), 1);
        assert_eq!(comment.dislike[0].username, "alice");
    }

    #[test]
    fn clear_actions_only_remove_matching_side() {
        let mut comment = Comment::new("u2", "bob", "first!");
        comment.apply_reaction(ReactionAction::Like, "u1", "alice");

        comment.apply_reaction(ReactionAction::ClearDislike, "u1", "alice");
        assert_eq!(comment.like.len(), 1);

        comment.apply_reaction(ReactionAction::ClearLike, "u1", "alice");
        assert!(comment.like.is_empty());
        assert!(comment.dislike.is_empty());

        // clearing again is a no-op
        comment.apply_reaction(ReactionAction::ClearLike, "u1", "alice");
        assert!(comment.like.is_empty());
    }

    #[test]
    fn reactions_are_per_user() {
        let mut comment = Comment::new("u3", "carol", "hello");
        comment.apply_reaction(ReactionAction::Like, "u1", "alice");
        comment.apply_reaction(ReactionAction::Dislike, "u2", "bob");

        assert!(has_user(&comment.like, "u1"));
        assert!(has_user(&comment.dislike, "u2"));

        comment.apply_reaction(ReactionAction::ClearLike, "u2", "bob");
        assert!(has_user(&comment.dislike, "u2"));
    }

    #[test]
    fn mutual_exclusion_holds_across_any_sequence() {
        use ReactionAction::*;
        let sequence = [
            Like, Like, Dislike, ClearDislike, Dislike, Like, ClearLike, ClearLike, Dislike,
        ];

        let mut reply = Reply::new("u2", "bob", "agreed", None);
        for action in sequence {
            reply.apply_reaction(action, "u1", "alice");
            let liked = has_user(&reply.like, "u1");
            let disliked = has_user(&reply.dislike, "u1");
            assert!(!(liked && disliked), "user in both lists after {:?}", action);
        }
    }

    #[test]
    fn remove_reply_is_noop_for_unknown_id() {
        let mut comment = Comment::new("u1", "alice", "hello");
        comment.replies.push(Reply::new("u2", "bob", "hi", Some("alice")));

        assert!(!comment.remove_reply("missing"));
        assert_eq!(comment.replies.len(), 1);

        let id = comment.replies[0].id.clone();
        assert!(comment.remove_reply(&id));
        assert!(comment.replies.is_empty());
    }

    #[test]
    fn parse_action_accepts_only_known_values() {
        assert_eq!(ReactionAction::parse("like"), Some(ReactionAction::Like));
        assert_eq!(ReactionAction::parse("clearDislike"), Some(ReactionAction::ClearDislike));
        assert_eq!(ReactionAction::parse("Like"), None);
        assert_eq!(ReactionAction::parse("upvote"), None);
    }
}
