//! Likes, dislikes and favorites.
//!
//! Purely local: nothing here talks to the api and nothing is persisted. The
//! state lives as long as the feed view that owns it.

use std::collections::{BTreeSet, HashMap};

use crate::forum::PostId;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Vote {
    like_active: bool,
    dislike_active: bool,
    like_count: i64,
    dislike_count: i64,
}

/// Snapshot of everything the feed shows for one post
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReactionState {
    pub like_active: bool,
    pub dislike_active: bool,
    pub like_count: i64,
    pub dislike_count: i64,
    pub is_favorite: bool,
}

#[derive(Debug, Clone, Default)]
pub struct Reactions {
    votes: HashMap<PostId, Vote>,
    favorites: BTreeSet<PostId>,
}

impl Reactions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toggle_like(&mut self, id: PostId) {
        let vote = self.votes.entry(id).or_default();
        if vote.like_active {
            vote.like_active = false;
            vote.like_count -= 1;
        } else {
            vote.like_active = true;
            vote.like_count += 1;
            if vote.dislike_active {
                vote.dislike_active = false;
                vote.dislike_count -= 1;
            }
        }
    }

    pub fn toggle_dislike(&mut self, id: PostId) {
        let vote = self.votes.entry(id).or_default();
        if vote.dislike_active {
            vote.dislike_active = false;
            vote.dislike_count -= 1;
        } else {
            vote.dislike_active = true;
            vote.dislike_count += 1;
            if vote.like_active {
                vote.like_active = false;
                vote.like_count -= 1;
            }
        }
    }

    /// Returns whether the post is a favorite afterwards
    pub fn toggle_favorite(&mut self, id: PostId) -> bool {
        if self.favorites.remove(&id) {
            false
        } else {
            self.favorites.insert(id);
            true
        }
    }

    pub fn state(&self, id: PostId) -> ReactionState {
        let vote = self.votes.get(&id).copied().unwrap_or_default();
        ReactionState {
            like_active: vote.like_active,
            dislike_active: vote.dislike_active,
            like_count: vote.like_count,
            dislike_count: vote.dislike_count,
            is_favorite: self.favorites.contains(&id),
        }
    }

    pub fn favorites(&self) -> impl Iterator<Item = PostId> + '_ {
        self.favorites.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dislike_takes_over_like() {
        let mut reactions = Reactions::new();
        reactions.toggle_like(42);
        reactions.toggle_dislike(42);

        let state = reactions.state(42);
        assert!(!state.like_active);
        assert_eq!(state.like_count, 0);
        assert!(state.dislike_active);
        assert_eq!(state.dislike_count, 1);
    }

    #[test]
    fn like_twice_is_a_no_op() {
        let mut reactions = Reactions::new();
        reactions.toggle_like(7);
        reactions.toggle_like(7);
        assert_eq!(reactions.state(7), ReactionState::default());
    }

    #[test]
    fn never_both_active() {
        let mut reactions = Reactions::new();
        // every 6-step sequence of like/dislike presses
        for pattern in 0u32..64 {
            let id = pattern;
            for step in 0..6 {
                if (pattern >> step) & 1 == 1 {
                    reactions.toggle_like(id);
                } else {
                    reactions.toggle_dislike(id);
                }
                let state = reactions.state(id);
                assert!(!(state.like_active && state.dislike_active));
                assert_eq!(state.like_count, state.like_active as i64);
                assert_eq!(state.dislike_count, state.dislike_active as i64);
            }
        }
    }

    #[test]
    fn favorite_twice_restores_membership() {
        let mut reactions = Reactions::new();
        reactions.toggle_favorite(3);
        assert!(reactions.toggle_favorite(5));
        assert!(!reactions.toggle_favorite(5));
        assert!(!reactions.state(5).is_favorite);
        assert_eq!(reactions.favorites().collect::<Vec<_>>(), vec![3]);
    }

    #[test]
    fn posts_do_not_share_votes() {
        let mut reactions = Reactions::new();
        reactions.toggle_like(1);
        reactions.toggle_dislike(2);
        assert!(reactions.state(1).like_active);
        assert!(!reactions.state(1).dislike_active);
        assert!(reactions.state(2).dislike_active);
    }
}
