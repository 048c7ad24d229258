//! In-memory community store
//!
//! Used by tests and local runs without a database. Author names are looked
//! up in a small directory filled through [`MemoryCommunityStore::put_author`].

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};

use crate::domain::entity::{
    comment::Comment,
    group::Group,
    post::{BulkTagResult, Post, PostDetail, PostFilter, PostSummary, TagCount, TagTotal},
};
use crate::domain::repository::{CommentRepository, GroupRepository, PostRepository};
use crate::domain::value_object::{AccountId, CommentId, GroupId, PostId};
use crate::error::{CommunityError, CommunityResult};

#[derive(Clone, Default)]
pub struct MemoryCommunityStore {
    state: Arc<Mutex<State>>,
}

#[derive(Default)]
struct State {
    /// Insertion order
    posts: Vec<Post>,
    /// Insertion order
    comments: Vec<Comment>,
    groups: HashMap<GroupId, Group>,
    tag_totals: Vec<TagTotal>,
    authors: HashMap<AccountId, Author>,
}

struct Author {
    name: String,
    email: String,
}

impl State {
    fn author_name(&self, account_id: &AccountId) -> Option<String> {
        self.authors.get(account_id).map(|a| a.name.clone())
    }

    /// Newest first; on equal timestamps the later insert wins.
    fn matching_posts(&self, filter: &PostFilter) -> Vec<&Post> {
        let mut posts: Vec<&Post> = self
            .posts
            .iter()
            .rev()
            .filter(|p| filter.matches(p))
            .collect();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        posts
    }
}

impl MemoryCommunityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `account_id` resolvable to a name and email in listings.
    pub fn put_author(&self, account_id: AccountId, name: impl Into<String>, email: impl Into<String>) {
        if let Ok(mut state) = self.state.lock() {
            state.authors.insert(
                account_id,
                Author {
                    name: name.into(),
                    email: email.into(),
                },
            );
        }
    }

    /// Last written tag totals snapshot
    pub fn tag_totals(&self) -> Vec<TagTotal> {
        self.state
            .lock()
            .map(|s| s.tag_totals.clone())
            .unwrap_or_default()
    }

    pub fn comment_count(&self) -> usize {
        self.state.lock().map(|s| s.comments.len()).unwrap_or(0)
    }

    fn lock(&self) -> CommunityResult<MutexGuard<'_, State>> {
        self.state
            .lock()
            .map_err(|_| CommunityError::Internal("community store lock poisoned".to_string()))
    }
}

fn sorted_counts(counts: HashMap<String, i64>) -> Vec<(String, i64)> {
    let mut counts: Vec<_> = counts.into_iter().collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    counts
}

fn count_tags<'a>(posts: impl Iterator<Item = &'a Post>) -> Vec<(String, i64)> {
    let mut counts: HashMap<String, i64> = HashMap::new();
    for post in posts {
        for tag in post.tags.iter() {
            *counts.entry(tag.to_string()).or_default() += 1;
        }
    }
    sorted_counts(counts)
}

impl PostRepository for MemoryCommunityStore {
    async fn create(&self, post: &Post) -> CommunityResult<()> {
        self.lock()?.posts.push(post.clone());
        Ok(())
    }

    async fn exists(&self, post_id: &PostId) -> CommunityResult<bool> {
        Ok(self.lock()?.posts.iter().any(|p| p.post_id == *post_id))
    }

    async fn list(
        &self,
        filter: &PostFilter,
        limit: Option<i64>,
    ) -> CommunityResult<Vec<PostSummary>> {
        let state = self.lock()?;
        let limit = limit.map_or(usize::MAX, |l| usize::try_from(l).unwrap_or(0));

        Ok(state
            .matching_posts(filter)
            .into_iter()
            .take(limit)
            .map(|p| p.summary(state.author_name(&p.author_id)))
            .collect())
    }

    async fn detail(&self, post_id: &PostId) -> CommunityResult<Option<PostDetail>> {
        let state = self.lock()?;
        let Some(post) = state.posts.iter().find(|p| p.post_id == *post_id) else {
            return Ok(None);
        };

        let comments = state
            .comments
            .iter()
            .filter(|c| c.post_id == *post_id)
            .map(|c| c.view(state.author_name(&c.author_id)))
            .collect();

        Ok(Some(PostDetail {
            post: post.summary(state.author_name(&post.author_id)),
            author_email: state.authors.get(&post.author_id).map(|a| a.email.clone()),
            comments,
        }))
    }

    async fn count_tags(&self, filter: &PostFilter) -> CommunityResult<Vec<TagCount>> {
        let state = self.lock()?;
        Ok(
            count_tags(state.posts.iter().filter(|p| filter.matches(p)))
                .into_iter()
                .map(|(tag, count)| TagCount { tag, count })
                .collect(),
        )
    }

    async fn append_tag(&self, filter: &PostFilter, tag: &str) -> CommunityResult<BulkTagResult> {
        let mut state = self.lock()?;
        let now = Utc::now();
        let mut matched = 0;

        for post in state.posts.iter_mut().filter(|p| filter.matches(p)) {
            post.tags.push(tag);
            post.updated_at = now;
            matched += 1;
        }

        Ok(BulkTagResult {
            matched,
            modified: matched,
        })
    }

    async fn snapshot_tag_totals(&self) -> CommunityResult<Vec<TagTotal>> {
        let mut state = self.lock()?;
        let totals: Vec<TagTotal> = count_tags(state.posts.iter())
            .into_iter()
            .map(|(tag, total_posts)| TagTotal { tag, total_posts })
            .collect();

        state.tag_totals = totals.clone();
        Ok(totals)
    }

    async fn delete_by_id(&self, post_id: &PostId) -> CommunityResult<bool> {
        let mut state = self.lock()?;
        let before = state.posts.len();
        state.posts.retain(|p| p.post_id != *post_id);

        if state.posts.len() == before {
            return Ok(false);
        }
        state.comments.retain(|c| c.post_id != *post_id);
        Ok(true)
    }
}

impl CommentRepository for MemoryCommunityStore {
    async fn create(&self, comment: &Comment) -> CommunityResult<()> {
        self.lock()?.comments.push(comment.clone());
        Ok(())
    }

    async fn delete_many(&self, comment_ids: &[CommentId]) -> CommunityResult<u64> {
        let mut state = self.lock()?;
        let before = state.comments.len();
        state.comments.retain(|c| !comment_ids.contains(&c.comment_id));
        Ok((before - state.comments.len()) as u64)
    }

    async fn purge_created_before(&self, cutoff: DateTime<Utc>) -> CommunityResult<u64> {
        let mut state = self.lock()?;
        let before = state.comments.len();
        state.comments.retain(|c| c.created_at >= cutoff);
        Ok((before - state.comments.len()) as u64)
    }
}

impl GroupRepository for MemoryCommunityStore {
    async fn create(&self, group: &Group) -> CommunityResult<()> {
        self.lock()?.groups.insert(group.group_id, group.clone());
        Ok(())
    }

    async fn find_by_id(&self, group_id: &GroupId) -> CommunityResult<Option<Group>> {
        Ok(self.lock()?.groups.get(group_id).cloned())
    }

    async fn add_member(
        &self,
        group_id: &GroupId,
        account_id: &AccountId,
    ) -> CommunityResult<Option<bool>> {
        Ok(self
            .lock()?
            .groups
            .get_mut(group_id)
            .map(|g| g.add_member(*account_id)))
    }
}
