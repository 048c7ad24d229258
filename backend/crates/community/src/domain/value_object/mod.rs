pub mod content;
pub mod group_name;
pub mod post_title;
pub mod tags;

pub use kernel::id::{AccountId, CommentId, GroupId, PostId};
