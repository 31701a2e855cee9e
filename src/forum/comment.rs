use serde::{Deserialize, Serialize};

use super::{CommentId, PostId};

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: CommentId,
    pub post_id: PostId,
    pub name: String,
    pub email: String,
    pub body: String,
}

/// Body of `POST /comments`
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NewComment {
    pub post_id: PostId,
    pub name: String,
    pub body: String,
    pub email: String,
}
