pub mod comment;
pub mod post;
pub mod user;

pub use comment::{Comment, NewComment};
pub use post::{NewPost, Post};
pub use user::{ProfileField, User};

pub type PostId = u32;
pub type UserId = u32;
pub type CommentId = u32;
