pub mod comments;
pub mod detail;
pub mod feed;
pub mod profile;
pub mod reaction;
pub mod scope;
pub mod users;

pub use comments::Comments;
pub use detail::PostDetail;
pub use feed::PostFeed;
pub use profile::Profile;
pub use reaction::Reactions;
pub use scope::RequestScope;
pub use users::UserDirectory;
