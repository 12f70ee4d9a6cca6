pub use super::actor::Entity as Actor;
pub use super::director::Entity as Director;
pub use super::genre::Entity as Genre;
pub use super::review::Entity as Review;
pub use super::review_title::Entity as ReviewTitle;
pub use super::title::Entity as Title;
pub use super::title_actor::Entity as TitleActor;
pub use super::title_director::Entity as TitleDirector;
pub use super::title_genre::Entity as TitleGenre;
pub use super::user::Entity as User;
pub use super::user_review::Entity as UserReview;
pub use super::user_title::Entity as UserTitle;
