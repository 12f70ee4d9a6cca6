use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "review")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub comment: Option<String>,

    /// 0 to 10 inclusive, checked before any write.
    pub rating: i32,

    pub likes: i32,

    /// ISO-8601 date (YYYY-MM-DD)
    pub date: String,

    pub spoiler: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::review_title::Entity")]
    ReviewTitle,
    #[sea_orm(has_many = "super::user_review::Entity")]
    UserReview,
}

impl Related<super::title::Entity> for Entity {
    fn to() -> RelationDef {
        super::review_title::Relation::Title.def()
    }
    fn via() -> Option<RelationDef> {
        Some(super::review_title::Relation::Review.def().rev())
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        super::user_review::Relation::User.def()
    }
    fn via() -> Option<RelationDef> {
        Some(super::user_review::Relation::Review.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
