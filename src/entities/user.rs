use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "user")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub role: String,

    pub avatar_url: Option<String>,

    pub name: String,

    #[sea_orm(unique)]
    pub alias: String,

    #[sea_orm(unique)]
    pub email: String,

    /// Argon2id password hash
    pub password_hash: String,

    /// ISO-8601 date (YYYY-MM-DD)
    pub registered_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::user_title::Entity")]
    UserTitle,
    #[sea_orm(has_many = "super::user_review::Entity")]
    UserReview,
}

impl Related<super::review::Entity> for Entity {
    fn to() -> RelationDef {
        super::user_review::Relation::Review.def()
    }
    fn via() -> Option<RelationDef> {
        Some(super::user_review::Relation::User.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
