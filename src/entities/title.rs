use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "title")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub name: String,

    pub description: Option<String>,

    /// ISO-8601 date (YYYY-MM-DD)
    pub release_date: Option<String>,

    pub image_url: Option<String>,

    /// NULL or 0 for movies; a series has at least one season.
    pub seasons: Option<i32>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::title_genre::Entity")]
    TitleGenre,
    #[sea_orm(has_many = "super::title_actor::Entity")]
    TitleActor,
    #[sea_orm(has_many = "super::title_director::Entity")]
    TitleDirector,
    #[sea_orm(has_many = "super::user_title::Entity")]
    UserTitle,
    #[sea_orm(has_many = "super::review_title::Entity")]
    ReviewTitle,
}

impl Related<super::genre::Entity> for Entity {
    fn to() -> RelationDef {
        super::title_genre::Relation::Genre.def()
    }
    fn via() -> Option<RelationDef> {
        Some(super::title_genre::Relation::Title.def().rev())
    }
}

impl Related<super::actor::Entity> for Entity {
    fn to() -> RelationDef {
        super::title_actor::Relation::Actor.def()
    }
    fn via() -> Option<RelationDef> {
        Some(super::title_actor::Relation::Title.def().rev())
    }
}

impl Related<super::director::Entity> for Entity {
    fn to() -> RelationDef {
        super::title_director::Relation::Director.def()
    }
    fn via() -> Option<RelationDef> {
        Some(super::title_director::Relation::Title.def().rev())
    }
}

impl Related<super::title_genre::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TitleGenre.def()
    }
}

impl Related<super::review_title::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ReviewTitle.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
