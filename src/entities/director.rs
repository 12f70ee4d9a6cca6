use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "director")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub name: String,

    pub photo_url: Option<String>,

    pub nationality: Option<String>,

    /// ISO-8601 date (YYYY-MM-DD)
    pub birth_date: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::title_director::Entity")]
    TitleDirector,
}

impl Related<super::title::Entity> for Entity {
    fn to() -> RelationDef {
        super::title_director::Relation::Title.def()
    }
    fn via() -> Option<RelationDef> {
        Some(super::title_director::Relation::Director.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
