//! 截止时间覆盖实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "assignment_overrides")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub assignment_id: i64,
    pub student_id: Option<i64>,
    pub course_section_id: Option<i64>,
    pub due_at: Option<i64>,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::assignments::Entity",
        from = "Column::AssignmentId",
        to = "super::assignments::Column::Id"
    )]
    Assignment,
}

impl Related<super::assignments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Assignment.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_override(
        self,
    ) -> crate::errors::Result<crate::models::analytics::entities::AssignmentOverride> {
        use crate::models::analytics::entities::AssignmentOverride;

        Ok(AssignmentOverride {
            id: self.id,
            assignment_id: self.assignment_id,
            student_id: self.student_id,
            course_section_id: self.course_section_id,
            due_at: super::from_timestamp(self.due_at, "assignment_overrides.due_at")?,
        })
    }
}
