//! 预导入模块，方便使用

pub use super::assignment_overrides::{
    Entity as AssignmentOverrides, Model as AssignmentOverrideModel,
};
pub use super::assignments::{Entity as Assignments, Model as AssignmentModel};
pub use super::courses::{Entity as Courses, Model as CourseModel};
pub use super::enrollments::{Entity as Enrollments, Model as EnrollmentModel};
pub use super::page_views_rollups::{Entity as PageViewsRollups, Model as PageViewsRollupModel};
pub use super::submissions::{Entity as Submissions, Model as SubmissionModel};
pub use super::users::{Entity as Users, Model as UserModel};
