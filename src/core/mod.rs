pub mod guard;
pub mod temporal;
pub mod validator;

pub use crate::domain::model::{Company, Department, DepartmentPatch, Employee, Timecard};
pub use crate::domain::ports::{DataAccess, DeptNoScope, RuleSettings};
pub use crate::utils::error::Result;
