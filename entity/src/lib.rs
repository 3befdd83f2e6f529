pub mod employees;

pub use employees::{Employee, EmployeeDraft};
