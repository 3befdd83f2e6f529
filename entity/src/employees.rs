use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One employee record as stored in the collection file.
///
/// The `id` is assigned once, at creation, and never changes afterwards;
/// every other field is overwritten wholesale on update.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub department: String,
    pub salary: f64,
    pub age: u32,
}

/// Caller-supplied employee fields for add and update requests.
///
/// Deliberately id-less: identity is assigned by [`Employee::create`], so an
/// `id` key in a request payload is ignored along with any other unknown
/// key. Missing fields fall back to type defaults rather than rejecting the
/// payload.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EmployeeDraft {
    pub name: String,
    pub email: String,
    pub department: String,
    pub salary: f64,
    pub age: u32,
}

impl Employee {
    /// Build a record from caller-supplied fields under a freshly generated id.
    pub fn create(draft: EmployeeDraft) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: draft.name,
            email: draft.email,
            department: draft.department,
            salary: draft.salary,
            age: draft.age,
        }
    }

    /// Replace every mutable field with the draft's values.
    ///
    /// Full-overwrite semantics: an empty string in the draft empties the
    /// stored field. The id is never touched.
    pub fn overwrite(&mut self, draft: EmployeeDraft) {
        self.name = draft.name;
        self.email = draft.email;
        self.department = draft.department;
        self.salary = draft.salary;
        self.age = draft.age;
    }
}
