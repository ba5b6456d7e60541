// ── Domain model ──
//
// Strongly-typed entities converted from the wire types in labkeep-api.
// Task, Machine, and Student stay distinct; nothing here is shared
// "card" plumbing.

pub mod lab;
pub mod machine;
pub mod session;
pub mod student;
pub mod task;
pub mod user;

pub use lab::{Lab, LabChanges, NewLab};
pub use machine::{CheckDate, CleanlinessState, Machine};
pub use session::UsageSession;
pub use student::Student;
pub use task::{NewTask, Task, TaskStatus};
pub use user::User;
