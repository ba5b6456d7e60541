// labkeep-core: session, coordinators, and view composition between labkeep-api and the CLI.

pub mod config;
pub mod controller;
pub mod convert;
pub mod error;
pub mod machines;
pub mod model;
pub mod notice;
pub mod session;
pub mod tasks;
pub mod view;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{ClientConfig, TlsVerification};
pub use controller::Controller;
pub use error::{CoreError, ErrorCategory};
pub use machines::{LastCheckUpdate, MachineCoordinator};
pub use notice::{Notice, NoticeLevel, Refresh, WriteOutcome};
pub use session::{AuthSession, SessionStore};
pub use tasks::{TaskCoordinator, TaskCreated, TaskScope};
pub use view::{
    LabOverview, LabRoster, LabSummary, MachineView, Page, StudentView, ViewScope,
};

// Re-export model types at the crate root for ergonomics.
pub use model::{
    CheckDate, CleanlinessState, Lab, LabChanges, Machine, NewLab, NewTask, Student, Task,
    TaskStatus, UsageSession, User,
};
