pub(crate) mod macros;

pub mod adjustment;
pub mod remittance;
pub mod task;
pub mod time_segment;
pub mod worklog;

pub use adjustment::{Adjustment, AdjustmentInput, AdjustmentType};
pub use remittance::{NewRemittance, Remittance, RemittanceStatus};
pub use task::{Task, TaskInput};
pub use time_segment::{SettlementStatus, TimeSegment, TimeSegmentInput, TimeSegmentStatus};
pub use worklog::{WorkLog, WorkLogInput};
