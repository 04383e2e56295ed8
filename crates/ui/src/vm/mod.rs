mod dashboard_vm;
mod header_vm;
mod keys_vm;
mod time_fmt;

pub use dashboard_vm::{DashboardVm, StepCardVm, map_dashboard};
pub use header_vm::{CheckVm, VerificationVm};
pub use keys_vm::{KeyRowVm, map_key_rows, mask_secret};
pub use time_fmt::format_datetime;
