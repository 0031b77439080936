pub mod activity;
pub mod catalog;
pub mod dashboard;

pub use activity::ActivityRecorder;
pub use dashboard::DashboardService;
