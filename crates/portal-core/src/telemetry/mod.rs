//! Telemetry domain module.

mod model;

pub use model::{
    ACTIVITY_LOG_CAPACITY, ActivityEntry, ActivityLog, PerformanceSample, PerformanceSnapshot,
    SessionStats, format_duration,
};
