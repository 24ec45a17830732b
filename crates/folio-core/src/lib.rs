pub mod config;
pub mod error;
pub mod timer;

pub use config::{AnimationConfig, AppConfig, EasingType, ScrollConfig, Theme, TypewriterConfig};
pub use error::{Error, Result};
pub use timer::{Clock, ManualScheduler, Scheduler, TimerCallback, TimerHandle, TokioScheduler};
