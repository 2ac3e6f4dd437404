//! Driving SIPp from Rust
//!
//! Builds SIPp command lines from a validated [`SippConfig`], writes injection
//! files, runs the binary with a time limit and hands the message trace to
//! [`sipp_trace`] for assertions.
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use sipp_runner::prelude::*;
//!
//! # async fn example() -> sipp_runner::Result<()> {
//! let config = SippConfig::new("localhost")
//!     .with_scenario_file("tests/scenarios/uac-uas.xml")
//!     .with_service("0312341234")
//!     .with_call_duration(Duration::from_millis(500))
//!     .with_message_file("logs/sip_msg.log");
//!
//! let run = run_scenario(&SippRunner::new(), &config).await?;
//! let received = filter_by_direction(&run.messages, Direction::Received);
//! assert_eq!(received.last().and_then(|m| m.status_code()), Some(200));
//! # Ok(())
//! # }
//! ```

pub mod command;
pub mod config;
pub mod error;
pub mod injection;
pub mod runner;

pub use command::SippCommand;
pub use config::{Scenario, SippConfig};
pub use error::{Error, Result};
pub use injection::{InjectionFile, InjectionMode};
pub use runner::{
    run_scenario, run_with_timeout, ProcessRunner, RunOutcome, RunStatus, ScenarioRun,
    SippRunner, TIMEOUT_EXIT_CODE,
};

/// Re-export of common types and functions
pub mod prelude {
    pub use crate::config::{Scenario, SippConfig};
    pub use crate::error::{Error, Result};
    pub use crate::injection::{InjectionFile, InjectionMode};
    pub use crate::runner::{
        run_scenario, ProcessRunner, RunOutcome, RunStatus, ScenarioRun, SippRunner,
    };
    pub use sipp_trace::prelude::{
        filter_by_direction, filter_by_method, filter_by_status_code, messages_filter, Direction,
        MessageFilter, TraceMessage,
    };
}
