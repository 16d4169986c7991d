//! Polling state machines that drive one remote task through its life:
//! locate network resources, launch, wait for a status, resolve the public
//! address, tail logs, stop on interrupt.
//!
//! The cloud provider is reached only through the traits in [`platform`].
pub mod error;
pub use error::{CoreError, ErrorClass, PlatformError};

pub mod platform;
pub use platform::{LaunchOutcome, LogApi, NetworkApi, Platform, TaskApi};

pub mod retry;
pub use retry::{JitterStrategy, RetryPolicy};

pub mod poll;
pub use poll::PollConfig;

pub mod report;
pub use report::{Reporter, Silent};

pub mod locator;
pub use locator::ResourceLocator;

pub mod launcher;
pub use launcher::TaskLauncher;

pub mod waiter;
pub use waiter::StateWaiter;

pub mod resolver;
pub use resolver::NetworkResolver;

pub mod tailer;
pub use tailer::{LogCursor, LogTailer, TailerConfig};

pub mod interrupt;
pub use interrupt::InterruptHandler;

pub mod session;
pub use session::{Session, SessionConfig, Stopped};

#[cfg(test)]
pub(crate) mod mock;
