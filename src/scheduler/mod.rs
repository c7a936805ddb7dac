//! Single-consumer page scheduler.
//!
//! Exactly one page is active at any time.  Switching is cooperative but
//! acknowledged: the scheduler cancels the outgoing loop's token, awaits its
//! task handle, and only then starts the next loop.
//!
//! * [`PageId`] — the fixed page set.
//! * [`Page`] — trait each page loop implements.
//! * [`PageContext`] — capability bundle handed to the active loop.
//! * [`PageScheduler`] — activate / deactivate state machine.

pub mod page;
pub mod runner;

pub use page::{Page, PageContext, PageError, PageId};
pub use runner::{PageScheduler, SchedulerError};
