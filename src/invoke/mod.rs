//! Resilient invocation of a model call.
//!
//! - **Rate gate**: rejects calls closer together than a minimum interval per operation key
//! - **Retry loop**: bounded attempts with a backoff sleep between failures
//! - **Clock**: injectable time source so schedules can be tested without waiting

pub mod backoff;
pub mod clock;
pub mod invoker;
pub mod rate_limit;

pub use backoff::{Backoff, BackoffKind, DEFAULT_BACKOFF, DEFAULT_MAX_BACKOFF};
pub use clock::{Clock, ManualClock, SystemClock};
pub use invoker::{DEFAULT_MAX_ATTEMPTS, ResilientInvoker, RetryPolicy};
pub use rate_limit::{RateLimitTable, RateLimiter};
