//! API middleware stack.
//!
//! Execution order (outermost → innermost):
//! 1. Auth validator: session lookup, injects `UserContext`
//! 2. Audit logger: logs after auth, has the owner key

pub mod audit;
pub mod auth;
