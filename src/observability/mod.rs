// SPDX-License-Identifier: MIT

//! Message types for diagnostic and operational logging.
//!
//! Log lines are struct-based rather than inline format strings: each event
//! is a small type with a `Display` implementation, logged at the call site
//! with `tracing`. This keeps wording in one place and out of the logic.

pub mod messages;
