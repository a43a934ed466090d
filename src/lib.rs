// SPDX-License-Identifier: MIT

pub mod command;    // command line + cron schedule synthesis
pub mod config;     // node configuration + validation
pub mod errors;     // error handling
pub mod exchange;   // tagged resource publish/collect
pub mod keys;       // ssh public key provider contract
pub mod node;       // per-role convergence passes
pub mod observability;
pub mod platform;   // os-family capability tables
pub mod resolver;   // layered option resolution
