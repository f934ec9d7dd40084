//! Business operations spanning multiple repositories.
//!
//! Every multi-entity mutation runs inside a single sqlx transaction.
//! Designer rows are locked with `SELECT ... FOR UPDATE` before capacity
//! checks, and project status updates name the expected current status in
//! their `WHERE` clause, so concurrent callers serialize on row locks
//! instead of racing the check-then-act window.

pub mod assignment;
pub mod credits;
pub mod delivery;
pub mod workflow;
