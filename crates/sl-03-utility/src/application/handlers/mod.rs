//! Message handlers, one `impl UtilityContext` block per concern.
//!
//! Handlers check every precondition before their first write. The
//! service wraps each dispatch in a savepoint as well, so a handler that
//! fails late still leaves nothing behind.

mod double_sign;
mod governance;
mod lifecycle;
mod send;
mod stake;
