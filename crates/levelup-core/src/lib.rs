//! levelup-core: session engines, progress ledger, and data model.
//!
//! Two game engines drive a learner's practice: the spelling session
//! ([`spelling`]) and the memory match board ([`memory`], with the async
//! driver in [`game`]). Both report outcomes to the [`ledger`], which is the
//! only code that mutates a student's XP, medals and weekly goal counters.
//! Storage, speech and rendering sit behind the traits in [`traits`].

pub mod error;
pub mod game;
pub mod ledger;
pub mod memory;
pub mod model;
pub mod phonetics;
pub mod snapshot;
pub mod spelling;
pub mod statistics;
pub mod traits;
pub mod wordlist;
