//! Page views. Each submodule builds one route's DOM into the `#app`
//! container; game pages return a handle object owning their timers.

pub mod competitions;
pub mod dashboard;
pub mod exercise;
pub mod leaderboard;
pub mod login;
pub mod profile;

mod catch_letter;
mod math;
mod reaction;
mod schulte;
mod sequence;
mod spot_difference;
mod stroop;
mod typing;
mod whack_mole;
