//! mapserve CLI library.
//!
//! Output formatting shared by the `mapserve` subcommands.

pub mod output;
