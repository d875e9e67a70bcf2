//! Scoresheet Common Library
//!
//! CLIとテストで共有される型とユーティリティ

pub mod types;
pub mod cell;
pub mod layout;
pub mod error;
pub mod parser;

pub use types::{GameRecord, ResultRecord, Sport, Winner};
pub use cell::{CellRef, GridRange};
pub use layout::SheetLayout;
pub use error::{Error, Result};
pub use parser::{decide_winner, parse_score, Outcome};
