pub mod filter_parser;
pub mod item_decoder;

pub use filter_parser::{normalize_iteration_filters, parse_filter, with_iterations};
