pub mod focus;
pub mod predicate;
pub mod projection;
pub mod reconcile;
pub mod search;
pub mod sort;
pub mod validate;
