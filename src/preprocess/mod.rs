//! Column and row rescaling applied before clustering.
//!
//! Two small transforms sit between the factorization and the linkage engine:
//!
//! - [`MinMaxScaler`] maps each auxiliary column (GDP per capita, mean
//!   latitude, ...) onto `[0, 1]` so it is comparable with mixture proportions.
//! - [`normalize_rows`] turns each row of the mixture matrix into proportions
//!   that sum to one.
//!
//! Neither transform mutates its input.

mod minmax;
mod rows;

pub use minmax::MinMaxScaler;
pub use rows::{normalize_labeled_rows, normalize_rows};
