pub mod align;
pub mod convert;
pub mod dataset;
pub mod refine;
