pub mod align;
pub mod mutate;
pub mod normalize;
pub mod resolve;

pub use align::*;
pub use mutate::*;
pub use normalize::*;
pub use resolve::*;
