pub mod decision;
pub mod diagnostic;
pub mod document;
pub mod lens;

pub use decision::*;
pub use diagnostic::*;
pub use document::*;
pub use lens::*;
