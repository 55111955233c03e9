pub mod options;
pub mod request;
pub mod series;

pub use options::*;
pub use request::*;
pub use series::*;
