pub mod decode;
pub mod fetch;
pub mod view;

pub use fetch::run;
