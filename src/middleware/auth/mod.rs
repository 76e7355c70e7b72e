pub mod token;

pub use token::apply;
