pub mod extractor;
pub mod handlers;
pub mod token;

pub use extractor::AuthEmployee;
pub use token::TokenIssuer;
