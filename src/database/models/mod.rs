pub mod proverb;

pub use proverb::*;
