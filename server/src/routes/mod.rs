pub mod card;
pub mod extract;
