pub mod flat;
pub mod meta;
pub mod prices;
pub mod random;
