pub mod inspect;
pub mod parametrize;
