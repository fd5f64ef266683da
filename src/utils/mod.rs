pub mod codes;
pub mod jwt;
