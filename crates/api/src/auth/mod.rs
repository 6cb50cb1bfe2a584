//! Credentials: password hashing and policy ([`password`]), access and
//! refresh tokens ([`jwt`]).

pub mod jwt;
pub mod password;
