mod assets;
mod auth;
mod common;
mod records;
