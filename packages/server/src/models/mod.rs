pub mod asset;
pub mod auth;
pub mod event;
pub mod member;
pub mod mentor;
pub mod shared;
pub mod site_config;
pub mod slide;
pub mod sponsor;
pub mod startup;
