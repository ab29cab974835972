pub mod event;
pub mod member;
pub mod mentor;
pub mod role;
pub mod role_permission;
pub mod site_config;
pub mod slide;
pub mod sponsor;
pub mod startup;
pub mod user;
