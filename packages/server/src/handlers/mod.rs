pub mod assets;
pub mod auth;
pub mod events;
pub mod media;
pub mod members;
pub mod mentors;
pub mod site_config;
pub mod slides;
pub mod sponsors;
pub mod startups;
