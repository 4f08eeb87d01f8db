pub mod export;
pub mod loader;
pub mod models;
pub mod rating;
pub mod refresh;
pub mod report;
pub mod score;
pub mod view;
