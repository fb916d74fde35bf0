pub mod catalog;
pub mod config;
pub mod logging;
pub mod point_feed;
pub mod points;
pub mod projection;
pub mod replay;
pub mod score_line;
pub mod scoring;
pub mod sim_feed;
pub mod simulation;
pub mod state;
