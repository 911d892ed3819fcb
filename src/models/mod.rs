pub mod leaderboard;
pub mod matrix;
pub mod period;
pub mod settings;
pub mod submission;
pub mod suggestion;
