pub mod business_calendar;
pub mod leaderboard_service;
pub mod matrix_layout_service;
pub mod productivity_scorer;
pub mod settings_service;
pub mod suggested_score_service;
