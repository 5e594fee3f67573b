mod filter;

pub mod class_change_repo;
pub mod dashboard_repo;
pub mod entry_repo;
pub mod integrity_repo;
pub mod notification_repo;
pub mod permission_history_repo;
pub mod player_repo;
pub mod system_setting_repo;
pub mod team_permission_repo;
pub mod team_repo;
pub mod tournament_repo;
pub mod user_repo;

pub use class_change_repo::ClassChangeRepo;
pub use dashboard_repo::DashboardRepo;
pub use entry_repo::EntryRepo;
pub use integrity_repo::IntegrityRepo;
pub use notification_repo::NotificationRepo;
pub use permission_history_repo::PermissionHistoryRepo;
pub use player_repo::PlayerRepo;
pub use system_setting_repo::SystemSettingRepo;
pub use team_permission_repo::TeamPermissionRepo;
pub use team_repo::TeamRepo;
pub use tournament_repo::TournamentRepo;
pub use user_repo::UserRepo;
