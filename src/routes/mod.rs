pub mod auth;

pub mod users;

pub mod teachers;

pub mod students;

pub mod classes;

pub mod subjects;

pub mod exams;

pub mod results;

pub mod fees;

pub mod report_cards;

pub mod dashboard;

pub use auth::configure_auth_routes;
pub use classes::configure_classes_routes;
pub use dashboard::configure_dashboard_routes;
pub use exams::configure_exams_routes;
pub use fees::configure_fees_routes;
pub use report_cards::configure_report_cards_routes;
pub use results::configure_results_routes;
pub use students::configure_students_routes;
pub use subjects::configure_subjects_routes;
pub use teachers::configure_teachers_routes;
pub use users::configure_user_routes;
