pub mod admins;
pub mod auth;
pub mod rbac;
pub mod users;

pub use self::auth::model::LoginRequest;
pub use self::users::model::User;
