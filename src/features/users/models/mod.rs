mod app_user;

pub use app_user::AppUser;
