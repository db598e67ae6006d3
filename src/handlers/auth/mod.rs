// Account and token endpoints

pub mod login;
pub mod register;
pub mod session;
pub mod user;

pub use login::login_post;
pub use register::register_post;
pub use session::logout as session_logout;
pub use session::refresh as session_refresh;
pub use user::delete as user_delete;
pub use user::get as user_get;
