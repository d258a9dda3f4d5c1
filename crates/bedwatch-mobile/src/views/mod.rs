mod home;
mod login;

pub use home::HomeScreen;
pub use login::LoginScreen;
