//! Application views

mod login;
mod shelf;

pub use login::LoginView;
pub use shelf::ShelfView;
