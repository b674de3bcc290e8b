//! UI Components
//!
//! Reusable UI components for the desktop application.

mod add_cafe_modal;
mod cafe_card;
mod cafe_list;
mod login_form;
mod toolbar;

pub use add_cafe_modal::AddCafeModal;
pub use cafe_card::CafeCard;
pub use cafe_list::CafeList;
pub use login_form::LoginForm;
pub use toolbar::ShelfToolbar;
