pub mod controller;
pub mod view;

pub use controller::PlayerController;
pub use view::PlayerView;
