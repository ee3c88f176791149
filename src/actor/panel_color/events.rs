pub mod overview;
pub mod window;

pub use overview::OverviewEventHandler;
pub use window::WindowEventHandler;
