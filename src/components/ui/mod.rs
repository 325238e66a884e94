pub mod badge;
pub mod button;
pub mod progress;

// Re-export component symbols so callers can `use crate::components::ui::Button` etc.
pub use badge::*;
pub use button::*;
pub use progress::*;
