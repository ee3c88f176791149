pub mod color;
pub mod generation;
pub mod window;

pub use color::{ColorScheme, NormalizedColor, Rgb};
pub use generation::{Generation, GenerationCounter, GenerationToken};
pub use window::{MonitorIndex, Point, Rect, WindowId, WindowSnapshot, WindowType};
