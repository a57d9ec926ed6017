pub mod query_forwarder;
pub mod window;
pub mod window_manager;

pub use query_forwarder::{QueryForwarder, ScanResult};
pub use window::Window;
pub use window_manager::WindowManager;
