pub mod pty_port;
pub mod screen_port;

pub use pty_port::PtyPort;
pub use screen_port::ScreenPort;
