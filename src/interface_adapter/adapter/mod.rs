pub mod pty_adapter_factory;
pub mod screen_adapter_factory;
