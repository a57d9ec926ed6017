pub mod portable_pty_adapter;

pub use portable_pty_adapter::PortablePtyAdapter;
