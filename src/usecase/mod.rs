pub mod proxy_usecase;

pub use proxy_usecase::ProxyUsecase;
