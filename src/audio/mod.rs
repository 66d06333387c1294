#[cfg(feature = "native")]
mod cpal_backend;
#[cfg(feature = "native")]
pub use self::cpal_backend::CpalBackend;

pub mod output;

pub trait AudioBackend {
    fn start(&mut self);
    fn stop(&mut self);
}
