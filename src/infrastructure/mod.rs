pub mod byte_source;
pub mod capture;
pub mod chrome_capture;

pub use byte_source::FsByteSource;
pub use capture::{ByteSource, CapturePrimitive, ImageLocator};
pub use chrome_capture::ChromeCapture;
