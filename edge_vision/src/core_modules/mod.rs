pub mod fork_join;
pub mod image_helper;
pub mod kernels;
pub mod pixel_buffer;
pub mod serial_scan;
