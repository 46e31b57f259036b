//! Marquee application library.
//!
//! Hosts the application modules (currently the movie catalog) and their
//! registration with the kernel's module registry.

pub mod modules;
