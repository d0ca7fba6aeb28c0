// Application layer: command flows the binaries drive.

#[cfg(feature = "cli")]
pub mod console;
