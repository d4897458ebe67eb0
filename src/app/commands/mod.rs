pub mod install;
pub mod preflight;
pub mod status;
pub mod uninstall;
