//! Launcher-specific detail parsers, each gated on the launcher that the
//! `launcher` parser identified.

pub mod atlauncher;
pub mod multimc;
pub mod technic;

pub use atlauncher::ATLauncherParser;
pub use multimc::MultiMcParser;
pub use technic::TechnicParser;
