pub mod clock;
pub mod prefs;
pub mod runtime;
pub mod state;

pub use clock::FrameClock;
pub use prefs::Prefs;
pub use state::App;
