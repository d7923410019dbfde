//! Page Components

mod home;
mod study;

pub use home::HomePage;
pub use study::StudyPage;
