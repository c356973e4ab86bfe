pub mod emoji;
pub mod highlights;
pub mod state;
pub mod view;
