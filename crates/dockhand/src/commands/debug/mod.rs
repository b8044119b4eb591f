pub mod events;
pub mod monitors;
pub mod windows;
