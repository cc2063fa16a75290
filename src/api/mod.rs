pub mod client;
pub mod models;

pub use client::{stream_url, SongIndex, SongIndexClient};
pub use models::TrackReference;
