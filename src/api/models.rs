use serde::{Deserialize, Serialize};

/// Server-provided identity of a playable song, as returned by
/// `/next-song`, `/previous-song` and `/play-all`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackReference {
    pub id: i64,
    pub path: String,
}
