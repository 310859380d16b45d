//! Well-known metric labels and live-feed message type constants.
//!
//! Feed keys are the field names inside a snapshot object; labels are the
//! values persisted in the `type` field of a warning record.

/// Snapshot field carrying the ECG reading (beats per minute).
pub const FEED_KEY_ECG: &str = "ecg";

/// Snapshot field carrying the pulse-oximeter reading (SpO2 percent).
pub const FEED_KEY_HR: &str = "hr";

/// Snapshot field carrying the fall-detection reading.
pub const FEED_KEY_FALL: &str = "fall";

/// Persisted label for ECG warnings.
pub const LABEL_ECG: &str = "ECG";

/// Persisted label for heart-rate / oxygen warnings.
pub const LABEL_HR: &str = "HR";

/// Persisted label for fall-detection warnings.
pub const LABEL_FALL: &str = "Fall";

/// Feed message sent by the client to register a path listener.
pub const MSG_TYPE_SUBSCRIBE: &str = "subscribe";

/// Feed message carrying one snapshot for a subscribed path.
pub const MSG_TYPE_SNAPSHOT: &str = "snapshot";

/// Feed message reporting a server-side failure.
pub const MSG_TYPE_ERROR: &str = "error";

/// Placeholder shown for a metric that has not been observed yet.
pub const UNKNOWN_VALUE: &str = "-";
