use logpane_proto::LogChunk;

/// Per-source protocol state.
///
/// Created when a log panel opens, mutated by every successful fetch,
/// discarded when the panel closes or the user forces a refresh.
/// `cursor_offset` only moves forward while `session_id`/`started_at` are
/// unchanged; it snaps back to 0 when either changes or the backend reports
/// data loss.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogSourceState {
    pub cursor_offset: u64,
    /// Opaque process-instance id reported by the backend; 0 = unknown.
    pub session_id: u64,
    /// ISO-8601 start time of the observed process, or empty. Compared as an
    /// opaque string, never parsed.
    pub started_at: String,
    /// Last fetch failure, or empty after a successful fetch.
    pub last_error: String,
}

/// What a fetch response means for accumulated viewer state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FetchPlan {
    /// Append the text; clear decoder/display first when `should_reset`.
    Commit { should_reset: bool },
    /// The response may be a mid-stream slice of a *new* process instance
    /// read at a stale nonzero offset. Discard it and re-fetch once from
    /// zero.
    RetryFromZero,
}

pub(crate) fn plan(state: &LogSourceState, chunk: &LogChunk, forced: bool) -> FetchPlan {
    let session_changed = chunk.session != 0 && chunk.session != state.session_id;
    let started_at_changed = !chunk.started_at.is_empty() && chunk.started_at != state.started_at;

    if !forced && (session_changed || started_at_changed) && state.cursor_offset != 0 {
        return FetchPlan::RetryFromZero;
    }

    FetchPlan::Commit {
        should_reset: chunk.lost
            || session_changed
            || started_at_changed
            || state.cursor_offset == 0,
    }
}

/// Fold a committed response into the state. Unknown session (0) and empty
/// `started_at` keep their previous values.
pub(crate) fn commit(state: &mut LogSourceState, chunk: &LogChunk) {
    if chunk.session != 0 {
        state.session_id = chunk.session;
    }
    if !chunk.started_at.is_empty() {
        state.started_at = chunk.started_at.clone();
    }
    state.cursor_offset = chunk.to;
    state.last_error.clear();
}
