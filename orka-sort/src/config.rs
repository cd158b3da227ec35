use std::path::{Path, PathBuf};

/// Default in-memory pool size before records spill to disk.
pub const DEFAULT_MEMORY_LIMIT: usize = 40 * 1024 * 1024;
/// Default number of runs merged per pass.
pub const DEFAULT_FAN_IN: usize = 16;

/// Cancellation probe supplied by the query's execution context. Must be
/// cheap and side-effect-free; polled once per input row during load.
pub type CancelCallback = Box<dyn Fn() -> bool>;

/// Configuration consumed from the execution context.
///
/// Builder-style: start from `SortConfig::default()` and override what the
/// context provides.
pub struct SortConfig {
    memory_limit: usize,
    fan_in: usize,
    temp_dir: PathBuf,
    session_id: u64,
    cancel: Option<CancelCallback>,
}

impl Default for SortConfig {
    fn default() -> Self {
        Self {
            memory_limit: DEFAULT_MEMORY_LIMIT,
            fan_in: DEFAULT_FAN_IN,
            temp_dir: std::env::temp_dir(),
            session_id: 0,
            cancel: None,
        }
    }
}

impl SortConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Maximum bytes of records held in memory before a spill.
    #[must_use]
    pub fn memory_limit(mut self, bytes: usize) -> Self {
        self.memory_limit = bytes;
        self
    }

    /// Runs merged together in one pass. Values below 2 are meaningless and
    /// clamp to 2.
    #[must_use]
    pub fn fan_in(mut self, fan_in: usize) -> Self {
        self.fan_in = fan_in.max(2);
        self
    }

    /// Directory receiving `sort-<session-id>-<random>.tmp` files.
    #[must_use]
    pub fn temp_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.temp_dir = dir.into();
        self
    }

    /// Session identifier namespacing this sort's temp file names.
    #[must_use]
    pub fn session_id(mut self, id: u64) -> Self {
        self.session_id = id;
        self
    }

    /// Install the cancellation probe.
    #[must_use]
    pub fn cancel_check(mut self, probe: impl Fn() -> bool + 'static) -> Self {
        self.cancel = Some(Box::new(probe));
        self
    }

    #[inline]
    pub fn memory_limit_bytes(&self) -> usize {
        self.memory_limit
    }

    #[inline]
    pub fn fan_in_runs(&self) -> usize {
        self.fan_in
    }

    #[inline]
    pub fn temp_dir_path(&self) -> &Path {
        &self.temp_dir
    }

    #[inline]
    pub fn session(&self) -> u64 {
        self.session_id
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(|probe| probe())
    }
}

impl std::fmt::Debug for SortConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SortConfig")
            .field("memory_limit", &self.memory_limit)
            .field("fan_in", &self.fan_in)
            .field("temp_dir", &self.temp_dir)
            .field("session_id", &self.session_id)
            .field("cancel", &self.cancel.is_some())
            .finish()
    }
}
