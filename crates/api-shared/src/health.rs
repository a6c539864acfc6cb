use crate::wire::HealthRes;

/// Liveness check shared by every API surface.
#[derive(Clone, Default)]
pub struct HealthService;

impl HealthService {
    pub fn new() -> Self {
        Self
    }

    /// Returns a `HealthRes` indicating the service is up.
    ///
    /// This only reports that the process is serving requests; it does not probe the
    /// record store.
    pub fn check_health() -> HealthRes {
        HealthRes {
            ok: true,
            message: "EHR records API is alive".into(),
        }
    }
}
