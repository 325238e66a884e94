use serde::{Deserialize, Serialize};

/// Throttle used by the demo progress page when nothing is configured.
pub const DEFAULT_THROTTLE_MS: u64 = 100;

/// Milestones used by the demo milestones page when nothing is configured.
pub const DEFAULT_DEPTHS: [f64; 4] = [25.0, 50.0, 75.0, 100.0];

/// What a scroll tracker should report.
///
/// - `depths: Some(..)` tracks milestones; each fires once, then is dropped.
/// - `depths: None` reports every change of the raw percentage,
///   rate-limited by `throttle_ms` when set.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TrackerConfig {
    #[serde(default)]
    pub depths: Option<Vec<f64>>,
    #[serde(default)]
    pub throttle_ms: Option<u64>,
}

impl TrackerConfig {
    pub fn with_depths(mut self, depths: impl Into<Vec<f64>>) -> Self {
        self.depths = Some(depths.into());
        self
    }

    pub fn with_throttle_ms(mut self, throttle_ms: u64) -> Self {
        self.throttle_ms = Some(throttle_ms);
        self
    }

    /// Configured depths sorted ascending with duplicates removed.
    ///
    /// Values are not validated; out-of-range or NaN depths are kept.
    pub fn normalized_depths(&self) -> Option<Vec<f64>> {
        let mut depths = self.depths.clone()?;
        depths.sort_by(|a, b| a.total_cmp(b));
        // Numeric equality: 0.0 and -0.0 collapse, NaNs stay distinct.
        depths.dedup_by(|a, b| *a == *b);
        Some(depths)
    }
}

/// Runtime configuration injected by the hosting page.
///
/// Looks for `window.ENV.SCROLL_TRACKER` (or `window.ENV.scroll_tracker`),
/// shaped like [`TrackerConfig`]:
///
/// ```js
/// window.ENV = { SCROLL_TRACKER: { depths: [10, 50, 90], throttleMs: 250 } };
/// ```
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct EnvConfig {
    pub tracker: TrackerConfig,
}

impl EnvConfig {
    pub fn new() -> Self {
        let Some(env) = web_sys::window()
            .and_then(|w| w.get("ENV"))
            .filter(|env| !env.is_undefined() && env.is_object())
        else {
            return Self::default();
        };

        for key in ["SCROLL_TRACKER", "scroll_tracker"] {
            let Ok(value) = js_sys::Reflect::get(&env, &key.into()) else {
                continue;
            };
            if value.is_undefined() || value.is_null() {
                continue;
            }

            let json = js_sys::JSON::stringify(&value)
                .ok()
                .and_then(|s| s.as_string())
                .unwrap_or_default();
            return match Self::from_tracker_json(&json) {
                Ok(config) => config,
                Err(e) => {
                    log::warn!("ignoring malformed window.ENV.{key}: {e}");
                    Self::default()
                }
            };
        }

        Self::default()
    }

    pub(crate) fn from_tracker_json(json: &str) -> Result<Self, serde_json::Error> {
        let tracker = serde_json::from_str::<TrackerConfig>(json)?;
        Ok(Self { tracker })
    }

    /// Continuous-mode config for the progress page.
    pub fn progress_config(&self) -> TrackerConfig {
        TrackerConfig {
            depths: None,
            throttle_ms: Some(self.tracker.throttle_ms.unwrap_or(DEFAULT_THROTTLE_MS)),
        }
    }

    /// Threshold-mode config for the milestones page.
    pub fn milestone_config(&self) -> TrackerConfig {
        let depths = self
            .tracker
            .depths
            .clone()
            .unwrap_or_else(|| DEFAULT_DEPTHS.to_vec());
        TrackerConfig::default().with_depths(depths)
    }
}
