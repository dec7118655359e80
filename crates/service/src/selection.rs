//! Immutable light selections and the fluent operations on them.

use std::time::Duration;

use futures::future::join_all;
use tracing::debug;

use statuslight_engine::{ApplyOutcome, Effect, LedIndex, LightId, Rgb, Speed};

use crate::controller::Controller;

/// Options for `turn_on`.
#[derive(Debug, Clone, Copy)]
pub struct OnOptions {
    /// Target LED; 0 addresses the whole device.
    pub led: LedIndex,
    /// Brightness factor in [0, 1].
    pub dim: f64,
    /// Automatically turn back off after this long.
    pub timeout: Option<Duration>,
}

impl Default for OnOptions {
    fn default() -> Self {
        Self {
            led: LedIndex::ALL,
            dim: 1.0,
            timeout: None,
        }
    }
}

/// Options for `blink`.
#[derive(Debug, Clone, Copy)]
pub struct BlinkOptions {
    /// Blink cycles; 0 blinks until stopped.
    pub count: u32,
    pub speed: Speed,
    pub led: LedIndex,
    pub dim: f64,
}

impl Default for BlinkOptions {
    fn default() -> Self {
        Self {
            count: 0,
            speed: Speed::Slow,
            led: LedIndex::ALL,
            dim: 1.0,
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct SelectedLight {
    pub id: LightId,
    pub name: String,
}

/// An immutable set of lights matched by a controller query.
///
/// Selections hold registry ids, not the lights themselves; a light
/// that vanishes between selection and use turns into a logged no-op,
/// never an error. Operations return the selection again so calls
/// chain.
pub struct Selection<'c> {
    controller: &'c Controller,
    lights: Vec<SelectedLight>,
}

impl<'c> Selection<'c> {
    pub(crate) fn new(controller: &'c Controller, lights: Vec<SelectedLight>) -> Self {
        Self { controller, lights }
    }

    pub fn len(&self) -> usize {
        self.lights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lights.is_empty()
    }

    /// Display names, numbering duplicates ("Blynclight #1", …).
    pub fn names(&self) -> Vec<String> {
        let mut totals: std::collections::HashMap<&str, usize> = std::collections::HashMap::new();
        for light in &self.lights {
            *totals.entry(light.name.as_str()).or_default() += 1;
        }
        let mut seen: std::collections::HashMap<&str, usize> = std::collections::HashMap::new();
        self.lights
            .iter()
            .map(|light| {
                if totals[light.name.as_str()] > 1 {
                    let n = seen.entry(light.name.as_str()).or_default();
                    *n += 1;
                    format!("{} #{n}", light.name)
                } else {
                    light.name.clone()
                }
            })
            .collect()
    }

    fn ids(&self) -> Vec<LightId> {
        self.lights.iter().map(|light| light.id).collect()
    }

    /// Fan one effect out to every selected light, concurrently.
    async fn fan_out(&self, effect: Effect, operation: &'static str) -> &Self {
        if self.is_empty() {
            debug!(operation, "empty selection, nothing to do");
            return self;
        }
        let registry = self.controller.registry();
        let results = join_all(self.lights.iter().map(|light| {
            let effect = effect.clone();
            async move { (light, registry.apply(light.id, effect).await) }
        }))
        .await;
        for (light, outcome) in results {
            match outcome {
                None => debug!(light = %light.id, name = %light.name, "light gone, skipped"),
                Some(ApplyOutcome::Rejected { reason }) => {
                    debug!(light = %light.id, name = %light.name, reason, "apply rejected")
                }
                Some(ApplyOutcome::Started(_)) => {}
            }
        }
        self
    }

    /// Light every selected device with `color`.
    pub async fn turn_on(&self, color: Rgb) -> &Self {
        self.turn_on_with(color, OnOptions::default()).await
    }

    /// Light every selected device with `color`, scaled by `dim`,
    /// optionally scheduling an automatic `turn_off`.
    pub async fn turn_on_with(&self, color: Rgb, options: OnOptions) -> &Self {
        let effect = Effect::steady(color)
            .scaled(options.dim)
            .with_led(options.led);
        self.fan_out(effect, "turn_on").await;
        if let Some(after) = options.timeout {
            self.controller.schedule_stop(self.ids(), after);
        }
        self
    }

    /// Stop everything on every selected light; the engine drives
    /// each one dark.
    pub async fn turn_off(&self) -> &Self {
        if self.is_empty() {
            debug!("empty selection, nothing to turn off");
            return self;
        }
        let registry = self.controller.registry();
        join_all(
            self.lights
                .iter()
                .map(|light| async move { registry.stop(light.id).await }),
        )
        .await;
        self
    }

    /// Blink every selected light.
    pub async fn blink(&self, color: Rgb, options: BlinkOptions) -> &Self {
        let effect = Effect::blink(color)
            .scaled(options.dim)
            .with_count(options.count)
            .with_speed(options.speed)
            .with_led(options.led);
        self.fan_out(effect, "blink").await
    }

    /// Apply an arbitrary effect descriptor as-is.
    pub async fn apply_effect(&self, effect: Effect) -> &Self {
        self.fan_out(effect, "apply_effect").await
    }

    /// Apply an effect re-targeted and dimmed for this call.
    pub async fn apply_effect_with(&self, effect: Effect, led: LedIndex, dim: f64) -> &Self {
        self.fan_out(effect.scaled(dim).with_led(led), "apply_effect")
            .await
    }
}
