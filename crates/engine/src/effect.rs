//! Effect descriptors: declarative, cloneable frame sequences.
//!
//! An effect is pure data — colours, timing, priority — and never
//! holds a device handle. Applying the same effect to three lights
//! spawns three independent tasks sharing nothing mutable.

use std::time::Duration;

use crate::color::{LedIndex, Rgb};
use crate::speed::Speed;

/// Scheduling priority of an effect task.
///
/// An incoming `apply` replaces the running task when its priority is
/// greater than or equal; strictly lower priority is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Priority {
    Low,
    #[default]
    Normal,
    High,
}

/// One (colour, dwell) pair of an effect cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EffectFrame {
    pub color: Rgb,
    pub dwell: Duration,
}

#[derive(Debug, Clone)]
enum EffectKind {
    Steady {
        color: Rgb,
    },
    Blink {
        on: Rgb,
        off: Rgb,
        speed: Speed,
    },
    Spectrum {
        steps: usize,
        frequency: [f64; 3],
        phase: [f64; 3],
        center: f64,
        width: f64,
        scale: f64,
    },
    Gradient {
        target: Rgb,
        step: u8,
    },
    Fli {
        a: Rgb,
        b: Rgb,
        speed: Speed,
    },
}

/// A declarative frame sequence with priority, repeat count, and LED
/// target.
#[derive(Debug, Clone)]
pub struct Effect {
    name: &'static str,
    kind: EffectKind,
    /// Scheduling priority relative to whatever is already running.
    pub priority: Priority,
    /// Cycles to play; 0 means forever.
    pub repeat_count: u32,
    /// LED target; 0 addresses the whole device.
    pub led: LedIndex,
    dwell_override: Option<Duration>,
}

impl Effect {
    fn new(name: &'static str, kind: EffectKind, priority: Priority) -> Self {
        Self {
            name,
            kind,
            priority,
            repeat_count: 0,
            led: LedIndex::ALL,
            dwell_override: None,
        }
    }

    /// A single steady colour. Degenerate: one frame, no long task.
    pub fn steady(color: Rgb) -> Self {
        Self::new("steady", EffectKind::Steady { color }, Priority::Normal)
    }

    /// Alternate between `on` and dark.
    pub fn blink(on: Rgb) -> Self {
        Self::new(
            "blink",
            EffectKind::Blink {
                on,
                off: Rgb::BLACK,
                speed: Speed::Slow,
            },
            Priority::Normal,
        )
    }

    /// Rainbow sweep from three phase-offset sines.
    pub fn spectrum() -> Self {
        Self::new(
            "spectrum",
            EffectKind::Spectrum {
                steps: 64,
                frequency: [0.3, 0.3, 0.3],
                phase: [0.0, 2.0, 4.0],
                center: 128.0,
                width: 127.0,
                scale: 1.0,
            },
            Priority::Low,
        )
    }

    /// Ramp black → `target` → black.
    pub fn gradient(target: Rgb) -> Self {
        Self::new(
            "gradient",
            EffectKind::Gradient { target, step: 1 },
            Priority::Low,
        )
    }

    /// Two-colour alternation (flash lights impressively).
    pub fn fli(a: Rgb, b: Rgb) -> Self {
        Self::new(
            "fli",
            EffectKind::Fli {
                a,
                b,
                speed: Speed::Slow,
            },
            Priority::Normal,
        )
    }

    /// Set the cycle count (0 = forever).
    pub fn with_count(mut self, count: u32) -> Self {
        self.repeat_count = count;
        self
    }

    /// Target an individual LED.
    pub fn with_led(mut self, led: LedIndex) -> Self {
        self.led = led;
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// Override every frame's dwell.
    pub fn with_dwell(mut self, dwell: Duration) -> Self {
        self.dwell_override = Some(dwell);
        self
    }

    /// Set the speed of blink/fli alternation. No-op for other kinds.
    pub fn with_speed(mut self, new_speed: Speed) -> Self {
        match &mut self.kind {
            EffectKind::Blink { speed, .. } | EffectKind::Fli { speed, .. } => *speed = new_speed,
            _ => {}
        }
        self
    }

    /// Set blink's off colour. No-op for other kinds.
    pub fn with_off_color(mut self, color: Rgb) -> Self {
        if let EffectKind::Blink { off, .. } = &mut self.kind {
            *off = color;
        }
        self
    }

    /// Set gradient's step size. No-op for other kinds.
    pub fn with_step(mut self, new_step: u8) -> Self {
        if let EffectKind::Gradient { step, .. } = &mut self.kind {
            *step = new_step.max(1);
        }
        self
    }

    /// Driver-independent effect name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// True for the degenerate one-frame steady effect.
    pub fn is_steady(&self) -> bool {
        matches!(self.kind, EffectKind::Steady { .. })
    }

    /// The steady colour, when this is a steady effect.
    pub fn steady_color(&self) -> Option<Rgb> {
        match self.kind {
            EffectKind::Steady { color } => Some(color),
            _ => None,
        }
    }

    /// Blink parameters, for drivers with hardware blink.
    pub fn blink_params(&self) -> Option<(Rgb, Rgb, Speed)> {
        match self.kind {
            EffectKind::Blink { on, off, speed } => Some((on, off, speed)),
            _ => None,
        }
    }

    /// Scale every colour in the effect by `dim`.
    pub fn scaled(mut self, dim: f64) -> Self {
        match &mut self.kind {
            EffectKind::Steady { color } => *color = color.scale(dim),
            EffectKind::Blink { on, off, .. } => {
                *on = on.scale(dim);
                *off = off.scale(dim);
            }
            EffectKind::Spectrum { scale, .. } => *scale = (*scale * dim).clamp(0.0, 1.0),
            EffectKind::Gradient { target, .. } => *target = target.scale(dim),
            EffectKind::Fli { a, b, .. } => {
                *a = a.scale(dim);
                *b = b.scale(dim);
            }
        }
        self
    }

    /// Quantise every colour to 3-bit, for single-bit-channel devices.
    pub fn quantized(mut self) -> Self {
        match &mut self.kind {
            EffectKind::Steady { color } => *color = color.quantize(),
            EffectKind::Blink { on, off, .. } => {
                *on = on.quantize();
                *off = off.quantize();
            }
            EffectKind::Gradient { target, .. } => *target = target.quantize(),
            EffectKind::Fli { a, b, .. } => {
                *a = a.quantize();
                *b = b.quantize();
            }
            // Spectrum stays continuous; each emitted frame is
            // quantised by the runner instead.
            EffectKind::Spectrum { .. } => {}
        }
        self
    }

    /// The frames of one cycle.
    ///
    /// `default_dwell` applies only where neither the effect override
    /// nor the kind's own default specifies the pace.
    pub fn cycle(&self, default_dwell: Duration) -> Vec<EffectFrame> {
        let dwell = |kind_default: Option<Duration>| {
            self.dwell_override
                .or(kind_default)
                .unwrap_or(default_dwell)
        };
        match &self.kind {
            EffectKind::Steady { color } => vec![EffectFrame {
                color: *color,
                dwell: Duration::ZERO,
            }],
            EffectKind::Blink { on, off, speed } => {
                let d = dwell(Some(speed.dwell()));
                vec![
                    EffectFrame { color: *on, dwell: d },
                    EffectFrame { color: *off, dwell: d },
                ]
            }
            EffectKind::Fli { a, b, speed } => {
                let d = dwell(Some(speed.dwell()));
                vec![
                    EffectFrame { color: *a, dwell: d },
                    EffectFrame { color: *b, dwell: d },
                ]
            }
            EffectKind::Spectrum {
                steps,
                frequency,
                phase,
                center,
                width,
                scale,
            } => {
                let d = dwell(Some(Duration::from_millis(50)));
                let channel = |f: f64, p: f64, i: usize| {
                    (((f * i as f64 + p).sin() * width + center) * scale).clamp(0.0, 255.0) as u8
                };
                let ramp: Vec<Rgb> = (0..*steps)
                    .map(|i| {
                        Rgb::new(
                            channel(frequency[0], phase[0], i),
                            channel(frequency[1], phase[1], i),
                            channel(frequency[2], phase[2], i),
                        )
                    })
                    .collect();
                mirrored(ramp)
                    .into_iter()
                    .map(|color| EffectFrame { color, dwell: d })
                    .collect()
            }
            EffectKind::Gradient { target, step } => {
                let d = dwell(Some(Duration::from_millis(50)));
                let step = (*step).max(1) as usize;
                let ramp: Vec<Rgb> = (step..=255)
                    .step_by(step)
                    .map(|i| {
                        let scale = i as f64 / 255.0;
                        Rgb::new(
                            (target.r as f64 * scale).round() as u8,
                            (target.g as f64 * scale).round() as u8,
                            (target.b as f64 * scale).round() as u8,
                        )
                    })
                    .collect();
                mirrored(ramp)
                    .into_iter()
                    .map(|color| EffectFrame { color, dwell: d })
                    .collect()
            }
        }
    }
}

/// Ramp up then back down, without repeating the peak.
fn mirrored(ramp: Vec<Rgb>) -> Vec<Rgb> {
    let mut cycle = ramp.clone();
    cycle.extend(ramp.into_iter().rev().skip(1));
    cycle
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEFAULT: Duration = Duration::from_millis(100);

    #[test]
    fn priority_ordering() {
        assert!(Priority::Low < Priority::Normal);
        assert!(Priority::Normal < Priority::High);
    }

    #[test]
    fn steady_is_one_frame() {
        let cycle = Effect::steady(Rgb::new(1, 2, 3)).cycle(DEFAULT);
        assert_eq!(cycle.len(), 1);
        assert_eq!(cycle[0].color, Rgb::new(1, 2, 3));
    }

    #[test]
    fn blink_cycle_is_on_then_off() {
        let cycle = Effect::blink(Rgb::new(255, 0, 0))
            .with_speed(Speed::Medium)
            .cycle(DEFAULT);
        assert_eq!(cycle.len(), 2);
        assert_eq!(cycle[0].color, Rgb::new(255, 0, 0));
        assert_eq!(cycle[1].color, Rgb::BLACK);
        assert_eq!(cycle[0].dwell, Duration::from_millis(250));
    }

    #[test]
    fn fli_alternates_two_colors() {
        let cycle = Effect::fli(Rgb::new(255, 0, 0), Rgb::new(0, 0, 255)).cycle(DEFAULT);
        assert_eq!(cycle.len(), 2);
        assert_eq!(cycle[0].color, Rgb::new(255, 0, 0));
        assert_eq!(cycle[1].color, Rgb::new(0, 0, 255));
    }

    #[test]
    fn spectrum_cycle_length_is_mirrored() {
        let cycle = Effect::spectrum().cycle(DEFAULT);
        assert_eq!(cycle.len(), 64 * 2 - 1);
        // Every channel stays in range by construction; spot-check the
        // default dwell.
        assert_eq!(cycle[0].dwell, Duration::from_millis(50));
    }

    #[test]
    fn gradient_ramps_to_target_and_back() {
        let cycle = Effect::gradient(Rgb::new(200, 100, 0)).cycle(DEFAULT);
        assert_eq!(cycle.len(), 255 * 2 - 1);
        // Peak is the target colour.
        assert_eq!(cycle[254].color, Rgb::new(200, 100, 0));
        // Symmetric shoulders.
        assert_eq!(cycle[0].color, cycle[cycle.len() - 1].color);
    }

    #[test]
    fn gradient_step_shortens_the_ramp() {
        let cycle = Effect::gradient(Rgb::new(255, 255, 255))
            .with_step(5)
            .cycle(DEFAULT);
        assert_eq!(cycle.len(), 51 * 2 - 1);
    }

    #[test]
    fn scaled_dims_every_frame() {
        let effect = Effect::blink(Rgb::new(200, 100, 50)).scaled(0.5);
        let cycle = effect.cycle(DEFAULT);
        assert_eq!(cycle[0].color, Rgb::new(100, 50, 25));
    }

    #[test]
    fn dwell_override_wins() {
        let cycle = Effect::blink(Rgb::new(1, 1, 1))
            .with_dwell(Duration::from_millis(42))
            .cycle(DEFAULT);
        assert_eq!(cycle[0].dwell, Duration::from_millis(42));
    }

    #[test]
    fn quantized_blink() {
        let effect = Effect::blink(Rgb::new(200, 20, 130)).quantized();
        let (on, off, _) = effect.blink_params().expect("blink");
        assert_eq!(on, Rgb::new(255, 0, 255));
        assert_eq!(off, Rgb::BLACK);
    }
}
