//! Paints one frame of a [`Field`] onto a [`Surface`].
//!
//! A frame is a full clear, one glowing disc per particle, then a line for
//! every pair of particles closer than the connection threshold. The pair
//! search is O(N²) and dominates frame cost; at the default 120 particles it
//! checks 7140 pairs per frame, and doubling N roughly quadruples that.

use crate::color::Srgb;
use crate::config::FieldConfig;
use crate::field::Field;
use crate::particle::Particle;
use crate::surface::Surface;

/// Glow amplitude for a pulse phase: `(sin(phase) + 1) / 2`, in [0, 1].
pub fn glow_amplitude(phase: f64) -> f64 {
    ((phase.sin() + 1.0) / 2.0).clamp(0.0, 1.0)
}

/// Disc alpha for a base opacity at a given glow: `opacity * (0.5 + 0.5 * glow)`.
pub fn particle_alpha(opacity: f64, glow: f64) -> f64 {
    opacity * (0.5 + 0.5 * glow)
}

/// Linear falloff from 1 at distance zero to 0 at the threshold.
///
/// Returns 0 at or beyond the threshold, and for a zero threshold.
pub fn connection_strength(distance: f64, threshold: f64) -> f64 {
    if distance < threshold {
        1.0 - distance / threshold
    } else {
        0.0
    }
}

/// A pair of particles close enough to be linked.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Connection {
    /// Index of the earlier particle.
    pub a: usize,
    /// Index of the later particle.
    pub b: usize,
    pub distance: f64,
    /// `connection_strength(distance, threshold)`, always in (0, 1].
    pub strength: f64,
}

/// Every unordered pair `(a, b)`, `a < b`, strictly closer than `threshold`.
pub fn connections(field: &Field, threshold: f64) -> impl Iterator<Item = Connection> + '_ {
    let particles = field.particles();
    particles.iter().enumerate().flat_map(move |(a, pa)| {
        particles[a + 1..]
            .iter()
            .enumerate()
            .filter_map(move |(offset, pb)| {
                let distance = pa.position().distance(pb.position());
                (distance < threshold).then(|| Connection {
                    a,
                    b: a + 1 + offset,
                    distance,
                    strength: connection_strength(distance, threshold),
                })
            })
    })
}

/// Paint settings: one accent hue for everything, plus the connection style.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Renderer {
    accent: Srgb,
    connection_threshold: f64,
    line_alpha: f64,
    line_width: f64,
}

impl Renderer {
    /// Creates a renderer with an explicit accent and connection style.
    pub fn new(accent: Srgb, connection_threshold: f64, line_alpha: f64, line_width: f64) -> Self {
        Self {
            accent,
            connection_threshold,
            line_alpha,
            line_width,
        }
    }

    /// Creates a renderer from the paint settings in `config`.
    pub fn from_config(config: &FieldConfig) -> Self {
        Self::new(
            config.accent,
            config.connection_threshold,
            config.line_alpha,
            config.line_width,
        )
    }

    /// Returns the maximum linking distance.
    pub fn connection_threshold(&self) -> f64 {
        self.connection_threshold
    }

    /// Alpha for a connection line at `distance`, or `None` if no line is drawn.
    pub fn line_alpha_at(&self, distance: f64) -> Option<f64> {
        (distance < self.connection_threshold)
            .then(|| self.line_alpha * connection_strength(distance, self.connection_threshold))
    }

    /// Replaces the surface contents with one frame of `field`.
    pub fn paint<S: Surface + ?Sized>(&self, field: &Field, surface: &mut S) {
        surface.clear();
        for p in field.particles() {
            self.paint_particle(p, surface);
        }
        let particles = field.particles();
        for c in connections(field, self.connection_threshold) {
            surface.stroke_line(
                particles[c.a].position(),
                particles[c.b].position(),
                self.line_width,
                self.accent.with_alpha(self.line_alpha * c.strength),
            );
        }
    }

    fn paint_particle<S: Surface + ?Sized>(&self, p: &Particle, surface: &mut S) {
        let glow = glow_amplitude(p.phase());
        surface.fill_disc(
            p.position(),
            p.size() + glow,
            self.accent.with_alpha(particle_alpha(p.opacity(), glow)),
        );
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::from_config(&FieldConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{DisplayList, DrawCommand};
    use glam::DVec2;
    use std::f64::consts::FRAC_PI_2;

    fn still(x: f64, y: f64) -> Particle {
        Particle::new(DVec2::new(x, y), DVec2::ZERO, 1.0, 0.5, 0.0)
    }

    fn pair_field(distance: f64) -> Field {
        Field::from_particles(800.0, 600.0, vec![still(100.0, 100.0), still(100.0 + distance, 100.0)])
            .unwrap()
    }

    #[test]
    fn glow_extremes() {
        assert_eq!(glow_amplitude(FRAC_PI_2), 1.0);
        assert_eq!(glow_amplitude(-FRAC_PI_2), 0.0);
        assert_eq!(glow_amplitude(0.0), 0.5);
    }

    #[test]
    fn particle_alpha_spans_half_to_full_opacity() {
        assert_eq!(particle_alpha(0.4, 0.0), 0.2);
        assert_eq!(particle_alpha(0.4, 1.0), 0.4);
    }

    #[test]
    fn strength_is_one_at_zero_and_zero_at_threshold() {
        assert_eq!(connection_strength(0.0, 150.0), 1.0);
        assert_eq!(connection_strength(150.0, 150.0), 0.0);
        assert_eq!(connection_strength(200.0, 150.0), 0.0);
        assert_eq!(connection_strength(75.0, 150.0), 0.5);
    }

    #[test]
    fn zero_threshold_never_connects() {
        assert_eq!(connection_strength(0.0, 0.0), 0.0);
        assert_eq!(connections(&pair_field(0.0), 0.0).count(), 0);
    }

    #[test]
    fn line_alpha_at_matches_falloff() {
        let r = Renderer::default();
        assert_eq!(r.line_alpha_at(0.0), Some(0.06));
        assert_eq!(r.line_alpha_at(150.0), None);
        assert_eq!(r.line_alpha_at(151.0), None);
    }

    #[test]
    fn pair_at_threshold_draws_no_line() {
        let mut list = DisplayList::new(800.0, 600.0);
        Renderer::default().paint(&pair_field(150.0), &mut list);
        assert_eq!(list.discs().count(), 2);
        assert_eq!(list.lines().count(), 0);
    }

    #[test]
    fn pair_at_half_threshold_draws_half_alpha_line() {
        let mut list = DisplayList::new(800.0, 600.0);
        Renderer::default().paint(&pair_field(75.0), &mut list);
        let lines: Vec<_> = list.lines().collect();
        assert_eq!(lines.len(), 1);
        match lines[0] {
            DrawCommand::Line {
                from,
                to,
                width,
                color,
            } => {
                assert_eq!(*from, DVec2::new(100.0, 100.0));
                assert_eq!(*to, DVec2::new(175.0, 100.0));
                assert_eq!(*width, 0.5);
                assert_eq!(color.alpha, 0.06 * 0.5);
            }
            other => panic!("expected line, got {other:?}"),
        }
    }

    #[test]
    fn coincident_pair_draws_full_line_alpha() {
        let mut list = DisplayList::new(800.0, 600.0);
        Renderer::default().paint(&pair_field(0.0), &mut list);
        let first = list.lines().next();
        match first {
            Some(DrawCommand::Line { color, .. }) => assert_eq!(color.alpha, 0.06),
            other => panic!("expected line, got {other:?}"),
        }
    }

    #[test]
    fn disc_uses_glow_for_radius_and_alpha() {
        let p = Particle::new(DVec2::new(5.0, 5.0), DVec2::ZERO, 2.0, 0.6, FRAC_PI_2);
        let field = Field::from_particles(10.0, 10.0, vec![p]).unwrap();
        let mut list = DisplayList::new(10.0, 10.0);
        Renderer::default().paint(&field, &mut list);
        match &list.commands()[0] {
            DrawCommand::Disc { radius, color, .. } => {
                assert_eq!(*radius, 3.0);
                assert_eq!(color.alpha, 0.6);
                assert_eq!(color.color.to_hex(), "#06b6d4");
            }
            other => panic!("expected disc, got {other:?}"),
        }
    }

    #[test]
    fn paint_replaces_previous_frame() {
        let mut list = DisplayList::new(800.0, 600.0);
        let r = Renderer::default();
        r.paint(&pair_field(10.0), &mut list);
        r.paint(&pair_field(10.0), &mut list);
        assert_eq!(list.commands().len(), 3);
    }

    #[test]
    fn connections_cover_each_unordered_pair_once() {
        let field = Field::from_particles(
            100.0,
            100.0,
            vec![still(0.0, 0.0), still(1.0, 0.0), still(2.0, 0.0), still(3.0, 0.0)],
        )
        .unwrap();
        let pairs: Vec<(usize, usize)> = connections(&field, 150.0).map(|c| (c.a, c.b)).collect();
        assert_eq!(pairs, vec![(0, 1), (0, 2), (0, 3), (1, 2), (1, 3), (2, 3)]);
    }

    #[test]
    fn empty_field_paints_nothing() {
        let field = Field::from_particles(10.0, 10.0, Vec::new()).unwrap();
        let mut list = DisplayList::new(10.0, 10.0);
        Renderer::default().paint(&field, &mut list);
        assert!(list.commands().is_empty());
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn glow_in_unit_interval(phase in -1e6_f64..1e6) {
                let g = glow_amplitude(phase);
                prop_assert!((0.0..=1.0).contains(&g));
            }

            #[test]
            fn alpha_never_exceeds_base_opacity(phase in -1e6_f64..1e6, opacity in 0.01_f64..=1.0) {
                let a = particle_alpha(opacity, glow_amplitude(phase));
                prop_assert!(a >= 0.0 && a <= opacity);
            }

            #[test]
            fn strength_in_unit_interval(distance in 0.0_f64..1000.0, threshold in 0.0_f64..500.0) {
                let s = connection_strength(distance, threshold);
                prop_assert!((0.0..=1.0).contains(&s));
                if distance >= threshold {
                    prop_assert_eq!(s, 0.0);
                }
            }
        }
    }
}
