//! # Scene Lights
//!
//! Light sources as scene node payloads. Position and orientation come from
//! the owning node's transform; directional and spot lights aim at the origin.

use crate::gfx::resources::material::Color;

/// Shadow map settings for shadow-casting lights
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadowConfig {
    /// Square shadow map resolution in texels
    pub map_size: u32,
    pub near: f32,
    pub far: f32,
    /// Blur radius of the shadow edge
    pub radius: f32,
    /// Half extent of the orthographic shadow camera (directional only)
    pub extent: f32,
}

impl Default for ShadowConfig {
    fn default() -> Self {
        Self {
            map_size: 512,
            near: 0.5,
            far: 500.0,
            radius: 1.0,
            extent: 5.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Light {
    Ambient {
        color: Color,
        intensity: f32,
    },
    Hemisphere {
        sky: Color,
        ground: Color,
        intensity: f32,
    },
    Directional {
        color: Color,
        intensity: f32,
        shadow: Option<ShadowConfig>,
    },
    Point {
        color: Color,
        intensity: f32,
        distance: f32,
        decay: f32,
        shadow: Option<ShadowConfig>,
    },
    Spot {
        color: Color,
        intensity: f32,
        distance: f32,
        angle: f32,
        penumbra: f32,
        decay: f32,
        shadow: Option<ShadowConfig>,
    },
    RectArea {
        color: Color,
        intensity: f32,
        width: f32,
        height: f32,
    },
}

impl Light {
    pub fn ambient(color: Color, intensity: f32) -> Self {
        Light::Ambient { color, intensity }
    }

    pub fn hemisphere(sky: Color, ground: Color, intensity: f32) -> Self {
        Light::Hemisphere {
            sky,
            ground,
            intensity,
        }
    }

    pub fn directional(color: Color, intensity: f32) -> Self {
        Light::Directional {
            color,
            intensity,
            shadow: None,
        }
    }

    pub fn point(color: Color, intensity: f32, distance: f32, decay: f32) -> Self {
        Light::Point {
            color,
            intensity,
            distance,
            decay,
            shadow: None,
        }
    }

    pub fn spot(color: Color, intensity: f32, distance: f32, angle: f32, penumbra: f32) -> Self {
        Light::Spot {
            color,
            intensity,
            distance,
            angle,
            penumbra,
            decay: 1.0,
            shadow: None,
        }
    }

    pub fn rect_area(color: Color, intensity: f32, width: f32, height: f32) -> Self {
        Light::RectArea {
            color,
            intensity,
            width,
            height,
        }
    }

    /// Builder pattern: Enable shadow casting. Ignored by lights that can't cast.
    pub fn with_shadow(mut self, config: ShadowConfig) -> Self {
        match &mut self {
            Light::Directional { shadow, .. }
            | Light::Point { shadow, .. }
            | Light::Spot { shadow, .. } => *shadow = Some(config),
            _ => {}
        }
        self
    }

    /// Main color (sky color for hemisphere lights)
    pub fn color(&self) -> Color {
        match *self {
            Light::Ambient { color, .. }
            | Light::Directional { color, .. }
            | Light::Point { color, .. }
            | Light::Spot { color, .. }
            | Light::RectArea { color, .. } => color,
            Light::Hemisphere { sky, .. } => sky,
        }
    }

    pub fn set_color(&mut self, value: Color) {
        match self {
            Light::Ambient { color, .. }
            | Light::Directional { color, .. }
            | Light::Point { color, .. }
            | Light::Spot { color, .. }
            | Light::RectArea { color, .. } => *color = value,
            Light::Hemisphere { sky, .. } => *sky = value,
        }
    }

    pub fn intensity(&self) -> f32 {
        match *self {
            Light::Ambient { intensity, .. }
            | Light::Hemisphere { intensity, .. }
            | Light::Directional { intensity, .. }
            | Light::Point { intensity, .. }
            | Light::Spot { intensity, .. }
            | Light::RectArea { intensity, .. } => intensity,
        }
    }

    pub fn set_intensity(&mut self, value: f32) {
        match self {
            Light::Ambient { intensity, .. }
            | Light::Hemisphere { intensity, .. }
            | Light::Directional { intensity, .. }
            | Light::Point { intensity, .. }
            | Light::Spot { intensity, .. }
            | Light::RectArea { intensity, .. } => *intensity = value,
        }
    }

    pub fn shadow(&self) -> Option<&ShadowConfig> {
        match self {
            Light::Directional { shadow, .. }
            | Light::Point { shadow, .. }
            | Light::Spot { shadow, .. } => shadow.as_ref(),
            _ => None,
        }
    }

    pub fn casts_shadow(&self) -> bool {
        self.shadow().is_some()
    }

    /// Lights that contribute uniformly from every direction
    pub fn is_ambient(&self) -> bool {
        matches!(self, Light::Ambient { .. } | Light::Hemisphere { .. })
    }

    /// Radiance contribution used by simple shading (color scaled by intensity)
    pub fn radiance(&self) -> Color {
        match *self {
            Light::Hemisphere {
                sky,
                ground,
                intensity,
            } => Color::new(
                (sky.r + ground.r) * 0.5,
                (sky.g + ground.g) * 0.5,
                (sky.b + ground.b) * 0.5,
            )
            .scaled(intensity),
            _ => self.color().scaled(self.intensity()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shadow_only_on_casting_lights() {
        let dir = Light::directional(Color::WHITE, 0.5).with_shadow(ShadowConfig::default());
        assert!(dir.casts_shadow());

        let ambient = Light::ambient(Color::WHITE, 0.5).with_shadow(ShadowConfig::default());
        assert!(!ambient.casts_shadow());
    }

    #[test]
    fn test_hemisphere_radiance_averages_colors() {
        let light = Light::hemisphere(Color::new(1.0, 0.0, 0.0), Color::new(0.0, 0.0, 1.0), 2.0);
        assert_eq!(light.radiance(), Color::new(1.0, 0.0, 1.0));
    }

    #[test]
    fn test_intensity_setter() {
        let mut light = Light::point(Color::WHITE, 0.5, 10.0, 2.0);
        light.set_intensity(1.5);
        assert_eq!(light.intensity(), 1.5);
    }
}
