use crate::alg;
use crate::graphics;

#[derive(Clone, Copy, Debug)]
pub struct DebugLine {
    pub line: alg::Line,
    pub color: graphics::Color,
}

impl DebugLine {
    pub fn new(line: alg::Line, color: graphics::Color) -> DebugLine {
        DebugLine { line, color }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct DebugSphere {
    pub center: alg::Vec3,
    pub radius: f32,
    pub segments: u32,
    pub color: graphics::Color,
}

/// Collects debug geometry for the host to draw each frame. \
/// Compiles down to nothing in release builds.
pub struct Handler {
    #[cfg(debug_assertions)]
    pub lines: Vec<DebugLine>,
    #[cfg(debug_assertions)]
    pub spheres: Vec<DebugSphere>,
}

impl Handler {
    pub fn new() -> Handler {
        #[cfg(debug_assertions)] {
            Handler {
                lines: Vec::new(),
                spheres: Vec::new(),
            }
        }

        #[cfg(not(debug_assertions))] { Handler { } }
    }

    #[allow(unused_variables)]
    pub fn add_line(
        &mut self,
        line: alg::Line,
        color: graphics::Color,
    ) {
        #[cfg(debug_assertions)] {
            self.lines.push(DebugLine::new(line, color));
        }
    }

    #[allow(unused_variables)]
    pub fn add_sphere(
        &mut self,
        center: alg::Vec3,
        radius: f32,
        segments: u32,
        color: graphics::Color,
    ) {
        #[cfg(debug_assertions)] {
            self.spheres.push(
                DebugSphere {
                    center,
                    radius,
                    segments,
                    color,
                }
            );
        }
    }

    pub fn clear(&mut self) {
        #[cfg(debug_assertions)] {
            self.lines.clear();
            self.spheres.clear();
        }
    }
}

impl Default for Handler {
    fn default() -> Handler {
        Handler::new()
    }
}
