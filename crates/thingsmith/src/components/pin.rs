//! Star-shaped push pin.

use crate::{ensure_positive, CadError, Part};

/// A pin made of three flat arms around a round core, standing on the XY
/// plane and reaching up to `length`.
///
/// Optional cone tapers sharpen the tip (`taper_up`) or the foot
/// (`taper_down`) so the pin prints without supports and seats easily.
#[derive(Debug, Clone, PartialEq)]
pub struct Pin {
    radius: f64,
    thickness: f64,
    length: f64,
    taper_up: bool,
    taper_down: bool,
}

impl Pin {
    /// Pin with arms `radius` long and `thickness` wide, without tapers.
    pub fn new(radius: f64, thickness: f64, length: f64) -> Result<Self, CadError> {
        ensure_positive("pin radius", radius)?;
        ensure_positive("pin thickness", thickness)?;
        ensure_positive("pin length", length)?;
        Ok(Self {
            radius,
            thickness,
            length,
            taper_up: false,
            taper_down: false,
        })
    }

    /// Narrow the pin towards its top.
    pub fn taper_up(mut self, taper: bool) -> Self {
        self.taper_up = taper;
        self
    }

    /// Narrow the pin towards its foot.
    pub fn taper_down(mut self, taper: bool) -> Self {
        self.taper_down = taper;
        self
    }

    /// Build the pin geometry.
    pub fn build(&self) -> Part {
        let arm = Part::cube("pin-arm", self.thickness, self.radius, self.length)
            .translate(-self.thickness / 2.0, 0.0, 0.0);
        let core = Part::cylinder("pin-core", self.thickness / 2.0, self.length, 0);
        let mut body = Part::union_all(
            "pin",
            [
                arm.clone(),
                arm.rotate(0.0, 0.0, 120.0),
                arm.rotate(0.0, 0.0, -120.0),
                core,
            ],
        );

        let wide = self.length + self.radius / 2.0;
        let narrow = self.radius / 2.0;
        if self.taper_up {
            body = &body & &Part::cone("pin-taper", wide, narrow, self.length, 0);
        }
        if self.taper_down {
            body = &body & &Part::cone("pin-taper", narrow, wide, self.length, 0);
        }
        body.name = "pin".to_string();
        body
    }
}
