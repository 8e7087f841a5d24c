//! Lambert Conformal Conic projection onto the short-term forecast grid.
//!
//! The forecast service publishes values on a 5 km lattice defined by a
//! secant cone with standard parallels at 30°N and 60°N. Cell (43, 136)
//! sits on the reference point 38°N 126°E.

use std::f64::consts::PI;

use crate::types::{GeoPoint, GridCell};

const DEG_TO_RAD: f64 = PI / 180.0;
const RAD_TO_DEG: f64 = 180.0 / PI;

/// Projection parameters for a Lambert Conformal Conic lattice.
#[derive(Debug, Clone, Copy)]
pub struct LambertGrid {
    /// Earth radius divided by grid spacing (grid units)
    re: f64,
    /// Reference longitude in radians
    olon: f64,
    /// Grid column of the reference point
    xo: f64,
    /// Grid row of the reference point
    yo: f64,
    /// Cone constant
    sn: f64,
    /// Scale factor
    sf: f64,
    /// Projected radius at the reference latitude
    ro: f64,
}

impl LambertGrid {
    /// Build a projection.
    ///
    /// # Arguments
    /// * `earth_radius_km` - Earth radius
    /// * `grid_km` - Grid spacing
    /// * `slat1_deg`, `slat2_deg` - Standard parallels
    /// * `olon_deg`, `olat_deg` - Reference longitude / latitude
    /// * `xo`, `yo` - Grid coordinates of the reference point
    pub fn new(
        earth_radius_km: f64,
        grid_km: f64,
        slat1_deg: f64,
        slat2_deg: f64,
        olon_deg: f64,
        olat_deg: f64,
        xo: f64,
        yo: f64,
    ) -> Self {
        let re = earth_radius_km / grid_km;
        let slat1 = slat1_deg * DEG_TO_RAD;
        let slat2 = slat2_deg * DEG_TO_RAD;
        let olon = olon_deg * DEG_TO_RAD;
        let olat = olat_deg * DEG_TO_RAD;

        let sn = if (slat1 - slat2).abs() < 1e-10 {
            // Tangent cone
            slat1.sin()
        } else {
            let tan_ratio =
                (PI * 0.25 + slat2 * 0.5).tan() / (PI * 0.25 + slat1 * 0.5).tan();
            (slat1.cos() / slat2.cos()).ln() / tan_ratio.ln()
        };

        let sf = (PI * 0.25 + slat1 * 0.5).tan().powf(sn) * slat1.cos() / sn;
        let ro = re * sf / (PI * 0.25 + olat * 0.5).tan().powf(sn);

        Self {
            re,
            olon,
            xo,
            yo,
            sn,
            sf,
            ro,
        }
    }

    /// The forecast service's lattice.
    pub fn kma() -> Self {
        Self::new(6371.00877, 5.0, 30.0, 60.0, 126.0, 38.0, 43.0, 136.0)
    }

    /// Project a point and round to the containing cell.
    ///
    /// Out-of-range input yields a meaningless cell but never panics;
    /// non-finite intermediate values saturate in the integer cast.
    pub fn to_grid(&self, lat_deg: f64, lon_deg: f64) -> GridCell {
        let (x, y) = self.project(lat_deg, lon_deg);
        GridCell {
            nx: (x + 0.5).floor() as i32,
            ny: (y + 0.5).floor() as i32,
        }
    }

    /// Fractional grid coordinates of a point.
    pub fn project(&self, lat_deg: f64, lon_deg: f64) -> (f64, f64) {
        let ra = self.re * self.sf / (PI * 0.25 + lat_deg * DEG_TO_RAD * 0.5).tan().powf(self.sn);

        let mut theta = lon_deg * DEG_TO_RAD - self.olon;
        if theta > PI {
            theta -= 2.0 * PI;
        }
        if theta < -PI {
            theta += 2.0 * PI;
        }
        theta *= self.sn;

        let x = ra * theta.sin() + self.xo;
        let y = self.ro - ra * theta.cos() + self.yo;
        (x, y)
    }

    /// Centre of a cell in geographic coordinates.
    pub fn to_geo(&self, cell: GridCell) -> GeoPoint {
        let xn = f64::from(cell.nx) - self.xo;
        let yn = self.ro - f64::from(cell.ny) + self.yo;

        let mut ra = (xn * xn + yn * yn).sqrt();
        if self.sn < 0.0 {
            ra = -ra;
        }
        let alat = 2.0 * (self.re * self.sf / ra).powf(1.0 / self.sn).atan() - PI * 0.5;

        let theta = if xn.abs() <= 0.0 {
            0.0
        } else if yn.abs() <= 0.0 {
            if xn < 0.0 {
                -PI * 0.5
            } else {
                PI * 0.5
            }
        } else {
            xn.atan2(yn)
        };
        let alon = theta / self.sn + self.olon;

        GeoPoint {
            latitude: alat * RAD_TO_DEG,
            longitude: alon * RAD_TO_DEG,
        }
    }
}

impl Default for LambertGrid {
    fn default() -> Self {
        Self::kma()
    }
}

/// Forecast grid cell containing `(lat, lon)`.
pub fn to_grid(lat: f64, lon: f64) -> GridCell {
    LambertGrid::kma().to_grid(lat, lon)
}

/// Centre of `cell` in decimal degrees.
pub fn to_geo(cell: GridCell) -> GeoPoint {
    LambertGrid::kma().to_geo(cell)
}
