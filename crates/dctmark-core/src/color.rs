//! Hue/Saturation/Brightness round trip.
//!
//! The watermark only ever perturbs brightness; hue and saturation pass
//! through untouched. Recomposition rounds to the nearest channel value so
//! that the brightness written during embedding reads back exactly.

/// One pixel decomposed into its HSB components.
///
/// `hue` is in degrees [0, 360), `saturation` and `brightness` in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsb {
    pub hue: f64,
    pub saturation: f64,
    pub brightness: f64,
}

/// Decompose an RGB pixel. Gray pixels (max == min) take hue 0.
pub fn rgb_to_hsb(r: u8, g: u8, b: u8) -> Hsb {
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = f64::from(max) - f64::from(min);

    let hue = if delta == 0.0 {
        0.0
    } else {
        let (rf, gf, bf) = (f64::from(r), f64::from(g), f64::from(b));
        let raw = if max == r {
            (gf - bf) / delta
        } else if max == g {
            (bf - rf) / delta + 2.0
        } else {
            (rf - gf) / delta + 4.0
        };
        (raw * 60.0).rem_euclid(360.0)
    };

    Hsb {
        hue,
        saturation: if max == 0 {
            0.0
        } else {
            1.0 - f64::from(min) / f64::from(max)
        },
        brightness: f64::from(max) / 255.0,
    }
}

/// Recompose an RGB pixel by the sector formula.
pub fn hsb_to_rgb(hsb: Hsb) -> (u8, u8, u8) {
    let Hsb {
        hue,
        saturation,
        brightness,
    } = hsb;

    let sector = ((hue / 60.0).floor() as i32).rem_euclid(6);
    let f = hue / 60.0 - (hue / 60.0).floor();

    let value = brightness.clamp(0.0, 1.0) * 255.0;
    let v = value.round() as u8;
    let p = (value * (1.0 - saturation)).round() as u8;
    let q = (value * (1.0 - f * saturation)).round() as u8;
    let t = (value * (1.0 - (1.0 - f) * saturation)).round() as u8;

    match sector {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gray_has_zero_hue_and_saturation() {
        let hsb = rgb_to_hsb(128, 128, 128);
        assert_eq!(hsb.hue, 0.0);
        assert_eq!(hsb.saturation, 0.0);
        assert!((hsb.brightness - 128.0 / 255.0).abs() < 1e-12);
    }

    #[test]
    fn primaries_decompose_as_expected() {
        assert_eq!(rgb_to_hsb(255, 0, 0).hue, 0.0);
        assert_eq!(rgb_to_hsb(0, 255, 0).hue, 120.0);
        assert_eq!(rgb_to_hsb(0, 0, 255).hue, 240.0);
        assert_eq!(rgb_to_hsb(255, 0, 0).saturation, 1.0);
    }

    #[test]
    fn round_trip_preserves_every_channel_max() {
        // brightness must survive exactly, it is the embedding channel
        for &(r, g, b) in &[
            (12u8, 200u8, 99u8),
            (255, 255, 255),
            (0, 0, 0),
            (128, 128, 128),
            (200, 10, 10),
            (1, 2, 3),
        ] {
            let hsb = rgb_to_hsb(r, g, b);
            let (r2, g2, b2) = hsb_to_rgb(hsb);
            let max = r.max(g).max(b);
            let max2 = r2.max(g2).max(b2);
            assert_eq!(max, max2, "brightness drifted for ({r},{g},{b})");
        }
    }

    #[test]
    fn round_trip_is_close_on_all_channels() {
        for &(r, g, b) in &[(12u8, 200u8, 99u8), (90, 14, 220), (33, 33, 200)] {
            let (r2, g2, b2) = hsb_to_rgb(rgb_to_hsb(r, g, b));
            assert!((i32::from(r) - i32::from(r2)).abs() <= 1);
            assert!((i32::from(g) - i32::from(g2)).abs() <= 1);
            assert!((i32::from(b) - i32::from(b2)).abs() <= 1);
        }
    }

    #[test]
    fn brightness_rewrite_keeps_hue_and_saturation() {
        let mut hsb = rgb_to_hsb(40, 180, 90);
        hsb.brightness = 0.5;
        let (r, g, b) = hsb_to_rgb(hsb);
        let back = rgb_to_hsb(r, g, b);
        assert!((back.hue - hsb.hue).abs() < 2.0);
        assert!((back.saturation - hsb.saturation).abs() < 0.02);
        assert_eq!(r.max(g).max(b), 128); // 0.5 · 255 rounded
    }
}
