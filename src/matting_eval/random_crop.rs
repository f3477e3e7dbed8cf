use rand::Rng;

use crate::matting_eval::trimap::Trimap;

/// Trait choosing a crop origin biased toward the unknown region
///
/// Evaluation crops are centered on unknown pixels whenever any exist, so
/// every crop contains the boundary pixels a matting model finds hardest.
pub trait SampleCropOrigin {
    /// Picks the origin of a `crop_size` window inside this trimap.
    ///
    /// A center pixel is drawn uniformly from the unknown region, falling
    /// back to the image center when the trimap has no unknown pixels. The
    /// window is then shifted inward so it fits whenever the trimap is at
    /// least `crop_size` along that axis; when the request is larger than
    /// the trimap, the origin degrades to 0 and the cropper pads the rest.
    ///
    /// # Arguments
    ///
    /// * `crop_size` - Requested window size as (width, height)
    /// * `rng` - Random stream the center is drawn from
    ///
    /// # Returns
    ///
    /// The window origin (x, y)
    fn sample_crop_origin<R: Rng + ?Sized>(&self, crop_size: (u32, u32), rng: &mut R)
        -> (u32, u32);
}

impl SampleCropOrigin for Trimap {
    fn sample_crop_origin<R: Rng + ?Sized>(
        &self,
        crop_size: (u32, u32),
        rng: &mut R,
    ) -> (u32, u32) {
        let (width, height) = self.dimensions();
        let (crop_width, crop_height) = crop_size;

        let unknown: Vec<(u32, u32)> = self.unknown_pixels().collect();
        let (center_x, center_y) = if unknown.is_empty() {
            (width / 2, height / 2)
        } else {
            unknown[rng.gen_range(0..unknown.len())]
        };

        (
            clamp_origin(center_x, crop_width, width),
            clamp_origin(center_y, crop_height, height),
        )
    }
}

/// Shifts a window centered on `center` inward so it stays inside `0..limit`.
fn clamp_origin(center: u32, crop: u32, limit: u32) -> u32 {
    let origin = center.saturating_sub(crop / 2);
    origin.min(limit.saturating_sub(crop))
}
