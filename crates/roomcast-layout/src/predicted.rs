//! Predicted layouts as emitted by the generative model

use roomcast_core::{Result, RoomcastError, Vec3};
use serde::{Deserialize, Serialize};

/// Columnar bounding-box parameters, one row per predicted object
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PredictedLayout {
    /// Per-object scores over the object-type vocabulary
    pub class_labels: Vec<Vec<f32>>,
    pub translations: Vec<[f32; 3]>,
    /// Half extents
    pub sizes: Vec<[f32; 3]>,
    /// Rotation about +Y in radians, one element per row
    pub angles: Vec<[f32; 1]>,
}

/// One decoded row of a `PredictedLayout`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PredictedObject {
    pub class_index: usize,
    pub translation: Vec3,
    pub size: Vec3,
    pub angle: f32,
}

impl PredictedLayout {
    pub fn len(&self) -> usize {
        self.class_labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.class_labels.is_empty()
    }

    /// Check that all four columns describe the same number of objects
    pub fn validate(&self) -> Result<()> {
        let n = self.class_labels.len();
        if self.translations.len() != n || self.sizes.len() != n || self.angles.len() != n {
            return Err(RoomcastError::InvalidBundle(format!(
                "layout columns disagree: {} class rows, {} translations, {} sizes, {} angles",
                n,
                self.translations.len(),
                self.sizes.len(),
                self.angles.len()
            )));
        }
        Ok(())
    }

    /// Decode rows in input order
    pub fn objects(&self) -> impl Iterator<Item = PredictedObject> + '_ {
        self.class_labels
            .iter()
            .zip(&self.translations)
            .zip(&self.sizes)
            .zip(&self.angles)
            .map(|(((scores, t), s), a)| PredictedObject {
                class_index: argmax(scores),
                translation: Vec3::from_array(*t),
                size: Vec3::from_array(*s),
                angle: a[0],
            })
    }
}

/// Index of the highest score; the first wins on ties
fn argmax(scores: &[f32]) -> usize {
    let mut best = 0;
    for (i, &s) in scores.iter().enumerate() {
        if s > scores[best] {
            best = i;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout() -> PredictedLayout {
        PredictedLayout {
            class_labels: vec![vec![0.1, 0.9, 0.0], vec![0.5, 0.5, 0.0]],
            translations: vec![[1.0, 0.0, 2.0], [0.0, 0.5, 0.0]],
            sizes: vec![[1.0, 0.4, 1.1], [0.3, 0.3, 0.3]],
            angles: vec![[1.57], [0.0]],
        }
    }

    #[test]
    fn test_objects_decoded_in_order() {
        let objects: Vec<_> = layout().objects().collect();
        assert_eq!(objects.len(), 2);
        assert_eq!(objects[0].class_index, 1);
        assert_eq!(objects[0].translation, Vec3::new(1.0, 0.0, 2.0));
        assert_eq!(objects[0].angle, 1.57);
        // tie goes to the first maximum
        assert_eq!(objects[1].class_index, 0);
    }

    #[test]
    fn test_validate_rejects_ragged_columns() {
        let mut l = layout();
        l.angles.pop();
        assert!(matches!(l.validate(), Err(RoomcastError::InvalidBundle(_))));
        assert!(layout().validate().is_ok());
    }
}
