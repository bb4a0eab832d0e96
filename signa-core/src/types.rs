use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of landmarks in a tracked hand
pub const NUM_LANDMARKS: usize = 21;

/// Length of a flattened feature vector (21 landmarks x 3 coordinates)
pub const FEATURE_LEN: usize = NUM_LANDMARKS * 3;

pub const WRIST: usize = 0;
pub const THUMB_IP: usize = 3;
pub const THUMB_TIP: usize = 4;
pub const INDEX_PIP: usize = 6;
pub const INDEX_TIP: usize = 8;
pub const MIDDLE_PIP: usize = 10;
pub const MIDDLE_TIP: usize = 12;
pub const RING_PIP: usize = 14;
pub const RING_TIP: usize = 16;
pub const PINKY_PIP: usize = 18;
pub const PINKY_TIP: usize = 20;

/// A single tracked hand point. x and y are normalized to the image, z is depth-relative.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Landmark {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

/// Exactly 21 landmarks in anatomical order
#[derive(Debug, Clone, PartialEq)]
pub struct HandPose {
    landmarks: [Landmark; NUM_LANDMARKS],
}

impl HandPose {
    pub fn new(landmarks: [Landmark; NUM_LANDMARKS]) -> Self {
        Self { landmarks }
    }

    /// Build a pose from an arbitrary landmark list, rejecting anything but 21 points
    pub fn from_landmarks(landmarks: &[Landmark]) -> Result<Self> {
        let landmarks: [Landmark; NUM_LANDMARKS] =
            landmarks.try_into().map_err(|_| Error::InvalidLandmarkCount {
                expected: NUM_LANDMARKS,
                actual: landmarks.len(),
            })?;
        Ok(Self { landmarks })
    }

    pub fn landmarks(&self) -> &[Landmark; NUM_LANDMARKS] {
        &self.landmarks
    }

    pub fn get(&self, index: usize) -> Option<&Landmark> {
        self.landmarks.get(index)
    }

    /// Flatten into the 63-value feature vector, preserving landmark order
    pub fn to_feature_vector(&self) -> FeatureVector {
        let mut values = [0.0f32; FEATURE_LEN];
        for (i, lm) in self.landmarks.iter().enumerate() {
            values[i * 3] = lm.x;
            values[i * 3 + 1] = lm.y;
            values[i * 3 + 2] = lm.z;
        }
        FeatureVector { values }
    }
}

/// Flattened landmark coordinates. Always exactly 63 values.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    values: [f32; FEATURE_LEN],
}

impl FeatureVector {
    /// Validate a raw slice. Any length other than 63 is rejected, never truncated or padded.
    pub fn from_slice(values: &[f32]) -> Result<Self> {
        let values: [f32; FEATURE_LEN] =
            values.try_into().map_err(|_| Error::InvalidFeatureShape {
                expected: FEATURE_LEN,
                actual: values.len(),
            })?;
        Ok(Self { values })
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.values
    }

    /// Landmark at `index` (0..21)
    pub fn landmark(&self, index: usize) -> Landmark {
        let base = index * 3;
        Landmark::new(self.values[base], self.values[base + 1], self.values[base + 2])
    }

    pub fn to_hand_pose(&self) -> HandPose {
        let mut landmarks = [Landmark::default(); NUM_LANDMARKS];
        for (i, lm) in landmarks.iter_mut().enumerate() {
            *lm = self.landmark(i);
        }
        HandPose { landmarks }
    }
}

impl TryFrom<&[f32]> for FeatureVector {
    type Error = Error;

    fn try_from(values: &[f32]) -> Result<Self> {
        Self::from_slice(values)
    }
}

/// Gesture vocabulary plus the two sentinels.
///
/// `Unknown` means a hand was seen but no rule matched; `None` means no hand was seen at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GestureLabel {
    #[serde(rename = "Yes")]
    Yes,
    #[serde(rename = "No")]
    No,
    #[serde(rename = "I Love You")]
    ILoveYou,
    #[serde(rename = "Hello")]
    Hello,
    #[serde(rename = "Thank You")]
    ThankYou,
    #[serde(rename = "Unknown")]
    Unknown,
    #[serde(rename = "None")]
    None,
}

impl GestureLabel {
    /// Output ordering of the learned classifier
    pub const CLASSES: [GestureLabel; 5] = [
        GestureLabel::Yes,
        GestureLabel::No,
        GestureLabel::ILoveYou,
        GestureLabel::Hello,
        GestureLabel::ThankYou,
    ];

    /// Map a model class index to a label; indices past the vocabulary are `Unknown`
    pub fn from_class_index(index: usize) -> Self {
        Self::CLASSES.get(index).copied().unwrap_or(GestureLabel::Unknown)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GestureLabel::Yes => "Yes",
            GestureLabel::No => "No",
            GestureLabel::ILoveYou => "I Love You",
            GestureLabel::Hello => "Hello",
            GestureLabel::ThankYou => "Thank You",
            GestureLabel::Unknown => "Unknown",
            GestureLabel::None => "None",
        }
    }
}

impl fmt::Display for GestureLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
