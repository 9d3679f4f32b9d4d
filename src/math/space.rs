use std::fmt::Debug;

use serde::{Deserialize, Serialize};

mod sealed {
    pub trait Sealed {}
}

/// A coordinate space tag.
///
/// Contours and meshes carry their space as a phantom type parameter, so
/// pixel coordinates cannot be fed where millimetres are expected and a
/// re-centred part mesh cannot be exported without its stored offset.
pub trait Space: sealed::Sealed + Copy + Default + Debug + PartialEq + Send + Sync + 'static {}

/// Image pixel space: origin top-left, y pointing down.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pixel;

/// Physical millimetre space: centred on the image centre, y pointing up.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Millimeter;

/// Part-local space: geometry re-centred on its own bounding-box centre.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Local;

/// World space: millimetres with every part at its final placement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct World;

impl sealed::Sealed for Pixel {}
impl sealed::Sealed for Millimeter {}
impl sealed::Sealed for Local {}
impl sealed::Sealed for World {}

impl Space for Pixel {}

impl Space for Millimeter {}

impl Space for Local {}

impl Space for World {}
