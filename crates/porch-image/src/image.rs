use porch_base::Tensor;

/// A decoded image in HWC layout, preserving the source pixel precision.
#[derive(Debug, Clone, PartialEq)]
pub enum Image {
    U8(Tensor<u8>),
    F32(Tensor<f32>),
}

impl Image {
    pub fn height(&self) -> usize {
        match self {
            Image::U8(t) => t.shape[0],
            Image::F32(t) => t.shape[0],
        }
    }

    pub fn width(&self) -> usize {
        match self {
            Image::U8(t) => t.shape[1],
            Image::F32(t) => t.shape[1],
        }
    }

    pub fn channels(&self) -> usize {
        match self {
            Image::U8(t) => t.shape[2],
            Image::F32(t) => t.shape[2],
        }
    }
}

impl From<Tensor<u8>> for Image {
    fn from(t: Tensor<u8>) -> Self {
        Image::U8(t)
    }
}

impl From<Tensor<f32>> for Image {
    fn from(t: Tensor<f32>) -> Self {
        Image::F32(t)
    }
}
