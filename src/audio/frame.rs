// The smallest unit of audio that moves through the graph; one stereo frame
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct StereoFrame {
    pub left: f32,
    pub right: f32,
}

impl StereoFrame {
    pub fn zero() -> Self { // `default` with a clearer name
        Self::default()
    }

    pub fn mono(s: f32) -> Self {
        Self { left: s, right: s }
    }

    #[inline]
    pub fn scale(self, g: f32) -> Self {
        Self { left: self.left * g, right: self.right * g }
    }

    #[inline]
    pub fn add(self, other: Self) -> Self {
        Self { left: self.left + other.left, right: self.right + other.right }
    }

    // linear blend, t = 0 gives self, t = 1 gives other
    #[inline]
    pub fn lerp(self, other: Self, t: f32) -> Self {
        Self {
            left: self.left * (1.0 - t) + other.left * t,
            right: self.right * (1.0 - t) + other.right * t,
        }
    }
}
